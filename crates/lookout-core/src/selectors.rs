//! Static selector sets for the login form and its surroundings.
//!
//! The target site's markup is not under our control, so every required
//! element gets an ordered list of candidate selectors instead of a single
//! brittle one. First visible match wins.

/// Candidate selectors for the username/email field, in priority order.
pub const USERNAME_SELECTORS: &[&str] = &[
    r#"input[name="login"]"#,
    r#"input[name="username"]"#,
    r#"input[name="email"]"#,
    r#"input[type="email"]"#,
    "#login",
    "#username",
    "#email",
    r#"input[placeholder*="email" i]"#,
    r#"input[placeholder*="identifiant" i]"#,
];

/// Candidate selectors for the password field, in priority order.
pub const PASSWORD_SELECTORS: &[&str] = &[
    r#"input[name="password"]"#,
    r#"input[type="password"]"#,
    "#password",
    r#"input[placeholder*="password" i]"#,
    r#"input[placeholder*="mot de passe" i]"#,
];

/// Candidate selectors for the submit control. When none resolves, the form
/// is submitted by pressing Enter in the password field instead.
pub const SUBMIT_SELECTORS: &[&str] = &[
    r#"button[type="submit"]"#,
    r#"input[type="submit"]"#,
    r#"*[class*="submit"]"#,
    r#"*[class*="login-btn"]"#,
];

/// Containers commonly holding a visible login error message.
pub const ERROR_CONTAINER_SELECTORS: &[&str] = &[
    ".error",
    ".alert-danger",
    ".message-error",
    r#"[class*="error"]"#,
];

/// URL fragments that identify the login page. If the post-submit URL still
/// contains one of these, authentication is considered failed.
pub const LOGIN_PATH_MARKERS: &[&str] = &["/connexion", "login"];

/// URL patterns for non-essential assets, blocked to reduce page-load
/// latency. Scripts stay enabled since the site needs them to render.
pub const BLOCKED_URL_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.svg", "*.webp", "*.ico", "*.css", "*.woff",
    "*.woff2", "*.ttf", "*.otf", "*.mp4", "*.webm", "*.mp3",
];
