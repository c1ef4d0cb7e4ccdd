use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Config(#[from] lookout_core::Error),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Browser error: {0}")]
    Cdp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl Error {
    /// Taxonomy name recorded in the run details when a step fails.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "ConfigError",
            Error::Navigation(_) => "NavigationError",
            Error::ElementNotFound(_) => "ElementNotFoundError",
            Error::Authentication(_) => "AuthenticationError",
            Error::Cdp(_) => "BrowserError",
            Error::Io(_) => "IoError",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
