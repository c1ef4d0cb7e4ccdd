mod checker;
mod error;
mod listing;
mod login;
mod session;

pub use checker::run_check;
pub use error::{Error, Result};
pub use session::BrowserSession;
