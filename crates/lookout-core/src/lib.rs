pub mod config;
pub mod error;
pub mod result;
pub mod selectors;

pub use config::{webhook_url_from_lookup, ListingTarget, RunConfig};
pub use error::{Error, Result};
pub use result::{RunDetails, RunResult, RunStatus, WebhookPayload};
