mod error;
mod handler;
mod response;
mod server;
mod webhook;

pub use error::{Error, Result};
pub use handler::{run_invocation, run_invocation_with};
pub use response::InvocationResponse;
pub use server::TriggerServer;
pub use webhook::{DeliveryOutcome, WebhookReporter};
