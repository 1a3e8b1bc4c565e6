pub mod client;
pub mod error;
pub mod listing;
pub mod worker;

pub use client::{ApiClient, AuthedClient};
pub use error::{ApiError, ApiOp};
