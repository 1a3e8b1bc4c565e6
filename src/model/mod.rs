pub mod config;
pub mod feed;
pub mod project;
pub mod records;
pub mod session;
pub mod task;
pub mod user;

pub use config::*;
pub use feed::*;
pub use project::*;
pub use records::*;
pub use session::*;
pub use task::*;
pub use user::*;
