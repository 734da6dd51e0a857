pub mod activity;
pub mod auth;
pub mod budget_request;
pub(crate) mod macros;
pub mod money;
pub mod expense;
pub mod stats;
pub mod user;

// Re-export all models for easy importing
pub use activity::*;
pub use auth::*;
pub use budget_request::*;
pub use expense::*;
pub use stats::*;
pub use user::*;
