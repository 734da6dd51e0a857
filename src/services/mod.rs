pub mod activity_logger;
pub mod auth;
pub mod employees;
pub mod ledger;

pub use activity_logger::ActivityLogger;
pub use auth::{AuthService, Claims};
pub use employees::EmployeeService;
pub use ledger::BudgetLedger;
