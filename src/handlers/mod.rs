pub mod activity;
pub mod auth;
pub mod budget_requests;
pub mod employees;
pub mod expenses;
pub mod shared;
