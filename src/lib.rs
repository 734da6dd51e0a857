use std::sync::Arc;

use actix_web::web;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use database::Store;
pub use services::{ActivityLogger, AuthService, BudgetLedger, EmployeeService};

/// Services shared by every worker, all backed by the same store.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub ledger: BudgetLedger,
    pub employees: EmployeeService,
    pub activity_logger: ActivityLogger,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        let activity_logger = ActivityLogger::new(store.clone());
        Self {
            auth_service: AuthService::new(store.clone(), config.clone()),
            ledger: BudgetLedger::new(store.clone(), activity_logger.clone()),
            employees: EmployeeService::new(store, activity_logger.clone(), config),
            activity_logger,
        }
    }

    /// Registers app data and the `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.auth_service.clone()))
            .app_data(web::Data::new(self.ledger.clone()))
            .app_data(web::Data::new(self.employees.clone()))
            .app_data(web::Data::new(self.activity_logger.clone()))
            .app_data(web::JsonConfig::default().error_handler(handlers::shared::json_error_handler))
            .configure(routes::configure);
    }
}
