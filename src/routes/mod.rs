use actix_web::{HttpResponse, web};
use serde_json::json;

pub mod activity;
pub mod auth;
pub mod budget_requests;
pub mod employees;
pub mod expenses;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "CorticoExpense API is running"
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .configure(auth::configure)
            .configure(expenses::configure)
            .configure(budget_requests::configure)
            .configure(employees::configure)
            .configure(activity::configure),
    );
}
