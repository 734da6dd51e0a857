use actix_web::web;

use crate::handlers::budget_requests;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/budget-requests")
            .route("", web::get().to(budget_requests::list_budget_requests))
            .route("", web::post().to(budget_requests::create_budget_request))
            // Registered before /{id} so it is not captured as an id
            .route(
                "/pending-count",
                web::get().to(budget_requests::pending_count),
            )
            .route(
                "/{id}",
                web::put().to(budget_requests::resolve_budget_request),
            ),
    );
}
