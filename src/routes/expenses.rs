use actix_web::web;

use crate::handlers::expenses;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/expenses")
            .route("", web::get().to(expenses::list_expenses))
            .route("", web::post().to(expenses::create_expense))
            .route("/stats", web::get().to(expenses::get_stats))
            .route("/balance", web::get().to(expenses::get_balance)),
    );
}
