use actix_web::web;

use crate::handlers::employees;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            .route("", web::get().to(employees::list_employees))
            .route("", web::post().to(employees::create_employee))
            .route("/{id}", web::delete().to(employees::delete_employee))
            .route("/{id}/budget", web::post().to(employees::add_budget)),
    );
}
