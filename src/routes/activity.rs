use actix_web::web;

use crate::handlers::activity;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/activity").route("", web::get().to(activity::recent_activity)));
}
