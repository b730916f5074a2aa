use actix_web::web;

use crate::handlers::{home::home, json_error::not_found};

mod admin;
mod blog;
mod json_error;
mod public;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .configure(public::config_routes)
            .configure(blog::config_routes)
            .configure(admin::config_routes)
    );

    cfg.configure(json_error::config_routes);
    cfg.default_service(web::to(not_found));
}
