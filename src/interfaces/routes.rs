use actix_web::web;

use crate::handlers::home::home;

mod admin;
mod booking;
mod contact;
mod gallery;
mod json_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.configure(contact::config_routes);
    cfg.configure(admin::config_routes);

    cfg.service(
        web::scope("/api/v1")
            .configure(contact::config_routes)
            .configure(booking::config_routes)
            .configure(gallery::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
