use actix_web::web;

use crate::handlers::{admin, system::health_check};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(admin::login)
            .service(admin::logout)
            .service(admin::submissions)
            .service(health_check)
    );
}
