use actix_web::web;

use crate::handlers::contact::{method_not_allowed, submit_contact_form};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .route(web::post().to(submit_contact_form))
            .default_service(web::to(method_not_allowed))
    );
}
