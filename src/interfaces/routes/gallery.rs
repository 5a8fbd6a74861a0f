use actix_web::web;

use crate::handlers::gallery::gallery_layout;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/gallery").service(gallery_layout));
}
