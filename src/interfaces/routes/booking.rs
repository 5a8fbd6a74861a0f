use actix_web::web;

use crate::handlers::booking::booking_quote;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/booking").service(booking_quote));
}
