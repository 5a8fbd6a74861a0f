use actix_web::{post, web, HttpResponse};

use crate::{entities::booking::BookingQuoteRequest, errors::AppError, use_cases::booking};

#[post("/quote")]
pub async fn booking_quote(request: web::Json<BookingQuoteRequest>) -> Result<HttpResponse, AppError> {
    let quote = booking::quote(&request)?;
    Ok(HttpResponse::Ok().json(quote))
}
