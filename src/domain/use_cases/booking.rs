use chrono::Days;
use validator::Validate;

use crate::{
    entities::booking::{nightly_rate, BookingQuote, BookingQuoteRequest, CITY_TAX},
    errors::AppError,
};

/// Prices a stay. A checkout on or before checkin yields zero nights and a
/// total of the city tax alone, which is what the booking widget shows.
pub fn quote(request: &BookingQuoteRequest) -> Result<BookingQuote, AppError> {
    request.validate()?;

    let price_per_night = request
        .price_per_night
        .unwrap_or_else(|| nightly_rate(request.apartment.as_deref()));

    let nights = if request.checkout > request.checkin {
        (request.checkout - request.checkin).num_days() as u32
    } else {
        0
    };
    let subtotal = nights
        .checked_mul(price_per_night)
        .ok_or_else(|| AppError::BadRequest("Stay is too long to price".to_string()))?;

    let min_checkout = request
        .checkin
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::BadRequest("Check-in date is out of range".to_string()))?;

    Ok(BookingQuote {
        price_per_night,
        nights,
        subtotal,
        city_tax: CITY_TAX,
        total: subtotal.saturating_add(CITY_TAX),
        min_checkout,
    })
}
