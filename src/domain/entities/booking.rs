use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PRICE_PER_NIGHT: u32 = 45;
pub const CITY_TAX: u32 = 3;

/// Nightly rate for an apartment page slug, falling back to the studio rate.
pub fn nightly_rate(apartment: Option<&str>) -> u32 {
    match apartment.map(str::trim) {
        Some("comfort-apartment") => 65,
        Some("two-bedroom-apartment") => 85,
        Some("standard-apartment") => 55,
        Some("studio") => 45,
        Some("bunk-beds") => 35,
        _ => DEFAULT_PRICE_PER_NIGHT,
    }
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BookingQuoteRequest {
    #[validate(length(max = 64, message = "Apartment name is too long"))]
    pub apartment: Option<String>,

    #[validate(range(min = 1, max = 10000, message = "Price per night must be between 1 and 10000"))]
    pub price_per_night: Option<u32>,

    pub checkin: NaiveDate,

    pub checkout: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BookingQuote {
    pub price_per_night: u32,
    pub nights: u32,
    pub subtotal: u32,
    pub city_tax: u32,
    pub total: u32,
    pub min_checkout: NaiveDate,
}
