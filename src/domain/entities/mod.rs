pub mod admin;
pub mod booking;
pub mod contact;
pub mod submission;
