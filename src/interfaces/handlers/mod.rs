pub mod admin;
pub mod booking;
pub mod contact;
pub mod gallery;
pub mod home;
pub mod system;
