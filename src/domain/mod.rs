pub mod entities;
pub mod layout;
pub mod sanitize;
pub mod use_cases;
pub mod validation;
