pub mod form_fields;
pub mod get_client_ip;
