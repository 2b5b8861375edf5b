pub mod auth;
pub mod cors;
pub mod json_errors;
