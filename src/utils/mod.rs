pub mod files;
pub mod signing;
pub mod validation;
