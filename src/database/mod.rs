pub mod documents;
pub mod pool;
pub mod profiles;
