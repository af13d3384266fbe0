// Module exports for models

pub mod assignment;
pub mod profile;
