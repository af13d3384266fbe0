// Service module exports

pub mod assignment;
pub mod cache;
pub mod contrast;
pub mod database;
pub mod events;
pub mod privacy;
pub mod profile;
pub mod theme;
