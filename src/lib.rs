// Visual Profiles Library
// Exports all modules for testing and reuse

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;
