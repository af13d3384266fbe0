// Utility module exports

pub mod color;
