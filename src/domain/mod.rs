// Domain layer - Core business logic

pub mod containers;
pub mod errors;
pub mod model;
pub mod rules;
