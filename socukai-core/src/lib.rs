pub mod calculations;
pub mod input;
pub mod models;

pub use models::*;
