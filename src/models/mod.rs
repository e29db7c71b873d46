// Database models and wire types

pub mod account;
pub mod plan;

pub use account::*;
pub use plan::*;
