//! Domain entities and value objects shared by every layer.

pub mod category;
pub mod collation;
pub mod product;
pub mod types;
