pub mod categories;
pub mod main;
pub mod products;
