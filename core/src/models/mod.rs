// uplyft/src/models/mod.rs

//! Contains data structures representing catalog entities.

pub mod product;

pub use product::{NewProduct, ProductRecord};
