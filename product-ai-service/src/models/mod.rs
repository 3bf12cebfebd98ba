//! Domain models for the product AI service.

pub mod data_uri;
pub mod product;

pub use data_uri::{DataUri, DataUriError};
pub use product::{CatalogEntry, GenerationResult, Recommendation};
