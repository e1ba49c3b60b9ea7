//! Relay list fixtures

mod catalog;

pub use catalog::{CatalogBuilder, RelaySpec, sample_catalog, synthetic_catalog};
