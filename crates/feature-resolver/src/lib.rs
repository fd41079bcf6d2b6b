//! Feature Resolution Engine
//!
//! Fetches the latest feature record for a subject and turns its nested
//! feature map into the flat, ordered vector a model artifact expects.

mod flatten;
mod record;
mod resolver;

pub use flatten::{flatten_features, vectorize_features};
pub use record::{FeatureMap, FeatureRecord};
pub use resolver::{FeatureResolver, FeatureStore};

use thiserror::Error;

/// Errors from the feature store collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Feature store query failed: {0}")]
    Query(String),
}
