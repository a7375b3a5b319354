//! Vector search service integration.

pub mod client;
pub mod types;

pub use client::VectorSearchService;
pub use types::{
    DeltaSyncIndexSpec, EndpointState, IndexStatus, SearchMatch, VectorSearchError,
};
