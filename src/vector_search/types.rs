//! Shared types used by the vector search client.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors returned while talking to the vector search service.
#[derive(Debug, Error)]
pub enum VectorSearchError {
    /// Workspace base URL failed to parse or normalize.
    #[error("invalid workspace URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Service responded with an unexpected status code.
    #[error("unexpected vector search response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the service.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Endpoint or index did not become ready within the polling budget.
    #[error("{resource} '{name}' was not ready after {waited_secs}s")]
    ReadinessTimeout {
        /// Kind of resource being waited on (`endpoint` or `index`).
        resource: &'static str,
        /// Name of the resource being waited on.
        name: String,
        /// Seconds spent polling before giving up.
        waited_secs: u64,
    },
}

/// Parameters for a delta-sync index kept in step with the chunk table.
#[derive(Debug, Clone)]
pub struct DeltaSyncIndexSpec {
    /// Endpoint the index is served from.
    pub endpoint_name: String,
    /// Fully qualified index name.
    pub index_name: String,
    /// Fully qualified source table the index syncs from.
    pub source_table: String,
    /// Primary key column of the source table.
    pub primary_key: String,
    /// Column whose text is embedded.
    pub embedding_source_column: String,
    /// Serving endpoint computing the embeddings.
    pub embedding_model_endpoint: String,
    /// Additional columns mirrored into the index.
    pub columns_to_sync: Vec<String>,
}

/// Lifecycle state reported for a serving endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointState {
    /// Readiness marker; `"READY"` once the endpoint is usable.
    #[serde(default)]
    pub ready: String,
    /// In-flight provisioning state, e.g. `"UPDATING"` during creation.
    #[serde(default)]
    pub update_state: String,
}

impl EndpointState {
    /// Whether the endpoint reports itself usable.
    pub fn is_ready(&self) -> bool {
        self.ready == "READY"
    }
}

/// Lifecycle status reported for an index.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexStatus {
    /// Readiness marker; `"READY"` once the index serves queries.
    #[serde(default)]
    pub ready: String,
}

impl IndexStatus {
    /// Whether the index reports itself usable.
    pub fn is_ready(&self) -> bool {
        self.ready == "READY"
    }
}

/// One similarity-search result row projected onto the demo's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    /// Chunk text stored in the index.
    pub content: String,
    /// Display name of the source document.
    pub doc_name: String,
    /// 1-based page number the chunk came from.
    pub page: u64,
}

impl SearchMatch {
    /// Columns a query must request, in order, for [`SearchMatch::from_row`].
    pub const COLUMNS: [&'static str; 3] = ["content", "doc_name", "page"];

    /// Interpret a raw result row positionally as (content, doc_name, page).
    ///
    /// Returns `None` when the row is too short or the types do not line up,
    /// which signals a query that asked for different columns.
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let content = row.first()?.as_str()?.to_string();
        let doc_name = row.get(1)?.as_str()?.to_string();
        let page = row.get(2)?.as_u64()?;
        Some(Self {
            content,
            doc_name,
            page,
        })
    }
}

#[derive(Deserialize)]
pub(crate) struct EndpointResponse {
    #[serde(default)]
    pub(crate) state: EndpointState,
}

#[derive(Deserialize)]
pub(crate) struct IndexResponse {
    #[serde(default)]
    pub(crate) status: IndexStatus,
}

#[derive(Deserialize)]
pub(crate) struct QueryResponse {
    pub(crate) result: QueryResult,
}

#[derive(Deserialize)]
pub(crate) struct QueryResult {
    #[serde(default)]
    pub(crate) data_array: Vec<Vec<Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_match_parses_positional_row() {
        let row = vec![json!("uma cláusula"), json!("contrato.pdf"), json!(7)];
        let hit = SearchMatch::from_row(&row).unwrap();
        assert_eq!(hit.content, "uma cláusula");
        assert_eq!(hit.doc_name, "contrato.pdf");
        assert_eq!(hit.page, 7);
    }

    #[test]
    fn search_match_rejects_short_or_mistyped_rows() {
        assert!(SearchMatch::from_row(&[json!("only content")]).is_none());
        let row = vec![json!(1), json!("doc"), json!(2)];
        assert!(SearchMatch::from_row(&row).is_none());
    }

    #[test]
    fn readiness_is_the_ready_literal() {
        let state = EndpointState {
            ready: "READY".into(),
            update_state: String::new(),
        };
        assert!(state.is_ready());
        let state = EndpointState {
            ready: "NOT_READY".into(),
            update_state: "UPDATING".into(),
        };
        assert!(!state.is_ready());
    }
}
