//! HTTP client for the managed vector search service.
//!
//! The service itself (endpoint provisioning, delta-sync indexing, ANN
//! queries) is entirely platform-side; this client only drives its REST API:
//! create the endpoint and index when missing, poll until they report ready,
//! and run similarity queries against the synced index.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};

use crate::config::WorkspaceAuth;
use crate::vector_search::types::{
    DeltaSyncIndexSpec, EndpointResponse, EndpointState, IndexResponse, IndexStatus,
    QueryResponse, VectorSearchError,
};

const API_PREFIX: &str = "api/2.0/vector-search";
const READY_TIMEOUT: Duration = Duration::from_secs(300);
const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// REST client for vector search endpoint and index management.
pub struct VectorSearchService {
    client: Client,
    base_url: String,
    token: String,
    ready_timeout: Duration,
    poll_interval: Duration,
}

impl VectorSearchService {
    /// Construct a new client for the given workspace.
    pub fn new(auth: &WorkspaceAuth) -> Result<Self, VectorSearchError> {
        let client = Client::builder().user_agent("docqa/0.1").build()?;
        let base_url = normalize_base_url(&auth.url).map_err(VectorSearchError::InvalidUrl)?;
        tracing::debug!(url = %base_url, "Initialized vector search client");

        Ok(Self {
            client,
            base_url,
            token: auth.token.clone(),
            ready_timeout: READY_TIMEOUT,
            poll_interval: POLL_INTERVAL,
        })
    }

    /// Override the readiness polling budget; used by tests to avoid
    /// real-time waits.
    pub fn with_poll_settings(mut self, timeout: Duration, interval: Duration) -> Self {
        self.ready_timeout = timeout;
        self.poll_interval = interval;
        self
    }

    /// Fetch the state of an endpoint, `None` when it does not exist.
    pub async fn get_endpoint(
        &self,
        name: &str,
    ) -> Result<Option<EndpointState>, VectorSearchError> {
        let response = self
            .request(Method::GET, &format!("{API_PREFIX}/endpoints/{name}"))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let payload: EndpointResponse = response.json().await?;
                Ok(Some(payload.state))
            }
            status => Err(unexpected_status(status, response).await),
        }
    }

    /// Create a standard endpoint with the given name.
    pub async fn create_endpoint(&self, name: &str) -> Result<(), VectorSearchError> {
        let body = json!({
            "name": name,
            "endpoint_type": "STANDARD",
        });
        let response = self
            .request(Method::POST, &format!("{API_PREFIX}/endpoints"))
            .json(&body)
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::info!(endpoint = name, "Endpoint creation requested");
        })
        .await
    }

    /// Make sure the endpoint exists and is ready, creating it when missing.
    pub async fn ensure_endpoint(&self, name: &str) -> Result<(), VectorSearchError> {
        match self.get_endpoint(name).await? {
            Some(state) if state.is_ready() => {
                tracing::info!(endpoint = name, "Endpoint already ready");
                Ok(())
            }
            Some(state) => {
                tracing::info!(
                    endpoint = name,
                    update_state = %state.update_state,
                    "Endpoint exists but not ready; waiting"
                );
                self.wait_for_endpoint_ready(name).await
            }
            None => {
                self.create_endpoint(name).await?;
                self.wait_for_endpoint_ready(name).await
            }
        }
    }

    /// Poll the endpoint until it reports ready or the budget elapses.
    pub async fn wait_for_endpoint_ready(&self, name: &str) -> Result<(), VectorSearchError> {
        let started = tokio::time::Instant::now();
        loop {
            if let Some(state) = self.get_endpoint(name).await? {
                if state.is_ready() {
                    tracing::info!(endpoint = name, "Endpoint ready");
                    return Ok(());
                }
                tracing::debug!(
                    endpoint = name,
                    ready = %state.ready,
                    update_state = %state.update_state,
                    "Waiting for endpoint"
                );
            }
            if started.elapsed() >= self.ready_timeout {
                return Err(VectorSearchError::ReadinessTimeout {
                    resource: "endpoint",
                    name: name.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Fetch the status of an index, `None` when it does not exist.
    pub async fn get_index(&self, name: &str) -> Result<Option<IndexStatus>, VectorSearchError> {
        let response = self
            .request(Method::GET, &format!("{API_PREFIX}/indexes/{name}"))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let payload: IndexResponse = response.json().await?;
                Ok(Some(payload.status))
            }
            status => Err(unexpected_status(status, response).await),
        }
    }

    /// Create a delta-sync index over the chunk table.
    pub async fn create_delta_sync_index(
        &self,
        spec: &DeltaSyncIndexSpec,
    ) -> Result<(), VectorSearchError> {
        let body = json!({
            "name": spec.index_name,
            "endpoint_name": spec.endpoint_name,
            "primary_key": spec.primary_key,
            "index_type": "DELTA_SYNC",
            "delta_sync_index_spec": {
                "source_table": spec.source_table,
                "pipeline_type": "TRIGGERED",
                "columns_to_sync": spec.columns_to_sync,
                "embedding_source_columns": [
                    {
                        "name": spec.embedding_source_column,
                        "embedding_model_endpoint_name": spec.embedding_model_endpoint,
                    }
                ],
            },
        });

        let response = self
            .request(Method::POST, &format!("{API_PREFIX}/indexes"))
            .json(&body)
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::info!(
                index = %spec.index_name,
                source_table = %spec.source_table,
                "Delta sync index creation requested"
            );
        })
        .await
    }

    /// Make sure the index exists and is ready, creating it when missing.
    pub async fn ensure_index(&self, spec: &DeltaSyncIndexSpec) -> Result<(), VectorSearchError> {
        match self.get_index(&spec.index_name).await? {
            Some(status) if status.is_ready() => {
                tracing::info!(index = %spec.index_name, "Index already ready");
                Ok(())
            }
            Some(_) => self.wait_for_index_ready(&spec.index_name).await,
            None => {
                self.create_delta_sync_index(spec).await?;
                self.wait_for_index_ready(&spec.index_name).await
            }
        }
    }

    /// Poll the index until it reports ready or the budget elapses.
    pub async fn wait_for_index_ready(&self, name: &str) -> Result<(), VectorSearchError> {
        let started = tokio::time::Instant::now();
        loop {
            if let Some(status) = self.get_index(name).await? {
                if status.is_ready() {
                    tracing::info!(index = name, "Index ready");
                    return Ok(());
                }
                tracing::debug!(index = name, ready = %status.ready, "Waiting for index");
            }
            if started.elapsed() >= self.ready_timeout {
                return Err(VectorSearchError::ReadinessTimeout {
                    resource: "index",
                    name: name.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Run a text similarity query, returning raw result rows in the column
    /// order that was requested.
    pub async fn similarity_search(
        &self,
        index: &str,
        query_text: &str,
        columns: &[&str],
        num_results: usize,
    ) -> Result<Vec<Vec<Value>>, VectorSearchError> {
        let body = json!({
            "query_text": query_text,
            "columns": columns,
            "num_results": num_results,
        });

        let response = self
            .request(Method::POST, &format!("{API_PREFIX}/indexes/{index}/query"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = unexpected_status(status, response).await;
            tracing::error!(index, error = %error, "Similarity search failed");
            return Err(error);
        }

        let payload: QueryResponse = response.json().await?;
        Ok(payload.result.data_array)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        self.client.request(method, url).bearer_auth(&self.token)
    }

    async fn ensure_success<F>(
        &self,
        response: reqwest::Response,
        on_success: F,
    ) -> Result<(), VectorSearchError>
    where
        F: FnOnce(),
    {
        if response.status().is_success() {
            on_success();
            Ok(())
        } else {
            let status = response.status();
            let error = unexpected_status(status, response).await;
            tracing::error!(error = %error, "Vector search request failed");
            Err(error)
        }
    }
}

async fn unexpected_status(status: StatusCode, response: reqwest::Response) -> VectorSearchError {
    let body = response.text().await.unwrap_or_default();
    VectorSearchError::UnexpectedStatus { status, body }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}
