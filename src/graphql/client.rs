use super::request::{GraphQlRequest, QueryDocument};
use super::response::GraphQlResponse;
use crate::error::QueryError;
use crate::query::{self, QueryResult};
use futures::stream::BoxStream;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("usertui/", env!("CARGO_PKG_VERSION"));

/// Issues GraphQL documents against one endpoint with a fixed credential.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct QueryClient {
    client: reqwest::Client,
    endpoint: Url,
    authorization: String,
}

impl QueryClient {
    pub fn new(endpoint: Url, api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            authorization: format!("Apikey {}", api_key),
        })
    }

    /// Run one document and return its decoded `data` object.
    pub async fn fetch(&self, document: &QueryDocument) -> Result<Value, QueryError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            operation = document.operation_name().unwrap_or("<anonymous>"),
            "sending GraphQL request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, self.authorization.as_str())
            .header(ACCEPT, "application/json")
            .json(&GraphQlRequest::from(document))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "GraphQL response received");

        if !status.is_success() {
            return Err(QueryError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let decoded: GraphQlResponse = serde_json::from_slice(&body)
            .map_err(|e| QueryError::Decode(format!("malformed GraphQL response: {}", e)))?;

        decoded.into_data().inspect_err(|e| {
            tracing::warn!(error = %e, "GraphQL request failed");
        })
    }

    /// Snapshot stream for one execution: `Pending`, then the terminal result.
    pub fn execute(&self, document: QueryDocument) -> BoxStream<'static, QueryResult<Value>> {
        let client = self.clone();
        query::snapshots(async move { client.fetch(&document).await })
    }
}
