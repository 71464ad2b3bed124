//! Single configured channel to the backend GraphQL API.
//!
//! Every request carries the admin secret header. Calls are independent:
//! no retries, no caching, connection reuse is whatever the underlying
//! `reqwest::Client` pool does.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::error::SyncError;
use runtime::BackendConfig;

pub const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

/// A GraphQL document plus its typed variables.
#[derive(Debug, Serialize)]
pub struct Operation<'a, V> {
    #[serde(rename = "operationName")]
    pub name: &'a str,
    #[serde(rename = "query")]
    pub document: &'a str,
    pub variables: V,
}

#[derive(Debug, Deserialize)]
struct Envelope<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("GraphQL endpoint unreachable: {0}")]
    Unavailable(#[source] reqwest::Error),

    #[error("GraphQL endpoint returned HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Undecodable GraphQL response: {0}")]
    Decode(String),

    #[error("GraphQL errors: {}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },
}

impl From<QueryError> for SyncError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Unavailable(_) => SyncError::backend_unavailable(e.to_string()),
            QueryError::Http { .. } | QueryError::Decode(_) => {
                SyncError::backend_error(e.to_string())
            }
            QueryError::GraphQl { messages } => SyncError::backend_graphql(messages),
        }
    }
}

#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: Url,
    admin_secret: String,
}

impl GraphqlClient {
    pub fn new(http: reqwest::Client, endpoint: Url, admin_secret: impl Into<String>) -> Self {
        Self {
            http,
            endpoint,
            admin_secret: admin_secret.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, cfg: &BackendConfig) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&cfg.url)
            .map_err(|e| anyhow::anyhow!("Invalid backend URL '{}': {}", cfg.url, e))?;
        Ok(Self::new(http, endpoint, cfg.admin_secret.clone()))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one operation and decode its `data` into `D`.
    #[instrument(
        name = "user_sync.graphql.execute",
        skip_all,
        fields(operation = op.name, endpoint = %self.endpoint)
    )]
    pub async fn execute<V, D>(&self, op: &Operation<'_, V>) -> Result<D, QueryError>
    where
        V: Serialize + Sync,
        D: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(ADMIN_SECRET_HEADER, &self.admin_secret)
            .json(op)
            .send()
            .await
            .map_err(QueryError::Unavailable)?;

        let status = response.status();
        let body = response.text().await.map_err(QueryError::Unavailable)?;
        debug!(status = status.as_u16(), "GraphQL response received");

        let envelope = serde_json::from_str::<Envelope<D>>(&body);
        if !status.is_success() {
            // Some servers pair application errors with a 4xx status.
            return Err(match envelope {
                Ok(env) if !env.errors.is_empty() => graphql_error(env.errors),
                _ => QueryError::Http { status, body },
            });
        }

        let envelope = envelope.map_err(|e| QueryError::Decode(e.to_string()))?;
        if !envelope.errors.is_empty() {
            return Err(graphql_error(envelope.errors));
        }
        envelope
            .data
            .ok_or_else(|| QueryError::Decode("response carried no data".to_string()))
    }
}

fn graphql_error(errors: Vec<ErrorEntry>) -> QueryError {
    QueryError::GraphQl {
        messages: errors.into_iter().map(|e| e.message).collect(),
    }
}
