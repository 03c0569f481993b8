use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::EndpointConfig;

pub const ENDPOINT_FALLBACK_MESSAGE: &str = "An error occurred. Please try again.";
pub const NETWORK_FALLBACK_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

/// Flat `name -> value` body posted to the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionPayload(pub BTreeMap<String, String>);

impl SubmissionPayload {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Endpoint verdict: `{ "success": bool, "message"?: string }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmissionOutcome {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("could not reach submission endpoint: {0}")]
    Transport(String),
    #[error("submission endpoint answered with HTTP {0}")]
    Status(u16),
    #[error("submission endpoint returned an unreadable body: {0}")]
    Decode(String),
}

/// Outbound hook receiving completed forms.
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    async fn submit(
        &self,
        path: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionOutcome, SubmissionError>;
}

/// JSON-over-HTTP endpoint. Requests carry no timeout.
#[derive(Debug, Clone)]
pub struct HttpSubmissionEndpoint {
    client: reqwest::Client,
    config: EndpointConfig,
}

impl HttpSubmissionEndpoint {
    pub fn new(config: EndpointConfig) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }
}

#[async_trait]
impl SubmissionEndpoint for HttpSubmissionEndpoint {
    async fn submit(
        &self,
        path: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let url = self.config.url_for(path);
        debug!(%url, fields = payload.len(), "posting form submission");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(SubmissionError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        serde_json::from_slice::<SubmissionOutcome>(&body)
            .map_err(|err| SubmissionError::Decode(err.to_string()))
    }
}
