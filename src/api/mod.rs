//! Blocking JSON client for the DATAHUB REST API.
//!
//! Every call runs on the caller's thread; the UI moves calls onto background
//! threads. There are no retries.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiSettings;
use crate::http_client;

mod error;
mod experiments;
mod insights;
mod metrics;
mod segments;

pub use error::ApiError;
pub use metrics::{MetricQuery, TimeRange};

/// Records fetched per list call.
pub const LIST_LIMIT: usize = 100;
const MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;
const MAX_ERROR_BYTES: usize = 64 * 1024;

/// Client bound to one base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            agent: http_client::build_agent(settings.request_timeout()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let mut request = self
            .agent
            .get(&self.url(path))
            .set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }
        tracing::debug!("GET {path}");
        decode(path, request.call())
    }

    fn send<B, T>(&self, method: &str, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .agent
            .request(method, &self.url(path))
            .set("Accept", "application/json")
            .set("Content-Type", "application/json");
        tracing::debug!("{method} {path}");
        decode(path, request.send_json(body))
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        tracing::debug!("DELETE {path}");
        let response = self.agent.delete(&self.url(path)).call();
        response.map(|_| ()).map_err(|err| map_error(path, err))
    }
}

fn decode<T: DeserializeOwned>(
    path: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> Result<T, ApiError> {
    let response = result.map_err(|err| map_error(path, err))?;
    let body = http_client::read_body_limited(response, MAX_RESPONSE_BYTES)
        .map_err(ApiError::Body)?;
    serde_json::from_str(&body).map_err(|err| {
        tracing::warn!("Failed to decode response from {path}: {err}");
        ApiError::Decode(err.to_string())
    })
}

fn map_error(path: &str, err: ureq::Error) -> ApiError {
    let error = match err {
        ureq::Error::Status(code, response) => {
            let body = http_client::read_body_limited(response, MAX_ERROR_BYTES)
                .unwrap_or_else(|err| err);
            ApiError::Status {
                code,
                message: error::error_message(code, &body),
            }
        }
        ureq::Error::Transport(err) => ApiError::Transport(err.to_string()),
    };
    tracing::warn!("Request to {path} failed: {error}");
    error
}

#[cfg(test)]
mod tests;
