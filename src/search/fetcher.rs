//! HTTP fetcher for the results page
//!
//! This module handles the single outbound request of a run:
//! - Building the HTTP client with the configured user agent and language
//! - Sending one GET with the search query parameters
//! - Classifying failures as transport errors
//!
//! There is no retry. A failed fetch ends the run; repeating it is up to
//! whatever schedules the scout.

use crate::config::{HttpConfig, SearchConfig};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching the results page
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    /// Returns the HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Builds an HTTP client with the configured headers and timeout
///
/// # Arguments
///
/// * `config` - User agent, accept-language and timeout settings
///
/// # Example
///
/// ```no_run
/// use serp_scout::config::HttpConfig;
/// use serp_scout::search::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, TransportError> {
    let mut headers = HeaderMap::new();
    let language = HeaderValue::from_str(&config.accept_language)
        .map_err(|_| TransportError::InvalidHeader(config.accept_language.clone()))?;
    headers.insert(ACCEPT_LANGUAGE, language);

    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|_| TransportError::InvalidHeader(config.user_agent.clone()))?;

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(TransportError::Client)
}

/// Fetches the results page for the configured query
///
/// # Request
///
/// `GET <endpoint>?q=..&hl=..&num=..&start=..&filter=..` with the client's
/// default headers.
///
/// # Returns
///
/// * `Ok(String)` - The response body, as received
/// * `Err(TransportError::Status)` - Any non-2xx status
/// * `Err(TransportError::Timeout)` - The client timeout elapsed
/// * `Err(TransportError::Network)` - Connection or body read failure
pub async fn fetch_results_page(
    client: &Client,
    search: &SearchConfig,
) -> Result<String, TransportError> {
    let endpoint = search.endpoint.as_str();
    tracing::debug!("GET {} q={:?}", endpoint, search.query);

    let response = client
        .get(endpoint)
        .query(&search.query_params())
        .send()
        .await
        .map_err(|e| TransportError::from_reqwest(endpoint, e))?;

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        tracing::warn!("Search request failed with HTTP {}", status.as_u16());
        return Err(TransportError::Status {
            url: final_url,
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| TransportError::from_reqwest(&final_url, e))?;

    tracing::debug!("Fetched {} bytes from {}", body.len(), final_url);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_header_rejected() {
        let config = HttpConfig {
            accept_language: "en\nUS".to_string(),
            ..HttpConfig::default()
        };
        assert!(matches!(
            build_http_client(&config),
            Err(TransportError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_status_accessor() {
        let error = TransportError::Status {
            url: "https://www.google.com/search".to_string(),
            status: 429,
        };
        assert_eq!(error.status(), Some(429));
        assert_eq!(error.to_string(), "HTTP 429 from https://www.google.com/search");

        let timeout = TransportError::Timeout {
            url: "https://www.google.com/search".to_string(),
        };
        assert_eq!(timeout.status(), None);
    }

    // Request/response behavior is covered by the wiremock integration tests
}
