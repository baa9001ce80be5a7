//! HTTP transport for the search endpoint.

use crate::error::{SearchError, SearchResult};

use super::types::{SearchRequest, SearchResponse};

/// Path of the search handler relative to the server root
pub const SEARCH_PATH: &str = "/api/search";

/// Client for a bleve-style search endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(http: reqwest::Client, server_url: &str) -> Self {
        Self {
            http,
            endpoint: search_endpoint(server_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a single search. No retries: a failure leaves the caller's
    /// results as they were.
    pub async fn search(&self, request: &SearchRequest) -> SearchResult<SearchResponse> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SearchError::InvalidResponse(e.to_string()))
    }
}

fn search_endpoint(server_url: &str) -> String {
    format!("{}{}", server_url.trim_end_matches('/'), SEARCH_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        assert_eq!(
            search_endpoint("http://localhost:7080"),
            "http://localhost:7080/api/search"
        );
        assert_eq!(
            search_endpoint("http://photos.lan/"),
            "http://photos.lan/api/search"
        );
    }
}
