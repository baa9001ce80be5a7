//! Search session: owns the current hits and decides which responses to keep.

use std::collections::HashMap;

use crate::log;

use super::types::{Hit, Query, SearchRequest, SearchResponse, RESULT_FIELDS, SORT_ORDER};

/// Number of hits requested per search
pub const DEFAULT_PAGE_SIZE: usize = 10_000;
/// Smallest page size accepted from config
pub const MIN_PAGE_SIZE: usize = 2_000;

/// A submitted search waiting to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSearch {
    /// Sequence number; responses are matched back by it
    pub seq: u64,
    pub request: SearchRequest,
}

#[derive(Debug)]
pub struct SearchSession {
    page_size: usize,
    hits: Vec<Hit>,
    index_by_id: HashMap<String, usize>,
    total_hits: u64,
    /// Sequence number of the most recently submitted query
    latest_seq: u64,
    /// Sequence number of the last response that settled (installed or failed)
    settled_seq: u64,
    last_error: Option<String>,
}

impl SearchSession {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.clamp(MIN_PAGE_SIZE, DEFAULT_PAGE_SIZE),
            hits: vec![],
            index_by_id: HashMap::new(),
            total_hits: 0,
            latest_seq: 0,
            settled_seq: 0,
            last_error: None,
        }
    }

    /// Build the request for `text` and make it the latest query.
    pub fn submit(&mut self, text: &str) -> PendingSearch {
        self.latest_seq += 1;
        PendingSearch {
            seq: self.latest_seq,
            request: SearchRequest {
                size: self.page_size,
                query: Query::from_input(text),
                fields: RESULT_FIELDS.iter().map(|f| f.to_string()).collect(),
                sort: SORT_ORDER.iter().map(|f| f.to_string()).collect(),
            },
        }
    }

    /// Install a response. Returns `false` if it belongs to a query that has
    /// since been superseded, in which case nothing changes.
    pub fn install(&mut self, seq: u64, response: SearchResponse) -> bool {
        if seq < self.latest_seq {
            log::log(&format!(
                "Discarding stale search response #{} (latest #{})",
                seq, self.latest_seq
            ));
            return false;
        }

        let mut index_by_id = HashMap::with_capacity(response.hits.len());
        for (i, hit) in response.hits.iter().enumerate() {
            index_by_id.entry(hit.id.clone()).or_insert(i);
        }

        self.total_hits = response.total_hits.max(response.hits.len() as u64);
        self.hits = response.hits;
        self.index_by_id = index_by_id;
        self.settled_seq = seq;
        self.last_error = None;
        true
    }

    /// Record a failed search. The current hits stay as they are.
    pub fn fail(&mut self, seq: u64, error: String) -> bool {
        if seq < self.latest_seq {
            return false;
        }
        self.settled_seq = seq;
        self.last_error = Some(error);
        true
    }

    pub fn hit(&self, index: usize) -> Option<&Hit> {
        self.hits.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the latest query is still waiting for its response.
    pub fn is_searching(&self) -> bool {
        self.settled_seq < self.latest_seq
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(ids: &[&str]) -> SearchResponse {
        SearchResponse {
            hits: ids.iter().map(|id| Hit::new(*id)).collect(),
            total_hits: ids.len() as u64,
        }
    }

    #[test]
    fn test_submit_builds_fixed_request() {
        let mut session = SearchSession::default();

        let all = session.submit("");
        assert_eq!(all.seq, 1);
        assert_eq!(
            serde_json::to_value(&all.request).unwrap(),
            json!({
                "size": 10000,
                "query": { "match_all": {} },
                "fields": ["XMP:Subject", "XMP:Rating"],
                "sort": ["_id"]
            })
        );

        let text = session.submit("cat");
        assert_eq!(text.seq, 2);
        assert_eq!(text.request.query, Query::from_input("cat"));
    }

    #[test]
    fn test_page_size_is_clamped() {
        let mut session = SearchSession::new(50);
        assert_eq!(session.submit("").request.size, MIN_PAGE_SIZE);

        let mut session = SearchSession::new(1_000_000);
        assert_eq!(session.submit("").request.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_install_rebuilds_lookup() {
        let mut session = SearchSession::default();
        let pending = session.submit("");
        assert!(session.is_searching());

        assert!(session.install(pending.seq, response(&["a", "b", "c"])));
        assert!(!session.is_searching());
        assert_eq!(session.len(), 3);
        assert_eq!(session.index_of("c"), Some(2));

        let pending = session.submit("x");
        assert!(session.install(pending.seq, response(&["c"])));
        assert_eq!(session.index_of("c"), Some(0));
        assert_eq!(session.index_of("a"), None);
    }

    #[test]
    fn test_duplicate_ids_keep_first_index() {
        let mut session = SearchSession::default();
        let pending = session.submit("");
        session.install(pending.seq, response(&["a", "b", "a"]));
        assert_eq!(session.index_of("a"), Some(0));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = SearchSession::default();
        let slow = session.submit("c");
        let fast = session.submit("ca");

        assert!(session.install(fast.seq, response(&["cat"])));
        assert!(!session.install(slow.seq, response(&["car", "cab"])));
        assert_eq!(session.len(), 1);
        assert_eq!(session.hit(0).map(|h| h.id.as_str()), Some("cat"));
    }

    #[test]
    fn test_failure_keeps_hits() {
        let mut session = SearchSession::default();
        let first = session.submit("");
        session.install(first.seq, response(&["a", "b"]));

        let second = session.submit("zzz");
        assert!(session.fail(second.seq, "connection refused".to_string()));
        assert_eq!(session.len(), 2);
        assert_eq!(session.last_error(), Some("connection refused"));
        assert!(!session.is_searching());

        // A later success clears the error
        let third = session.submit("a");
        session.install(third.seq, response(&["a"]));
        assert_eq!(session.last_error(), None);
    }
}
