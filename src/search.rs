//! Search box state and query execution.
//!
//! Every issued query (including clearing the box) takes a fresh token; a
//! response is applied only while its token is still the latest, so a slow
//! earlier lookup can never overwrite a newer result set.

use crate::{
    domain::{mapping::map_search_response, models::BookSummary},
    openlibrary::BookCatalog,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub token: u64,
    pub query: String,
}

#[derive(Debug, Default)]
pub struct SearchState {
    query: String,
    latest: u64,
    loading: bool,
    results: Vec<BookSummary>,
}

impl SearchState {
    /// Record a new query. Returns the ticket to run, or `None` when the
    /// query is blank and the results were simply cleared.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        self.latest += 1;
        self.query = query.to_string();
        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.results.clear();
            self.loading = false;
            return None;
        }
        self.loading = true;
        Some(SearchTicket {
            token: self.latest,
            query: trimmed.to_string(),
        })
    }

    /// Apply results for `ticket`. Returns false (and changes nothing) when a
    /// newer query has been issued since.
    pub fn complete(&mut self, ticket: &SearchTicket, results: Vec<BookSummary>) -> bool {
        if ticket.token != self.latest {
            tracing::debug!(
                token = ticket.token,
                latest = self.latest,
                query = %ticket.query,
                "discarding stale search response"
            );
            return false;
        }
        self.results = results;
        self.loading = false;
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn results(&self) -> &[BookSummary] {
        &self.results
    }

    pub fn find(&self, key: &str) -> Option<&BookSummary> {
        self.results.iter().find(|b| b.key == key)
    }
}

/// One lookup by title. Failures degrade to an empty result set.
#[tracing::instrument(level = "debug", skip(catalog))]
pub async fn execute(catalog: &dyn BookCatalog, query: &str, limit: u32) -> Vec<BookSummary> {
    match catalog.search_by_title(query, limit).await {
        Ok(resp) => {
            let total = resp.num_found;
            let books = map_search_response(resp);
            tracing::debug!(%query, total, shown = books.len(), "search returned");
            books
        }
        Err(e) => {
            tracing::warn!(
                error = %format!("{:?}", e),
                %query,
                "search failed, showing no results"
            );
            Vec::new()
        }
    }
}
