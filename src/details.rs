//! Detail-view enrichment: similar titles and reading options, fetched concurrently.

use crate::{
    domain::{
        mapping::{map_search_response, pick_similar, reading_options, similar_term, SIMILAR_LIMIT},
        models::{BookSummary, ReadingOption},
    },
    openlibrary::BookCatalog,
};

/// Extra candidates requested so that dropping the book itself still leaves enough.
const SIMILAR_FETCH_LIMIT: u32 = SIMILAR_LIMIT as u32 + 3;

#[tracing::instrument(level = "debug", skip(catalog, book), fields(key = %book.key))]
pub async fn enrich(
    catalog: &dyn BookCatalog,
    catalog_base_url: &str,
    book: &BookSummary,
) -> (Vec<BookSummary>, Vec<ReadingOption>) {
    tokio::join!(
        similar_books(catalog, book),
        fetch_reading_options(catalog, catalog_base_url, book)
    )
}

pub async fn similar_books(catalog: &dyn BookCatalog, book: &BookSummary) -> Vec<BookSummary> {
    let Some(term) = similar_term(book) else {
        return Vec::new();
    };
    match catalog.search(term, SIMILAR_FETCH_LIMIT).await {
        Ok(resp) => pick_similar(&book.key, map_search_response(resp)),
        Err(e) => {
            tracing::warn!(error = %format!("{:?}", e), %term, "similar books lookup failed");
            Vec::new()
        }
    }
}

pub async fn fetch_reading_options(
    catalog: &dyn BookCatalog,
    catalog_base_url: &str,
    book: &BookSummary,
) -> Vec<ReadingOption> {
    match catalog.get_record(&book.key).await {
        Ok(record) => reading_options(catalog_base_url, book, Some(&record)),
        Err(e) => {
            tracing::warn!(
                error = %format!("{:?}", e),
                key = %book.key,
                "record fetch failed, using default reading option"
            );
            reading_options(catalog_base_url, book, None)
        }
    }
}
