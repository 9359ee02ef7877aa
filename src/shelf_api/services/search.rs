use poem_openapi::payload::Json;

use crate::{
    app::{SearchOutcome, ShelfApp},
    domain::models::BookSummary,
    shelf_api::{
        models::{ErrorDto, SearchResponseDto, SearchResultsDto},
        services::book_card,
    },
};

pub struct SearchService<'a> {
    pub app: &'a ShelfApp,
}

impl<'a> SearchService<'a> {
    pub fn new(app: &'a ShelfApp) -> Self {
        Self { app }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(&self, query: &str) -> SearchResponseDto {
        match self.app.search(query).await {
            SearchOutcome::Applied { query, results } => {
                SearchResponseDto::Ok(Json(self.results_dto(query, false, results).await))
            }
            SearchOutcome::Superseded => {
                SearchResponseDto::Superseded(ErrorDto::new(format!(
                    "search for \"{}\" was superseded by a newer query",
                    query.trim()
                )))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn current(&self) -> Json<SearchResultsDto> {
        let snapshot = self.app.results().await;
        Json(
            self.results_dto(snapshot.query, snapshot.loading, snapshot.results)
                .await,
        )
    }

    async fn results_dto(
        &self,
        query: String,
        loading: bool,
        results: Vec<BookSummary>,
    ) -> SearchResultsDto {
        let favorites = self.app.favorites().await;
        let settings = self.app.settings();
        let books: Vec<_> = results
            .into_iter()
            .map(|book| {
                let shelf = favorites
                    .iter()
                    .find(|f| f.book.key == book.key)
                    .map(|f| f.shelf);
                book_card(settings, book, shelf)
            })
            .collect();
        SearchResultsDto {
            query,
            loading,
            count: books.len() as u64,
            books,
        }
    }
}
