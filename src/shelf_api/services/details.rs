use poem_openapi::payload::Json;

use crate::{
    app::ShelfApp,
    openlibrary::{CoverSize, cover_url},
    shelf_api::{
        models::{BookDetailsDto, DetailsResponseDto, ErrorDto},
        services::book_card,
    },
};

pub struct DetailsService<'a> {
    pub app: &'a ShelfApp,
}

impl<'a> DetailsService<'a> {
    pub fn new(app: &'a ShelfApp) -> Self {
        Self { app }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn details(&self, key: &str) -> DetailsResponseDto {
        let Some(details) = self.app.details(key).await else {
            tracing::debug!(%key, "details requested for unknown book");
            return DetailsResponseDto::NotFound(ErrorDto::new(format!(
                "book {} is not in the current results or favorites",
                key
            )));
        };

        let settings = self.app.settings();
        let favorites = self.app.favorites().await;
        let similar = details
            .similar
            .into_iter()
            .map(|book| {
                let shelf = favorites
                    .iter()
                    .find(|f| f.book.key == book.key)
                    .map(|f| f.shelf);
                book_card(settings, book, shelf)
            })
            .collect();

        DetailsResponseDto::Ok(Json(BookDetailsDto {
            cover_url_large: cover_url(
                &settings.covers_base_url,
                details.book.cover_i,
                CoverSize::Large,
            ),
            book: book_card(settings, details.book, details.shelf),
            similar,
            reading_options: details.reading_options.into_iter().map(Into::into).collect(),
        }))
    }
}
