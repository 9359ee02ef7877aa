use poem_openapi::payload::Json;

use crate::{
    app::{ShelfApp, ToggleOutcome},
    domain::models::BookSummary,
    favorites::AddOutcome,
    shelf_api::{
        models::{
            AddFavoriteResponseDto, BookCardDto, BookDto, ContainsDto, ErrorDto,
            RemoveFavoriteResponseDto, ToggleFavoriteResponseDto, ToggleResultDto,
        },
        services::{book_card, favorite_card},
    },
};

pub struct FavoritesService<'a> {
    pub app: &'a ShelfApp,
}

impl<'a> FavoritesService<'a> {
    pub fn new(app: &'a ShelfApp) -> Self {
        Self { app }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list(&self) -> Json<Vec<BookCardDto>> {
        let settings = self.app.settings();
        let cards = self
            .app
            .favorites()
            .await
            .into_iter()
            .map(|entry| favorite_card(settings, entry))
            .collect();
        Json(cards)
    }

    #[tracing::instrument(level = "debug", skip(self, book), fields(key = %book.key))]
    pub async fn add(&self, book: BookDto) -> AddFavoriteResponseDto {
        if book.key.trim().is_empty() {
            return AddFavoriteResponseDto::BadRequest(ErrorDto::new("key is required"));
        }
        let book = BookSummary::from(book);
        let title = book.title.clone();
        match self.app.add_favorite(book.clone()).await {
            AddOutcome::Added { shelf } => {
                tracing::info!(key = %book.key, shelf, "favorite added");
                AddFavoriteResponseDto::Created(Json(book_card(
                    self.app.settings(),
                    book,
                    Some(shelf),
                )))
            }
            AddOutcome::AlreadyPresent => AddFavoriteResponseDto::AlreadyPresent(ErrorDto::new(
                format!("\"{}\" is already in favorites!", title),
            )),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn remove(&self, key: &str) -> RemoveFavoriteResponseDto {
        match self.app.remove_favorite(key).await {
            Some(entry) => {
                tracing::info!(%key, "favorite removed");
                RemoveFavoriteResponseDto::Ok(Json(favorite_card(self.app.settings(), entry)))
            }
            None => RemoveFavoriteResponseDto::NoContent,
        }
    }

    #[tracing::instrument(level = "debug", skip(self, book), fields(key = %book.key))]
    pub async fn toggle(&self, book: BookDto) -> ToggleFavoriteResponseDto {
        if book.key.trim().is_empty() {
            return ToggleFavoriteResponseDto::BadRequest(ErrorDto::new("key is required"));
        }
        let key = book.key.clone();
        let result = match self.app.toggle_favorite(book.into()).await {
            ToggleOutcome::Added { shelf } => ToggleResultDto {
                key,
                favorite: true,
                shelf: Some(shelf),
            },
            ToggleOutcome::Removed => ToggleResultDto {
                key,
                favorite: false,
                shelf: None,
            },
        };
        ToggleFavoriteResponseDto::Ok(Json(result))
    }

    pub async fn contains(&self, key: String) -> Json<ContainsDto> {
        let favorite = self.app.is_favorite(&key).await;
        Json(ContainsDto { key, favorite })
    }
}
