pub mod details;
pub mod favorites;
pub mod health;
pub mod search;
pub mod view;

use crate::{
    app::AppSettings,
    domain::models::{BookSummary, FavoriteEntry},
    openlibrary::{CoverSize, cover_url},
    shelf_api::models::BookCardDto,
};

pub(crate) fn book_card(
    settings: &AppSettings,
    book: BookSummary,
    shelf: Option<u32>,
) -> BookCardDto {
    BookCardDto {
        cover_url: cover_url(&settings.covers_base_url, book.cover_i, CoverSize::Medium),
        book: book.into(),
        favorite: shelf.is_some(),
        shelf,
    }
}

pub(crate) fn favorite_card(settings: &AppSettings, entry: FavoriteEntry) -> BookCardDto {
    book_card(settings, entry.book, Some(entry.shelf))
}
