//! Application state owned by the service root and shared with handlers by `Arc`.
//!
//! Every mutating operation ends in [`ShelfApp::settle`], which is the single
//! place persistence happens. Network calls never run while the state lock
//! is held.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use crate::{
    details,
    domain::models::{BookDetails, BookSummary, FavoriteEntry, Toast, ToastKind, View},
    favorites::{AddOutcome, FavoritesStore},
    openlibrary::BookCatalog,
    search::{self, SearchState},
    storage::BlobStore,
};

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub catalog_base_url: String,
    pub covers_base_url: String,
    pub search_limit: u32,
    pub toast_ttl: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Applied {
        query: String,
        results: Vec<BookSummary>,
    },
    /// A newer query was issued while this one was in flight.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Added { shelf: u32 },
    Removed,
}

#[derive(Debug, Clone)]
pub struct ResultsSnapshot {
    pub query: String,
    pub loading: bool,
    pub results: Vec<BookSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sidebar {
    pub active_view: View,
    pub favorites_count: usize,
}

#[derive(Debug, Default)]
struct AppState {
    search: SearchState,
    view: View,
    favorites: FavoritesStore,
    toast: Option<Toast>,
}

pub struct ShelfApp {
    catalog: Arc<dyn BookCatalog>,
    blobs: Arc<dyn BlobStore>,
    settings: AppSettings,
    state: Mutex<AppState>,
}

impl ShelfApp {
    /// Build the app and load persisted favorites.
    pub async fn load(
        catalog: Arc<dyn BookCatalog>,
        blobs: Arc<dyn BlobStore>,
        settings: AppSettings,
    ) -> Self {
        let favorites = FavoritesStore::load(blobs.as_ref()).await;
        Self {
            catalog,
            blobs,
            settings,
            state: Mutex::new(AppState {
                favorites,
                ..Default::default()
            }),
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Runs after every mutation, with the state lock held so writes stay ordered.
    async fn settle(&self, state: &mut AppState) {
        state.favorites.persist_if_dirty(self.blobs.as_ref()).await;
    }

    fn notify(&self, state: &mut AppState, message: String, kind: ToastKind) {
        tracing::debug!(%message, ?kind, "toast");
        state.toast = Some(Toast {
            message,
            kind,
            raised_at: Utc::now(),
        });
    }

    // ===== search =====

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let ticket = self.state.lock().await.search.begin(query);
        let Some(ticket) = ticket else {
            return SearchOutcome::Applied {
                query: query.to_string(),
                results: Vec::new(),
            };
        };

        let results =
            search::execute(self.catalog.as_ref(), &ticket.query, self.settings.search_limit).await;

        let mut state = self.state.lock().await;
        if state.search.complete(&ticket, results) {
            tracing::info!(
                query = %ticket.query,
                count = state.search.results().len(),
                "search applied"
            );
            SearchOutcome::Applied {
                query: state.search.query().to_string(),
                results: state.search.results().to_vec(),
            }
        } else {
            SearchOutcome::Superseded
        }
    }

    pub async fn results(&self) -> ResultsSnapshot {
        let state = self.state.lock().await;
        ResultsSnapshot {
            query: state.search.query().to_string(),
            loading: state.search.is_loading(),
            results: state.search.results().to_vec(),
        }
    }

    // ===== favorites =====

    #[tracing::instrument(level = "debug", skip(self, book), fields(key = %book.key))]
    pub async fn add_favorite(&self, book: BookSummary) -> AddOutcome {
        let mut state = self.state.lock().await;
        let outcome = self.add_locked(&mut state, book);
        self.settle(&mut state).await;
        outcome
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn remove_favorite(&self, key: &str) -> Option<FavoriteEntry> {
        let mut state = self.state.lock().await;
        let removed = self.remove_locked(&mut state, key);
        self.settle(&mut state).await;
        removed
    }

    /// The heart button: remove when favorited, add otherwise.
    #[tracing::instrument(level = "debug", skip(self, book), fields(key = %book.key))]
    pub async fn toggle_favorite(&self, book: BookSummary) -> ToggleOutcome {
        let mut state = self.state.lock().await;
        let outcome = match self.remove_locked(&mut state, &book.key) {
            Some(_) => ToggleOutcome::Removed,
            None => {
                let key = book.key.clone();
                self.add_locked(&mut state, book);
                let shelf = state.favorites.get(&key).map_or(0, |e| e.shelf);
                ToggleOutcome::Added { shelf }
            }
        };
        self.settle(&mut state).await;
        outcome
    }

    fn add_locked(&self, state: &mut AppState, book: BookSummary) -> AddOutcome {
        let title = book.title.clone();
        let outcome = state.favorites.add(book);
        let (message, kind) = match outcome {
            AddOutcome::Added { .. } => (
                format!("\"{}\" added to favorites!", title),
                ToastKind::Success,
            ),
            AddOutcome::AlreadyPresent => (
                format!("\"{}\" is already in favorites!", title),
                ToastKind::Info,
            ),
        };
        self.notify(state, message, kind);
        outcome
    }

    fn remove_locked(&self, state: &mut AppState, key: &str) -> Option<FavoriteEntry> {
        let removed = state.favorites.remove(key)?;
        self.notify(
            state,
            format!("\"{}\" removed from favorites!", removed.book.title),
            ToastKind::Error,
        );
        Some(removed)
    }

    pub async fn is_favorite(&self, key: &str) -> bool {
        self.state.lock().await.favorites.contains(key)
    }

    pub async fn favorites(&self) -> Vec<FavoriteEntry> {
        self.state.lock().await.favorites.list().to_vec()
    }

    // ===== navigation & toast =====

    pub async fn navigate(&self, view: View) -> Sidebar {
        let mut state = self.state.lock().await;
        state.view = view;
        Sidebar {
            active_view: state.view,
            favorites_count: state.favorites.len(),
        }
    }

    pub async fn sidebar(&self) -> Sidebar {
        let state = self.state.lock().await;
        Sidebar {
            active_view: state.view,
            favorites_count: state.favorites.len(),
        }
    }

    /// Current toast, clearing it once its display time has passed.
    pub async fn toast(&self) -> Option<Toast> {
        let mut state = self.state.lock().await;
        let expired = state
            .toast
            .as_ref()
            .is_some_and(|t| Utc::now() - t.raised_at >= self.settings.toast_ttl);
        if expired {
            state.toast = None;
        }
        state.toast.clone()
    }

    pub async fn dismiss_toast(&self) {
        self.state.lock().await.toast = None;
    }

    // ===== details =====

    /// Detail view for a book from the current results or the favorites list.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn details(&self, key: &str) -> Option<BookDetails> {
        let book = {
            let state = self.state.lock().await;
            let found = state
                .search
                .find(key)
                .or_else(|| state.favorites.get(key).map(|e| &e.book))
                .cloned();
            found
        }?;

        let (similar, reading_options) =
            details::enrich(self.catalog.as_ref(), &self.settings.catalog_base_url, &book).await;

        let shelf = self.state.lock().await.favorites.get(key).map(|e| e.shelf);
        Some(BookDetails {
            book,
            shelf,
            similar,
            reading_options,
        })
    }
}
