// Domain models shared by the favorites store, search and detail enrichment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book as returned by the catalog, reduced to the fields we display and persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_pages_median: Option<i64>,
}

#[cfg(test)]
impl BookSummary {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        BookSummary {
            key: key.into(),
            title: title.into(),
            author_name: Vec::new(),
            cover_i: None,
            first_publish_year: None,
            ratings_average: None,
            publisher: None,
            subject: None,
            number_of_pages_median: None,
        }
    }
}

/// A persisted favorite. `shelf` is a local, 1-based, contiguous label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(flatten)]
    pub book: BookSummary,
    #[serde(default)]
    pub shelf: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub raised_at: DateTime<Utc>,
}

/// Which pane the sidebar has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Favorites,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingOptionKind {
    ReadOnline,
    PublicDomainDownload,
    EpubDownload,
    ViewOnCatalog,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingOption {
    pub kind: ReadingOptionKind,
    pub label: String,
    pub url: String,
}

/// Everything the detail view shows beyond the summary itself.
#[derive(Debug, Clone)]
pub struct BookDetails {
    pub book: BookSummary,
    pub shelf: Option<u32>,
    pub similar: Vec<BookSummary>,
    pub reading_options: Vec<ReadingOption>,
}
