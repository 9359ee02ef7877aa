use chrono::{DateTime, Utc};
use poem_openapi::{ApiResponse, Enum, Object, payload::Json};

use crate::domain::models::{
    BookSummary, ReadingOption, ReadingOptionKind, Toast, ToastKind, View,
};

/// Book summary as the catalog reports it
#[derive(Debug, Clone, Object)]
pub struct BookDto {
    /// Catalog key, e.g. "/works/OL893415W"
    pub key: String,
    #[oai(default)]
    pub title: String,
    #[oai(default)]
    pub author_name: Vec<String>,
    pub cover_i: Option<i64>,
    pub first_publish_year: Option<i64>,
    pub ratings_average: Option<f64>,
    pub publisher: Option<Vec<String>>,
    pub subject: Option<Vec<String>>,
    pub number_of_pages_median: Option<i64>,
}

impl From<BookSummary> for BookDto {
    fn from(b: BookSummary) -> Self {
        BookDto {
            key: b.key,
            title: b.title,
            author_name: b.author_name,
            cover_i: b.cover_i,
            first_publish_year: b.first_publish_year,
            ratings_average: b.ratings_average,
            publisher: b.publisher,
            subject: b.subject,
            number_of_pages_median: b.number_of_pages_median,
        }
    }
}

impl From<BookDto> for BookSummary {
    fn from(b: BookDto) -> Self {
        BookSummary {
            key: b.key,
            title: b.title,
            author_name: b.author_name,
            cover_i: b.cover_i,
            first_publish_year: b.first_publish_year,
            ratings_average: b.ratings_average,
            publisher: b.publisher,
            subject: b.subject,
            number_of_pages_median: b.number_of_pages_median,
        }
    }
}

/// A book as shown in a result or favorites grid
#[derive(Debug, Clone, Object)]
pub struct BookCardDto {
    pub book: BookDto,
    pub cover_url: String,
    pub favorite: bool,
    /// Shelf number, only for favorites
    pub shelf: Option<u32>,
}

#[derive(Debug, Clone, Object)]
pub struct SearchResultsDto {
    pub query: String,
    /// True while a lookup for `query` is still in flight
    pub loading: bool,
    pub count: u64,
    pub books: Vec<BookCardDto>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "snake_case")]
pub enum ReadingOptionKindDto {
    ReadOnline,
    PublicDomainDownload,
    EpubDownload,
    ViewOnCatalog,
}

impl From<ReadingOptionKind> for ReadingOptionKindDto {
    fn from(k: ReadingOptionKind) -> Self {
        match k {
            ReadingOptionKind::ReadOnline => ReadingOptionKindDto::ReadOnline,
            ReadingOptionKind::PublicDomainDownload => ReadingOptionKindDto::PublicDomainDownload,
            ReadingOptionKind::EpubDownload => ReadingOptionKindDto::EpubDownload,
            ReadingOptionKind::ViewOnCatalog => ReadingOptionKindDto::ViewOnCatalog,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ReadingOptionDto {
    pub kind: ReadingOptionKindDto,
    pub label: String,
    pub url: String,
}

impl From<ReadingOption> for ReadingOptionDto {
    fn from(o: ReadingOption) -> Self {
        ReadingOptionDto {
            kind: o.kind.into(),
            label: o.label,
            url: o.url,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct BookDetailsDto {
    pub book: BookCardDto,
    pub cover_url_large: String,
    pub similar: Vec<BookCardDto>,
    pub reading_options: Vec<ReadingOptionDto>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "snake_case")]
pub enum ViewDto {
    Home,
    Favorites,
}

impl From<View> for ViewDto {
    fn from(v: View) -> Self {
        match v {
            View::Home => ViewDto::Home,
            View::Favorites => ViewDto::Favorites,
        }
    }
}

impl From<ViewDto> for View {
    fn from(v: ViewDto) -> Self {
        match v {
            ViewDto::Home => View::Home,
            ViewDto::Favorites => View::Favorites,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct SidebarDto {
    pub active_view: ViewDto,
    pub favorites_count: u64,
}

#[derive(Debug, Clone, Object)]
pub struct NavigateRequestDto {
    pub view: ViewDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "lowercase")]
pub enum ToastKindDto {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, Object)]
pub struct ToastDto {
    pub message: String,
    pub kind: ToastKindDto,
    pub raised_at: DateTime<Utc>,
}

impl From<Toast> for ToastDto {
    fn from(t: Toast) -> Self {
        let kind = match t.kind {
            ToastKind::Success => ToastKindDto::Success,
            ToastKind::Info => ToastKindDto::Info,
            ToastKind::Error => ToastKindDto::Error,
        };
        ToastDto {
            message: t.message,
            kind,
            raised_at: t.raised_at,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ContainsDto {
    pub key: String,
    pub favorite: bool,
}

#[derive(Debug, Clone, Object)]
pub struct ToggleResultDto {
    pub key: String,
    pub favorite: bool,
    pub shelf: Option<u32>,
}

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

impl ErrorDto {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(ErrorDto {
            message: message.into(),
        })
    }
}

#[derive(ApiResponse)]
pub enum SearchResponseDto {
    /// Results for the query
    #[oai(status = 200)]
    Ok(Json<SearchResultsDto>),

    /// A newer query replaced this one before it finished
    #[oai(status = 409)]
    Superseded(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum DetailsResponseDto {
    #[oai(status = 200)]
    Ok(Json<BookDetailsDto>),

    /// Key is neither in the current results nor in favorites
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum AddFavoriteResponseDto {
    /// Added, with its shelf number
    #[oai(status = 201)]
    Created(Json<BookCardDto>),

    /// Already a favorite, nothing changed
    #[oai(status = 200)]
    AlreadyPresent(Json<ErrorDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum RemoveFavoriteResponseDto {
    /// The removed entry
    #[oai(status = 200)]
    Ok(Json<BookCardDto>),

    /// Key was not a favorite
    #[oai(status = 204)]
    NoContent,
}

#[derive(ApiResponse)]
pub enum ToggleFavoriteResponseDto {
    #[oai(status = 200)]
    Ok(Json<ToggleResultDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ToastResponseDto {
    #[oai(status = 200)]
    Ok(Json<ToastDto>),

    /// No notification is showing
    #[oai(status = 204)]
    NoContent,
}

#[derive(ApiResponse)]
pub enum NoContentResponseDto {
    #[oai(status = 204)]
    NoContent,
}
