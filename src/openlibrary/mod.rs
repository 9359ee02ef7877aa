use serde::{Deserialize, de::DeserializeOwned};

/// Placeholder shown for books without a cover id.
pub const PLACEHOLDER_COVER_URL: &str = "https://via.placeholder.com/150x200?text=No+Cover";

/// Read side of the remote book catalog.
#[async_trait::async_trait]
pub trait BookCatalog: Send + Sync {
    /// Lookup by title, the way the search box queries.
    async fn search_by_title(&self, title: &str, limit: u32) -> anyhow::Result<SearchResponse>;
    /// Free-text lookup, used for "similar books".
    async fn search(&self, term: &str, limit: u32) -> anyhow::Result<SearchResponse>;
    /// Extended record of a single work, by catalog key (e.g. "/works/OL45804W").
    async fn get_record(&self, key: &str) -> anyhow::Result<WorkRecord>;
}

#[derive(Clone, Debug)]
pub struct OpenLibraryClient {
    base_url: String,
    client: reqwest::Client,
}

impl OpenLibraryClient {
    /// Create a new client with the given base URL (e.g. "https://openlibrary.org").
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating OpenLibraryClient");
        Ok(OpenLibraryClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let url = self.url(path);
        let resp = self.client.get(&url).query(query).send().await?;
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let snippet_len = body.len().min(2000);
                let snippet = body.get(..snippet_len).unwrap_or_default();
                tracing::error!(
                    error = %e,
                    %url,
                    body_snippet = %snippet,
                    "failed to parse catalog response"
                );
                Err(e.into())
            }
        }
    }
}

#[async_trait::async_trait]
impl BookCatalog for OpenLibraryClient {
    /// GET /search.json?title=..&limit=..
    #[tracing::instrument(level = "debug", skip(self))]
    async fn search_by_title(&self, title: &str, limit: u32) -> anyhow::Result<SearchResponse> {
        tracing::debug!(%title, limit, "GET search by title");
        self.fetch(
            "/search.json",
            &[("title", title.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// GET /search.json?q=..&limit=..
    #[tracing::instrument(level = "debug", skip(self))]
    async fn search(&self, term: &str, limit: u32) -> anyhow::Result<SearchResponse> {
        tracing::debug!(%term, limit, "GET search");
        self.fetch(
            "/search.json",
            &[("q", term.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    /// GET {key}.json
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_record(&self, key: &str) -> anyhow::Result<WorkRecord> {
        self.fetch(&format!("{}.json", key), &[]).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Build a cover URL. This does not perform a request.
/// Example: cover_url("https://covers.openlibrary.org", Some(240727), CoverSize::Medium)
pub fn cover_url(covers_base_url: &str, cover_id: Option<i64>, size: CoverSize) -> String {
    match cover_id {
        Some(id) if id > 0 => format!(
            "{}/b/id/{}-{}.jpg",
            covers_base_url.trim_end_matches('/'),
            id,
            size.suffix()
        ),
        _ => PLACEHOLDER_COVER_URL.to_string(),
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(rename = "numFound", default)]
    pub num_found: i64,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchDoc {
    #[serde(default)]
    pub key: String,
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    pub cover_i: Option<i64>,
    #[serde(deserialize_with = "crate::openlibrary::de::opt_i64_from_str_or_num", default)]
    pub first_publish_year: Option<i64>,
    pub ratings_average: Option<f64>,
    pub publisher: Option<Vec<String>>,
    pub subject: Option<Vec<String>>,
    pub number_of_pages_median: Option<i64>,
}

/// Extended record of a work or edition. Only the fields used to pick reading
/// options are typed; everything else is ignored.
#[derive(Debug, Deserialize, PartialEq)]
pub struct WorkRecord {
    #[serde(default)]
    pub covers: Vec<i64>,
    pub availability: Option<Availability>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct Availability {
    pub identifier: Option<String>,
}

/// Internal serde helpers
pub mod de {
    use serde::{Deserialize, Deserializer};

    /// Accept Option<i64> from either a number or a string like "1965"; null/"" -> None.
    pub fn opt_i64_from_str_or_num<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumOrStr {
            Num(i64),
            Str(String),
        }

        let val: Option<NumOrStr> = Option::deserialize(deserializer)?;
        Ok(match val {
            None => None,
            Some(NumOrStr::Num(n)) => Some(n),
            Some(NumOrStr::Str(s)) => s.trim().parse::<i64>().ok(),
        })
    }
}


#[cfg(test)]
pub mod stub;
