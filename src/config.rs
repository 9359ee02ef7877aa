use std::str::FromStr;

#[derive(Debug)]
pub struct Config {
    pub open_library_base_url: String,
    pub covers_base_url: String,
    pub db_connection_string: String,
    pub bind_addr: String,
    pub search_limit: u32,
    pub toast_ttl_secs: i64,
}

const DEFAULT_OPEN_LIBRARY_BASE_URL: &str = "https://openlibrary.org";
const DEFAULT_COVERS_BASE_URL: &str = "https://covers.openlibrary.org";
const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://openshelf.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SEARCH_LIMIT: u32 = 12;
const DEFAULT_TOAST_TTL_SECS: i64 = 3;
const MAX_TOAST_TTL_SECS: i64 = 24 * 60 * 60;

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.into());
        Config {
            open_library_base_url: string_or(
                "OPEN_LIBRARY_BASE_URL",
                DEFAULT_OPEN_LIBRARY_BASE_URL,
            ),
            covers_base_url: string_or("COVERS_BASE_URL", DEFAULT_COVERS_BASE_URL),
            db_connection_string: string_or("DB_CONNECTION_STRING", DEFAULT_DB_CONNECTION_STRING),
            bind_addr: string_or("BIND_ADDR", DEFAULT_BIND_ADDR),
            search_limit: parse_or("SEARCH_LIMIT", lookup("SEARCH_LIMIT"), DEFAULT_SEARCH_LIMIT),
            toast_ttl_secs: parse_or(
                "TOAST_TTL_SECS",
                lookup("TOAST_TTL_SECS"),
                DEFAULT_TOAST_TTL_SECS,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.open_library_base_url.trim().is_empty() {
            return Err("OPEN_LIBRARY_BASE_URL is empty".into());
        }
        if self.covers_base_url.trim().is_empty() {
            return Err("COVERS_BASE_URL is empty".into());
        }
        if self.search_limit == 0 {
            return Err("SEARCH_LIMIT must be at least 1".into());
        }
        if !(0..=MAX_TOAST_TTL_SECS).contains(&self.toast_ttl_secs) {
            return Err(format!(
                "TOAST_TTL_SECS must be between 0 and {}",
                MAX_TOAST_TTL_SECS
            ));
        }
        Ok(())
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(%name, value = %raw, %default, "invalid number, using default");
            default
        }),
    }
}
