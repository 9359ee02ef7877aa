// Mapping from catalog DTOs to domain models, plus the detail-view selection rules

use super::models::{BookSummary, ReadingOption, ReadingOptionKind};
use crate::openlibrary::{SearchDoc, SearchResponse, WorkRecord};

/// Books first published before this year are offered as public-domain downloads.
pub const PUBLIC_DOMAIN_CUTOFF_YEAR: i64 = 1928;
/// Maximum number of "similar books" shown in the detail view.
pub const SIMILAR_LIMIT: usize = 3;

const GUTENBERG_SEARCH_URL: &str = "https://www.gutenberg.org/ebooks/search/";
const ARCHIVE_DOWNLOAD_URL: &str = "https://archive.org/download";

/// Docs without a catalog key cannot be favorited or selected, so they are dropped.
pub fn map_doc(doc: SearchDoc) -> Option<BookSummary> {
    if doc.key.trim().is_empty() {
        return None;
    }
    Some(BookSummary {
        key: doc.key,
        title: doc.title.unwrap_or_default(),
        author_name: doc.author_name,
        cover_i: doc.cover_i,
        first_publish_year: doc.first_publish_year,
        ratings_average: doc.ratings_average,
        publisher: doc.publisher,
        subject: doc.subject,
        number_of_pages_median: doc.number_of_pages_median,
    })
}

pub fn map_search_response(resp: SearchResponse) -> Vec<BookSummary> {
    resp.docs.into_iter().filter_map(map_doc).collect()
}

/// The term used to look up similar books: first subject tag, else first author.
pub fn similar_term(book: &BookSummary) -> Option<&str> {
    book.subject
        .as_ref()
        .and_then(|s| s.first())
        .and_then(|s| non_blank(s))
        .or_else(|| book.author_name.first().and_then(|s| non_blank(s)))
}

fn non_blank(s: &str) -> Option<&str> {
    Some(s.trim()).filter(|t| !t.is_empty())
}

pub fn pick_similar(book_key: &str, candidates: Vec<BookSummary>) -> Vec<BookSummary> {
    candidates
        .into_iter()
        .filter(|b| b.key != book_key)
        .take(SIMILAR_LIMIT)
        .collect()
}

/// Decide which reading affordances to surface. `record` is `None` when the
/// extended record could not be fetched. Never returns an empty list.
pub fn reading_options(
    catalog_base_url: &str,
    book: &BookSummary,
    record: Option<&WorkRecord>,
) -> Vec<ReadingOption> {
    let catalog_page = format!("{}{}", catalog_base_url.trim_end_matches('/'), book.key);
    let mut options = Vec::new();

    if let Some(record) = record {
        if record.covers.iter().any(|id| *id > 0) {
            options.push(ReadingOption {
                kind: ReadingOptionKind::ReadOnline,
                label: "Read online".into(),
                url: catalog_page.clone(),
            });
        }

        if book
            .first_publish_year
            .is_some_and(|year| year < PUBLIC_DOMAIN_CUTOFF_YEAR)
        {
            if let Some(url) = gutenberg_search_url(&book.title) {
                options.push(ReadingOption {
                    kind: ReadingOptionKind::PublicDomainDownload,
                    label: "Download (public domain)".into(),
                    url,
                });
            }
        }

        let identifier = record
            .availability
            .as_ref()
            .and_then(|a| a.identifier.as_deref())
            .map(str::trim)
            .filter(|id| !id.is_empty());
        if let Some(id) = identifier {
            options.push(ReadingOption {
                kind: ReadingOptionKind::EpubDownload,
                label: "Download EPUB".into(),
                url: format!("{}/{}/{}.epub", ARCHIVE_DOWNLOAD_URL, id, id),
            });
        }
    }

    if options.is_empty() {
        options.push(ReadingOption {
            kind: ReadingOptionKind::ViewOnCatalog,
            label: "View on Open Library".into(),
            url: catalog_page,
        });
    }
    options
}

fn gutenberg_search_url(title: &str) -> Option<String> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    reqwest::Url::parse_with_params(GUTENBERG_SEARCH_URL, &[("query", title)])
        .ok()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openlibrary::Availability;

    fn record(covers: Vec<i64>, identifier: Option<&str>) -> WorkRecord {
        WorkRecord {
            covers,
            availability: identifier.map(|id| Availability {
                identifier: Some(id.into()),
            }),
        }
    }

    fn book(key: &str, year: Option<i64>) -> BookSummary {
        let mut b = BookSummary::new(key, "Pride and Prejudice");
        b.first_publish_year = year;
        b
    }

    #[test]
    fn doc_without_key_is_dropped() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"docs":[{"title":"No key"},{"key":"/works/OL2W","title":"Kept"}]}"#,
        )
        .unwrap();
        let books = map_search_response(resp);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].key, "/works/OL2W");
        assert_eq!(books[0].title, "Kept");
    }

    #[test]
    fn similar_term_prefers_subject_then_author() {
        let mut b = BookSummary::new("/works/OL1W", "Dune");
        assert_eq!(similar_term(&b), None);
        b.author_name = vec!["Frank Herbert".into()];
        assert_eq!(similar_term(&b), Some("Frank Herbert"));
        b.subject = Some(vec!["Science fiction".into(), "Deserts".into()]);
        assert_eq!(similar_term(&b), Some("Science fiction"));
    }

    #[test]
    fn blank_subject_falls_back_to_author() {
        let mut b = BookSummary::new("/works/OL1W", "Dune");
        b.subject = Some(vec!["   ".into()]);
        b.author_name = vec![" Frank Herbert ".into()];
        assert_eq!(similar_term(&b), Some("Frank Herbert"));

        b.author_name = vec!["".into()];
        assert_eq!(similar_term(&b), None);
    }

    #[test]
    fn similar_excludes_self_and_caps_at_three() {
        let candidates = ["/works/A", "/works/SELF", "/works/B", "/works/C", "/works/D"]
            .iter()
            .map(|k| BookSummary::new(*k, "t"))
            .collect();
        let picked = pick_similar("/works/SELF", candidates);
        let keys: Vec<_> = picked.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["/works/A", "/works/B", "/works/C"]);
    }

    #[test]
    fn missing_record_degrades_to_single_default() {
        let book = book("/works/OL1W", Some(1813));
        let opts = reading_options("https://openlibrary.org", &book, None);
        assert_eq!(opts.len(), 1);
        assert_eq!(opts[0].kind, ReadingOptionKind::ViewOnCatalog);
        assert_eq!(opts[0].url, "https://openlibrary.org/works/OL1W");
    }

    #[test]
    fn all_rules_apply_to_old_available_book() {
        let rec = record(vec![8739161], Some("prideprejudice00aust"));
        let book = book("/works/OL1W", Some(1813));
        let opts = reading_options("https://openlibrary.org/", &book, Some(&rec));
        let kinds: Vec<_> = opts.iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ReadingOptionKind::ReadOnline,
                ReadingOptionKind::PublicDomainDownload,
                ReadingOptionKind::EpubDownload,
            ]
        );
        assert_eq!(
            opts[1].url,
            "https://www.gutenberg.org/ebooks/search/?query=Pride+and+Prejudice"
        );
        assert_eq!(
            opts[2].url,
            "https://archive.org/download/prideprejudice00aust/prideprejudice00aust.epub"
        );
    }

    #[test]
    fn recent_book_without_covers_falls_back_to_default() {
        let rec = record(vec![-1], None);
        let book = book("/works/OL1W", Some(1965));
        let opts = reading_options("https://openlibrary.org", &book, Some(&rec));
        assert_eq!(opts.len(), 1);
        assert_eq!(opts[0].kind, ReadingOptionKind::ViewOnCatalog);
    }

    #[test]
    fn cutoff_year_is_exclusive() {
        let rec = record(vec![], None);
        let opts = reading_options(
            "https://openlibrary.org",
            &book("/works/OL1W", Some(PUBLIC_DOMAIN_CUTOFF_YEAR)),
            Some(&rec),
        );
        assert!(
            opts.iter()
                .all(|o| o.kind != ReadingOptionKind::PublicDomainDownload)
        );
    }
}
