use chrono::{DateTime, SecondsFormat, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except RFC 3986 unreserved characters is escaped, so a space
/// becomes `%20` rather than `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const DEFAULT_PER_PAGE: u32 = 30;
pub const DEFAULT_PAGE: u32 = 1;

/// Page selection shared by every list endpoint. Defaults match GitHub's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub per_page: u32,
    pub page: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page: DEFAULT_PAGE,
        }
    }
}

impl ListOptions {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    pub fn query_string(&self) -> String {
        pagination_query(None, Some(self.per_page), Some(self.page))
    }
}

/// Joins `key=value` pairs in slice order, skipping absent and empty values.
pub fn build_query_string(params: &[(&str, Option<String>)]) -> String {
    params
        .iter()
        .filter_map(|(key, value)| {
            let value = value.as_deref().filter(|value| !value.is_empty())?;
            Some(format!("{}={}", encode(key), encode(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub fn pagination_query(since: Option<String>, per_page: Option<u32>, page: Option<u32>) -> String {
    build_query_string(&[
        ("since", since),
        ("per_page", per_page.map(|value| value.to_string())),
        ("page", page.map(|value| value.to_string())),
    ])
}

pub fn format_since(since: &DateTime<Utc>) -> String {
    since.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn with_query(path: String, query: &str) -> String {
    if query.is_empty() {
        path
    } else {
        format!("{path}?{query}")
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}
