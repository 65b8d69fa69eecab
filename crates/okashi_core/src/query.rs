use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Bytes left untouched when encoding the keyword: the RFC 3986 unreserved
/// set. Everything else is percent-encoded, so a keyword can never smuggle
/// extra query parameters into the request.
const KEYWORD_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Fixed request parameters for the snack-search service. Only the
/// endpoint is expected to change outside production, and only in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Base endpoint the query string is appended to.
    pub endpoint: String,
    pub api_key: String,
    pub max_results: u32,
    /// Ordering flag understood by the service; `r` is randomized.
    pub order: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://www.sysbird.jp/toriko/api/".to_string(),
            api_key: "guest".to_string(),
            max_results: 10,
            order: "r".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("assembled search request is not a valid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Builds the full request URL for one keyword search.
///
/// Parameter order is fixed: apikey, format, keyword, max, order. Only the
/// keyword varies between calls with the same config.
pub fn build_search_url(config: &SearchConfig, keyword: &str) -> Result<Url, QueryError> {
    let encoded = utf8_percent_encode(keyword, KEYWORD_SAFE);
    let raw = format!(
        "{}?apikey={}&format=json&keyword={}&max={}&order={}",
        config.endpoint, config.api_key, encoded, config.max_results, config.order
    );
    Ok(Url::parse(&raw)?)
}
