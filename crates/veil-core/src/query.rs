//! Query-string handling that preserves the original encoding
//!
//! `Url::query_pairs_mut` re-serializes every pair as form data, which turns
//! `%20` into `+` and rewrites parameters nobody asked to touch. The cleaner
//! instead keeps each `name=value` segment verbatim and only decodes the
//! name and value for comparisons.

use percent_encoding::percent_decode_str;
use url::form_urlencoded;
use url::Url;

/// One `name=value` segment of a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    raw: String,
    name: String,
    value: String,
}

impl QueryParam {
    /// Wrap a raw segment as it appears in the URL.
    pub fn from_raw(raw: &str) -> Self {
        let (name, value) = match raw.find('=') {
            Some(eq_pos) => (&raw[..eq_pos], &raw[eq_pos + 1..]),
            None => (raw, ""),
        };
        Self {
            raw: raw.to_string(),
            name: decode_component(name),
            value: decode_component(value),
        }
    }

    /// Build a segment from decoded parts.
    pub fn new(name: &str, value: &str) -> Self {
        let raw = form_urlencoded::Serializer::new(String::new())
            .append_pair(name, value)
            .finish();
        Self {
            raw,
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Decoded parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded parameter value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Lowercased decoded name, for case-insensitive comparisons.
    pub fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Form-style decoding: `+` is a space, then percent-decoding.
fn decode_component(text: &str) -> String {
    percent_decode_str(&text.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<QueryParam>,
}

impl QueryParams {
    /// Split a URL's query. Empty segments (`a=1&&b=2`) are dropped.
    pub fn from_url(url: &Url) -> Self {
        Self::parse(url.query().unwrap_or(""))
    }

    pub fn parse(query: &str) -> Self {
        let params = query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(QueryParam::from_raw)
            .collect();
        Self { params }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryParam> {
        self.params.iter()
    }

    /// First value for a name, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|param| param.name.eq_ignore_ascii_case(name))
            .map(QueryParam::value)
    }

    /// First non-empty value for a name.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .filter(|param| param.name.eq_ignore_ascii_case(name))
            .map(QueryParam::value)
            .find(|value| !value.is_empty())
    }

    pub fn push(&mut self, name: &str, value: &str) {
        self.params.push(QueryParam::new(name, value));
    }

    /// Keep only the parameters the predicate accepts. Returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&QueryParam) -> bool) -> usize {
        let before = self.params.len();
        self.params.retain(|param| keep(param));
        before - self.params.len()
    }

    /// Serialized query without the leading `?`, or `None` when empty.
    pub fn to_query(&self) -> Option<String> {
        if self.params.is_empty() {
            return None;
        }
        let raw: Vec<&str> = self.params.iter().map(QueryParam::raw).collect();
        Some(raw.join("&"))
    }

    /// Write the parameters back into a URL, clearing the query when empty.
    pub fn apply_to(&self, url: &mut Url) {
        url.set_query(self.to_query().as_deref());
    }
}

/// Parse a fragment shaped like a query (`#t=30&x=1`).
pub fn fragment_params(url: &Url) -> QueryParams {
    QueryParams::parse(url.fragment().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_segments_survive() {
        let mut url = Url::parse("https://example.com/?q=a%20b&utm_source=x&tag=%E2%9C%93").unwrap();
        let mut params = QueryParams::from_url(&url);
        assert_eq!(params.get("q"), Some("a b"));
        params.retain(|p| !p.key().starts_with("utm_"));
        params.apply_to(&mut url);
        assert_eq!(url.as_str(), "https://example.com/?q=a%20b&tag=%E2%9C%93");
    }

    #[test]
    fn test_names_are_decoded() {
        let params = QueryParams::parse("utm%5Fsource=x&UTM_Medium=y&flag");
        let keys: Vec<String> = params.iter().map(QueryParam::key).collect();
        assert_eq!(keys, vec!["utm_source", "utm_medium", "flag"]);
        assert_eq!(params.get("flag"), Some(""));
    }

    #[test]
    fn test_value_with_equals() {
        let params = QueryParams::parse("next=a%3Db=c&q=x+y");
        assert_eq!(params.get("next"), Some("a=b=c"));
        assert_eq!(params.get("q"), Some("x y"));
    }

    #[test]
    fn test_empty_query_is_cleared() {
        let mut url = Url::parse("https://example.com/path?a=1#frag").unwrap();
        let mut params = QueryParams::from_url(&url);
        assert_eq!(params.retain(|_| false), 1);
        params.apply_to(&mut url);
        assert_eq!(url.as_str(), "https://example.com/path#frag");
    }

    #[test]
    fn test_push_encodes() {
        let mut params = QueryParams::default();
        params.push("v", "VID123");
        params.push("t", "1m30s");
        assert_eq!(params.to_query().as_deref(), Some("v=VID123&t=1m30s"));
    }

    #[test]
    fn test_get_non_empty() {
        let params = QueryParams::parse("t=&t=42");
        assert_eq!(params.get("t"), Some(""));
        assert_eq!(params.get_non_empty("t"), Some("42"));
    }

    #[test]
    fn test_fragment_params() {
        let url = Url::parse("https://youtu.be/abc#t=1m30s").unwrap();
        assert_eq!(fragment_params(&url).get("t"), Some("1m30s"));
    }
}
