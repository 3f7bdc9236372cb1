//! MIME header parsing.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// A `name: value` header line. The name runs up to the first colon and
/// may not contain whitespace.
#[allow(clippy::unwrap_used)]
static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s:]+):(.*)$").unwrap());

/// Header name to value mapping.
///
/// Names are stored exactly as written. A duplicated name keeps the last
/// value seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    headers: HashMap<String, String>,
}

impl HeaderMap {
    /// Creates a new empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value, replacing any previous value for that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Gets a header value by its exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Gets a header value, preferring the exact name and falling back to an
    /// ASCII case-insensitive match.
    ///
    /// When several stored names differ only in case, none of them exact,
    /// the lexicographically smallest name wins.
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.get(name).or_else(|| {
            self.headers
                .iter()
                .filter(|(key, _)| key.eq_ignore_ascii_case(name))
                .min_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns an iterator over all headers.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.get_ignore_case("From")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.get_ignore_case("To")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.get_ignore_case("Subject")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.get_ignore_case("Date")
    }

    /// Builds a header map from protocol-supplied header values, keeping
    /// the first value of any multi-valued header.
    pub fn from_structured<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a HeaderValue)>,
    {
        headers
            .into_iter()
            .filter_map(|(name, value)| value.first().map(|v| (name.clone(), v.to_string())))
            .collect()
    }
}

impl FromIterator<(String, String)> for HeaderMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            headers: iter.into_iter().collect(),
        }
    }
}

/// A header value as supplied by a mail-retrieval client, which may report
/// a header once or as a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    /// A single value.
    Single(String),
    /// Several values for the same header name.
    Multiple(Vec<String>),
}

impl HeaderValue {
    /// Returns the first value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(values) => values.first().map(String::as_str),
        }
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

fn split_header_line(line: &str) -> Option<(&str, &str)> {
    let caps = HEADER_LINE.captures(line)?;
    let name = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str().trim();
    Some((name, value))
}

/// Parses a header block whose lines may be folded.
///
/// A line starting with a space or tab continues the previous header; its
/// trimmed content is appended after a single space. Empty lines and lines
/// that are neither headers nor continuations are skipped.
#[must_use]
pub fn parse_block(text: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines() {
        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = current.as_mut() {
                let continuation = line.trim();
                if !continuation.is_empty() {
                    value.push(' ');
                    value.push_str(continuation);
                }
            }
            continue;
        }

        if let Some((name, value)) = split_header_line(line) {
            if let Some((previous, folded)) = current.take() {
                headers.insert(previous, folded.trim().to_string());
            }
            current = Some((name.to_string(), value.to_string()));
        }
    }

    if let Some((name, value)) = current {
        headers.insert(name, value.trim().to_string());
    }

    headers
}

/// Parses a header block where every header fits on one line.
///
/// Used for MIME part headers. Lines that are not `name: value` pairs are
/// ignored.
#[must_use]
pub fn parse_simple(text: &str) -> HeaderMap {
    text.lines()
        .filter_map(split_header_line)
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block() {
        let text = concat!(
            "From: sender@example.com\r\n",
            "To: recipient@example.com\r\n",
            "Subject: Test Message\r\n",
            "Content-Type: text/plain;\r\n",
            " charset=utf-8\r\n",
        );

        let headers = parse_block(text);
        assert_eq!(headers.len(), 4);
        assert_eq!(headers.from(), Some("sender@example.com"));
        assert_eq!(headers.to(), Some("recipient@example.com"));
        assert_eq!(headers.subject(), Some("Test Message"));
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
    }

    #[test]
    fn test_parse_block_folded_subject() {
        let headers = parse_block("Subject: Hello\r\n World\r\n");
        assert_eq!(headers.get("Subject"), Some("Hello World"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_parse_block_tab_and_multiple_continuations() {
        let headers = parse_block("Received: from a\r\n\tby b\r\n    with c\r\nX-Other: 1");
        assert_eq!(headers.get("Received"), Some("from a by b with c"));
        assert_eq!(headers.get("X-Other"), Some("1"));
    }

    #[test]
    fn test_parse_block_skips_noise() {
        let text = "garbage line\r\n continuation without header\r\n\r\nDate: today\r\n";
        let headers = parse_block(text);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.date(), Some("today"));
    }

    #[test]
    fn test_parse_block_last_duplicate_wins() {
        let headers = parse_block("X-Tag: one\r\nX-Tag: two\r\n");
        assert_eq!(headers.get("X-Tag"), Some("two"));
    }

    #[test]
    fn test_parse_block_keeps_case() {
        let headers = parse_block("content-type: text/html\r\n");
        assert_eq!(headers.get("Content-Type"), None);
        assert_eq!(headers.get("content-type"), Some("text/html"));
        assert_eq!(headers.get_ignore_case("Content-Type"), Some("text/html"));
    }

    #[test]
    fn test_get_ignore_case_is_deterministic() {
        let headers = parse_block(concat!(
            "content-type: text/plain\r\n",
            "CONTENT-TYPE: text/html\r\n",
            "Content-type: image/png\r\n",
        ));
        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get_ignore_case("Content-type"), Some("image/png"));
        // No exact match: "CONTENT-TYPE" sorts first.
        assert_eq!(headers.get_ignore_case("Content-Type"), Some("text/html"));
        assert_eq!(headers.get_ignore_case("content-TYPE"), Some("text/html"));
    }

    #[test]
    fn test_parse_block_empty_value() {
        let headers = parse_block("X-Empty:\r\nSubject:  spaced  \r\n");
        assert_eq!(headers.get("X-Empty"), Some(""));
        assert_eq!(headers.get("Subject"), Some("spaced"));
    }

    #[test]
    fn test_parse_simple() {
        let text = "Content-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: base64";
        let headers = parse_simple(text);
        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(headers.get("Content-Transfer-Encoding"), Some("base64"));
    }

    #[test]
    fn test_parse_simple_does_not_fold() {
        let headers = parse_simple("Content-Type: text/plain;\r\n charset=utf-8\r\n");
        assert_eq!(headers.get("Content-Type"), Some("text/plain;"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_header_value_first() {
        assert_eq!(HeaderValue::from("a").first(), Some("a"));
        assert_eq!(
            HeaderValue::from(vec!["x".to_string(), "y".to_string()]).first(),
            Some("x")
        );
        assert_eq!(HeaderValue::Multiple(Vec::new()).first(), None);
    }

    #[test]
    fn test_from_structured() {
        let mut raw = HashMap::new();
        raw.insert("Subject".to_string(), HeaderValue::from("Hi"));
        raw.insert(
            "Received".to_string(),
            HeaderValue::from(vec!["first".to_string(), "second".to_string()]),
        );
        raw.insert("X-Empty".to_string(), HeaderValue::Multiple(Vec::new()));

        let headers = HeaderMap::from_structured(&raw);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Subject"), Some("Hi"));
        assert_eq!(headers.get("Received"), Some("first"));
    }
}
