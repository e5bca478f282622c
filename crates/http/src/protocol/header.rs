//! Case-insensitive header collection with HTTP multi-value semantics.
//!
//! [`HeaderCollection`] keeps exactly one value per lower-cased header name. Setting a
//! name that is already present appends the new value joined by `", "`, the way HTTP
//! folds repeated field lines; [`HeaderCollection::override_value`] replaces instead.
//!
//! Names are validated as RFC 9110 tokens. Values may carry any UTF-8 text but no
//! control characters other than tab, so nothing stored here can break the framing of
//! a serialized message.

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::codec::HeaderDecoder;
use crate::ensure;
use crate::protocol::{HeaderError, ParseError};

/// Separator used when a repeated header is folded into a single value
const VALUE_SEPARATOR: &[u8] = b", ";

/// Outcome of parsing a single header line with [`HeaderCollection::parse_one`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderStatus {
    /// No complete line is buffered yet, nothing was consumed
    Partial,
    /// A field line was parsed and stored
    Field { consumed: usize },
    /// The blank line closing the header block was consumed
    End { consumed: usize },
}

impl HeaderStatus {
    /// Number of bytes consumed from the input
    #[inline]
    pub fn consumed(&self) -> usize {
        match self {
            HeaderStatus::Partial => 0,
            HeaderStatus::Field { consumed } | HeaderStatus::End { consumed } => *consumed,
        }
    }

    /// Returns true if the header block terminator was reached
    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, HeaderStatus::End { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderCollection {
    inner: HeaderMap,
}

impl HeaderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, appending with `", "` if the name is already present.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError`] if `name` is not a token or `value` contains
    /// control characters.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let name = header_name(name)?;
        let value = match self.inner.get(&name) {
            Some(existing) => {
                let mut merged = Vec::with_capacity(existing.len() + VALUE_SEPARATOR.len() + value.len());
                merged.extend_from_slice(existing.as_bytes());
                merged.extend_from_slice(VALUE_SEPARATOR);
                merged.extend_from_slice(value.as_bytes());
                header_value(&name, &merged)?
            }
            None => header_value(&name, value.as_bytes())?,
        };

        self.inner.insert(name, value);
        Ok(())
    }

    /// Replaces any existing value of `name` with `value`.
    ///
    /// # Errors
    ///
    /// Same validation as [`HeaderCollection::set`].
    pub fn override_value(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let name = header_name(name)?;
        let value = header_value(&name, value.as_bytes())?;
        self.inner.insert(name, value);
        Ok(())
    }

    /// Looks up `name` case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).and_then(value_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Removes `name`, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.inner.remove(name).and_then(|value| value_str(&value).map(str::to_owned))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(lower-cased name, value)` pairs.
    ///
    /// Iteration order is not guaranteed to match insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(name, value)| (name.as_str(), value_str(value).unwrap_or_default()))
    }

    /// Parses one header line from the front of `src` into this collection.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidHeader`] if the line is malformed.
    pub fn parse_one(&mut self, src: &[u8]) -> Result<HeaderStatus, ParseError> {
        HeaderDecoder.decode_line(src, self)
    }
}

/// Checks whether `b` may appear in a header field name.
///
/// tchar = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
#[inline]
pub(crate) fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}

fn header_name(name: &str) -> Result<HeaderName, HeaderError> {
    let invalid = || HeaderError::InvalidName { name: name.to_owned() };
    ensure!(!name.is_empty() && name.bytes().all(is_token_char), invalid());
    HeaderName::from_bytes(name.as_bytes()).map_err(|_e| invalid())
}

fn header_value(name: &HeaderName, value: &[u8]) -> Result<HeaderValue, HeaderError> {
    let invalid =
        || HeaderError::InvalidValue { name: name.as_str().to_owned(), value: String::from_utf8_lossy(value).into_owned() };
    ensure!(value.iter().all(|b| *b == b'\t' || !b.is_ascii_control()), invalid());
    HeaderValue::from_bytes(value).map_err(|_e| invalid())
}

/// Values only ever get in through `&str`, so they are valid UTF-8.
fn value_str(value: &HeaderValue) -> Option<&str> {
    std::str::from_utf8(value.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_appends_repeated_values() {
        let mut headers = HeaderCollection::new();
        headers.set("Set-Cookie", "a").unwrap();
        headers.set("Set-Cookie", "b").unwrap();

        assert_eq!(headers.get("set-cookie"), Some("a, b"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = HeaderCollection::new();
        headers.set("Content-Type", "text/html").unwrap();

        assert_eq!(headers.get("content-type"), Some("text/html"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
        assert!(headers.contains("Content-type"));
        assert_eq!(headers.iter().next(), Some(("content-type", "text/html")));
    }

    #[test]
    fn override_replaces() {
        let mut headers = HeaderCollection::new();
        headers.set("Content-Type", "text/plain").unwrap();
        headers.override_value("content-type", "text/html").unwrap();

        assert_eq!(headers.get("Content-Type"), Some("text/html"));
    }

    #[test]
    fn remove_returns_value() {
        let mut headers = HeaderCollection::new();
        headers.set("Content-Length", "12").unwrap();

        assert_eq!(headers.remove("content-length"), Some("12".to_string()));
        assert!(headers.is_empty());
        assert_eq!(headers.remove("content-length"), None);
    }

    #[test]
    fn missing_header() {
        let headers = HeaderCollection::new();
        assert_eq!(headers.get("host"), None);
        assert_eq!(headers.get("not a header"), None);
    }

    #[test]
    fn rejects_invalid_names() {
        let mut headers = HeaderCollection::new();
        assert!(matches!(headers.set("H©st", "x"), Err(HeaderError::InvalidName { .. })));
        assert!(matches!(headers.set("Bad\\Name", "x"), Err(HeaderError::InvalidName { .. })));
        assert!(matches!(headers.set("", "x"), Err(HeaderError::InvalidName { .. })));
        assert!(matches!(headers.set("with space", "x"), Err(HeaderError::InvalidName { .. })));
        assert!(headers.is_empty());
    }

    #[test]
    fn rejects_values_that_break_framing() {
        let mut headers = HeaderCollection::new();
        assert!(matches!(headers.set("X-Evil", "a\r\nInjected: yes"), Err(HeaderError::InvalidValue { .. })));
        assert!(matches!(headers.override_value("X-Evil", "a\u{7f}b"), Err(HeaderError::InvalidValue { .. })));
        assert!(headers.set("X-Tabbed", "a\tb").is_ok());
    }

    #[test]
    fn non_ascii_values_round_trip() {
        let mut headers = HeaderCollection::new();
        headers.set("User-Agent", "caf\u{e9}").unwrap();
        headers.set("User-Agent", "\u{5b89}\u{5168}").unwrap();

        assert_eq!(headers.get("user-agent"), Some("caf\u{e9}, \u{5b89}\u{5168}"));
        assert_eq!(headers.iter().next(), Some(("user-agent", "caf\u{e9}, \u{5b89}\u{5168}")));
        assert_eq!(headers.remove("User-Agent"), Some("caf\u{e9}, \u{5b89}\u{5168}".to_string()));
    }

    #[test]
    fn token_chars() {
        for b in b"!#$%&'*+-.^_`|~azAZ09" {
            assert!(is_token_char(*b), "{} should be a token char", *b as char);
        }
        for b in b" :\\\"(),/;<=>?@[]{}\t" {
            assert!(!is_token_char(*b), "{} should not be a token char", *b as char);
        }
    }
}
