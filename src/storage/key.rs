//! Storage keys for cover images.
//!
//! A key has the shape `<prefix>/<unix millis>_<file name>`. The public URL of an object is the
//! bucket's base URL followed by the key with every segment percent-encoded; [`parse_key`] is the
//! inverse of [`public_url`].

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use crate::core::library::{LibraryError, LibraryResult};

// RFC 3986 unreserved characters stay as they are
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builds the key for a freshly uploaded file. Only the last path segment of the original name
/// is kept so a client cannot place objects outside the prefix.
pub fn derive_key(prefix: &str, unix_millis: i64, original_name: &str) -> String {
    let name = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or("unnamed");
    format!("{}/{}_{}", prefix.trim_matches('/'), unix_millis, name)
}

pub fn public_url(base_url: &str, key: &str) -> String {
    let encoded = key
        .split('/')
        .map(|segment| utf8_percent_encode(segment, KEY_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", base_url.trim_end_matches('/'), encoded)
}

/// Recovers the storage key from a public URL.
///
/// The URL must start with `base_url` followed by `/`. Query string and fragment are ignored,
/// the rest is percent-decoded and has to name an object under `<prefix>/`. Anything else is a
/// validation error: the URL does not point into this catalog's bucket.
pub fn parse_key(url: &str, base_url: &str, prefix: &str) -> LibraryResult<String> {
    let base = base_url.trim_end_matches('/');
    let path = url.trim()
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| LibraryError::validation(
            format!("image url {} is not under {}", url, base).as_str(), Some("storage_key".to_string())))?;
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
    let key = percent_decode_str(path)
        .decode_utf8()
        .map_err(|err| LibraryError::validation(
            format!("image url {} is not valid utf-8: {}", url, err).as_str(), Some("storage_key".to_string())))?
        .to_string();
    let prefix = format!("{}/", prefix.trim_matches('/'));
    match key.strip_prefix(prefix.as_str()) {
        Some(name) if !name.is_empty() => Ok(key),
        _ => Err(LibraryError::validation(
            format!("image url {} does not name an object under {}", url, prefix).as_str(), Some("storage_key".to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::key::{derive_key, parse_key, public_url};

    const BASE: &str = "https://bucket.example.com";

    #[tokio::test]
    async fn test_should_derive_key() {
        assert_eq!("books/1730000000000_cover.png", derive_key("books", 1730000000000, "cover.png"));
        assert_eq!("books/5_cover.png", derive_key("/books/", 5, "../../etc/cover.png"));
        assert_eq!("books/5_cover.png", derive_key("books", 5, "C:\\Users\\me\\cover.png"));
        assert_eq!("books/5_unnamed", derive_key("books", 5, ""));
        assert_eq!("books/5_unnamed", derive_key("books", 5, "dir/.."));
    }

    #[tokio::test]
    async fn test_should_build_public_url() {
        assert_eq!("https://bucket.example.com/books/1_a.png", public_url(BASE, "books/1_a.png"));
        assert_eq!("https://bucket.example.com/books/1_my%20cover%2B1.png", public_url("https://bucket.example.com/", "books/1_my cover+1.png"));
    }

    #[tokio::test]
    async fn test_should_parse_key() {
        assert_eq!("books/1_a.png", parse_key("https://bucket.example.com/books/1_a.png", BASE, "books").expect("should parse"));
        assert_eq!("books/1_my cover+1.png", parse_key("https://bucket.example.com/books/1_my%20cover%2B1.png", BASE, "books").expect("should parse"));
        assert_eq!("books/1_a.png", parse_key("https://bucket.example.com/books/1_a.png?x-id=1#top", BASE, "books").expect("should parse"));
    }

    #[tokio::test]
    async fn test_should_invert_public_url() {
        let key = derive_key("books", 1730000000000, "Été & co.png");
        assert_eq!(key, parse_key(public_url(BASE, key.as_str()).as_str(), BASE, "books").expect("should parse"));
    }

    #[tokio::test]
    async fn test_should_reject_foreign_urls() {
        assert!(parse_key("https://other.example.com/books/1_a.png", BASE, "books").is_err());
        assert!(parse_key("https://bucket.example.com.evil.io/books/1_a.png", BASE, "books").is_err());
        assert!(parse_key("https://bucket.example.com/avatars/1_a.png", BASE, "books").is_err());
        assert!(parse_key("https://bucket.example.com/books/", BASE, "books").is_err());
        assert!(parse_key("https://bucket.example.com/books/%FF", BASE, "books").is_err());
        assert!(parse_key("", BASE, "books").is_err());
    }
}
