//! Target URL validation.
//!
//! Any absolute URL is an acceptable redirect target except for schemes that
//! run or read content in the visitor's browser. Links keep the URL as
//! submitted unless it contains characters that cannot appear in a
//! `Location` header, in which case the parser's serialization is stored.

use url::Url;

/// Schemes refused as redirect targets.
const DENIED_SCHEMES: [&str; 4] = ["javascript", "data", "vbscript", "file"];

/// Errors produced while validating a target URL.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("The '{0}' scheme is not allowed")]
    DeniedScheme(String),
}

/// Checks that `input` is an absolute URL with an allowed scheme.
///
/// Relative references fail to parse and are rejected as
/// [`UrlValidationError::InvalidFormat`]. `javascript:`, `data:`,
/// `vbscript:` and `file:` are rejected as [`UrlValidationError::DeniedScheme`].
pub fn validate_target_url(input: &str) -> Result<Url, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url =
        Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if DENIED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlValidationError::DeniedScheme(url.scheme().to_string()));
    }

    Ok(url)
}

/// Validates `input` and returns the string to store as the link target.
///
/// The trimmed input is kept verbatim when it is plain visible ASCII.
/// Otherwise (control characters, spaces, non-ASCII) the parsed URL's
/// serialization is used, which strips tabs and newlines and percent-encodes
/// the rest, so the stored target is always a valid header value.
pub fn normalize_target_url(input: &str) -> Result<String, UrlValidationError> {
    let url = validate_target_url(input)?;
    let trimmed = input.trim();

    if trimmed.bytes().all(|b| b.is_ascii_graphic()) {
        Ok(trimmed.to_string())
    } else {
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_absolute_urls() {
        assert!(validate_target_url("https://example.com").is_ok());
        assert!(validate_target_url("http://example.com/path?q=1#frag").is_ok());
        assert!(validate_target_url("https://localhost:8080").is_ok());
        assert!(validate_target_url("https://192.168.0.1/admin").is_ok());
        assert!(validate_target_url("ftp://example.com/file").is_ok());
        assert!(validate_target_url("mailto:a@b.c").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_target_url(""), Err(UrlValidationError::Empty));
        assert_eq!(validate_target_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_relative_and_garbage() {
        assert!(matches!(
            validate_target_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_target_url("/relative/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_target_url("http://"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_denied_schemes() {
        for (input, scheme) in [
            ("javascript:alert(1)", "javascript"),
            ("JavaScript:alert(1)", "javascript"),
            ("data:text/html,hi", "data"),
            ("file:///etc/passwd", "file"),
        ] {
            assert_eq!(
                validate_target_url(input),
                Err(UrlValidationError::DeniedScheme(scheme.to_string())),
                "{input}"
            );
        }
    }

    #[test]
    fn test_normalize_keeps_plain_urls_verbatim() {
        assert_eq!(
            normalize_target_url("  https://example.com  ").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            normalize_target_url("https://example.com/a?b=c%20d").unwrap(),
            "https://example.com/a?b=c%20d"
        );
    }

    #[test]
    fn test_normalize_makes_targets_header_safe() {
        assert_eq!(
            normalize_target_url("https://example.com/a\nb").unwrap(),
            "https://example.com/ab"
        );
        assert_eq!(
            normalize_target_url("https://example.com/a b").unwrap(),
            "https://example.com/a%20b"
        );
        assert_eq!(
            normalize_target_url("https://example.com/ü").unwrap(),
            "https://example.com/%C3%BC"
        );
    }
}
