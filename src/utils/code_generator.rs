//! Short code generation and validation utilities.
//!
//! Generated codes are 7 characters drawn from the 64-symbol URL-safe
//! alphabet `A-Z a-z 0-9 _ -`. Custom codes are accepted when they match
//! `^[A-Za-z0-9_-]{4,10}$`.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of system-generated codes.
pub const GENERATED_CODE_LENGTH: usize = 7;

/// URL-safe alphabet. Exactly 64 symbols so a byte masked with `0x3f`
/// indexes it without bias.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Compiled pattern for caller-supplied codes.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{4,10}$").expect("custom code pattern is valid"));

/// Codes that would be shadowed by fixed routes.
const RESERVED_CODES: &[&str] = &["health"];

/// Generates a random short code from the OS random source.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; GENERATED_CODE_LENGTH];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(buffer
        .iter()
        .map(|b| ALPHABET[usize::from(b & 0x3f)] as char)
        .collect())
}

/// Returns true if `code` only uses symbols from the generated alphabet
/// and has the generated length.
pub fn is_generated_shape(code: &str) -> bool {
    code.len() == GENERATED_CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 4-10 characters
/// - Allowed characters: ASCII letters, digits, `_` and `-`
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom shortcode must be 4-10 characters of letters, digits, '_' or '-'",
            json!({ "shortcode": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This shortcode is reserved",
            json!({ "shortcode": code }),
        ));
    }

    Ok(())
}
