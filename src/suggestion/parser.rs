//! Suggestion parsing for model responses
//!
//! The prompt contract asks the model for a single line of suggestions, each
//! wrapped in full-width brackets:
//!
//! ```text
//! 【Draw my sword!】【Is it hurt?】【Hide, quickly!】
//! ```
//!
//! Everything outside the brackets is ignored. An empty result is a failure,
//! not an empty success: it means the model did not honor the contract.

use memchr::memmem;

use crate::error::SuggestError;

/// Full-width bracket pair wrapping each suggestion
const OPEN: &str = "【";
const CLOSE: &str = "】";

/// Collect all non-overlapping 【...】 tokens in order of appearance.
///
/// Bracket characters are stripped and tokens trimmed; tokens empty after
/// trimming are dropped. Fails with [`SuggestError::ParseEmpty`] when
/// nothing survives.
pub fn parse_suggestions(raw: &str) -> Result<Vec<String>, SuggestError> {
    let open = memmem::Finder::new(OPEN.as_bytes());
    let close = memmem::Finder::new(CLOSE.as_bytes());
    let bytes = raw.as_bytes();

    let mut suggestions = Vec::new();
    let mut pos = 0;
    while let Some(found) = open.find(&bytes[pos..]) {
        // Offsets land on char boundaries: the delimiters are whole UTF-8
        // sequences, so slicing the str here is safe.
        let start = pos + found + OPEN.len();
        let Some(length) = close.find(&bytes[start..]) else {
            break;
        };
        let end = start + length;
        let token = raw[start..end].trim();
        if !token.is_empty() {
            suggestions.push(token.to_string());
        }
        pos = end + CLOSE.len();
    }

    if suggestions.is_empty() {
        return Err(SuggestError::ParseEmpty);
    }
    Ok(suggestions)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
