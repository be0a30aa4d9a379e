//! Conversation context extraction
//!
//! Pulls the last two turns from the host history and validates that they
//! form a user -> assistant pair. Stale or out-of-order history is rejected
//! rather than reinterpreted.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SuggestError;
use crate::ports::ChatHistory;

static LINE_BREAK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));
static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Plain text of the most recent exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContext {
    pub user_text: String,
    pub ai_text: String,
}

/// Fetch and validate the last user/assistant exchange.
pub fn extract(history: &dyn ChatHistory) -> Result<ExtractedContext, SuggestError> {
    let last_id = history.last_message_id();
    if last_id < 1 {
        return Err(SuggestError::ContextUnavailable(
            "fewer than two messages in the chat".to_string(),
        ));
    }

    let range = format!("{}-{}", last_id - 1, last_id);
    let turns = history.messages_in_range(&range);
    if turns.len() < 2 {
        return Err(SuggestError::ContextUnavailable(format!(
            "range query \"{range}\" returned {} turns",
            turns.len()
        )));
    }

    let (user_turn, ai_turn) = (&turns[0], &turns[1]);
    if user_turn.role != "user" || ai_turn.role != "assistant" {
        return Err(SuggestError::ContextUnavailable(format!(
            "expected user -> assistant, found {} -> {}",
            user_turn.role, ai_turn.role
        )));
    }

    let user_text = plain_text(&user_turn.message);
    let ai_text = plain_text(&ai_turn.message);
    if user_text.is_empty() || ai_text.is_empty() {
        return Err(SuggestError::EmptyExtractedText);
    }

    Ok(ExtractedContext { user_text, ai_text })
}

/// Flatten host message markup to plain text: line-break tags become
/// newlines, remaining tags are dropped, common entities are decoded,
/// and the result is trimmed.
pub fn plain_text(markup: &str) -> String {
    let with_breaks = LINE_BREAK_TAG.replace_all(markup, "\n");
    let stripped = MARKUP_TAG.replace_all(&with_breaks, "");
    decode_entities(&stripped).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod extractor_tests;
