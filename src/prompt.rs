//! Prompt composition
//!
//! Fills the active preset's template with the extracted exchange. The two
//! placeholders may appear anywhere in the template, any number of times,
//! in either order; a template without them is passed through untouched.

use crate::error::SuggestError;
use crate::settings::Preset;

/// Placeholder replaced by the user's last message
pub const USER_PLACEHOLDER: &str = "{{user_last_reply}}";
/// Placeholder replaced by the assistant's last message
pub const AI_PLACEHOLDER: &str = "{{ai_last_reply}}";

/// Substitute both placeholders in a single left-to-right pass.
///
/// Substituted text is emitted verbatim and never rescanned, so user or
/// model text that happens to contain a placeholder stays literal. The
/// result is returned as-is: no trimming, no escaping.
pub fn compose(
    preset: Option<&Preset>,
    user_text: &str,
    ai_text: &str,
) -> Result<String, SuggestError> {
    let preset = preset.ok_or(SuggestError::NoActivePreset)?;
    let template = preset.content.as_str();

    let mut composed = String::with_capacity(template.len() + user_text.len() + ai_text.len());
    let mut rest = template;
    loop {
        let user_at = rest.find(USER_PLACEHOLDER);
        let ai_at = rest.find(AI_PLACEHOLDER);
        let (at, placeholder, value) = match (user_at, ai_at) {
            (Some(u), Some(a)) if u <= a => (u, USER_PLACEHOLDER, user_text),
            (Some(u), None) => (u, USER_PLACEHOLDER, user_text),
            (_, Some(a)) => (a, AI_PLACEHOLDER, ai_text),
            (None, None) => break,
        };
        composed.push_str(&rest[..at]);
        composed.push_str(value);
        rest = &rest[at + placeholder.len()..];
    }
    composed.push_str(rest);
    Ok(composed)
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod prompt_tests;
