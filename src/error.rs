use thiserror::Error;

/// Failures that can abort a generation run or reject a settings mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestError {
    /// Fewer than two turns exist, or the last two are not a user -> assistant pair
    #[error("Conversation context unavailable: {0}")]
    ContextUnavailable(String),

    /// A turn's text was empty after markup stripping
    #[error("Extracted message text was empty")]
    EmptyExtractedText,

    /// No preset is selected (empty preset list)
    #[error("No active prompt preset")]
    NoActivePreset,

    /// The completion endpoint answered with a non-success status
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure (connection refused, timeout, DNS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not contain choices[0].message.content as a string
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// No bracket tokens survived parsing
    #[error("No 【】 suggestions found in the model output")]
    ParseEmpty,

    /// Settings could not be read from or written to the host store (non-fatal)
    #[error("Settings persistence failed: {0}")]
    Persistence(String),

    /// A preset index passed to a settings mutator was out of range
    #[error("Preset index {0} is out of range")]
    PresetIndexOutOfRange(usize),

    /// Deleting the only remaining preset is rejected
    #[error("Cannot delete the last remaining preset")]
    LastPreset,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
