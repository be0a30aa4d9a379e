//! Host collaborator interfaces
//!
//! The embedding layer supplies adapters for these traits; the core never
//! talks to the host platform directly. Adapters are expected to be cheap
//! shims over the host's message store, key-value storage, event bus, and
//! suggestion UI.

use async_trait::async_trait;

use crate::error::SuggestError;
use crate::settings::DisplayMode;

/// One turn fetched from the host message store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub message: String,
}

/// Identity of the conversation character currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterInfo {
    /// Stable identifier used as the binding key
    pub id: String,
    /// Display name, used in diagnostics only
    pub name: String,
}

/// Severity tags understood by the host diagnostic panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

/// Lifecycle events the host adapter forwards to [`crate::runtime::PluginRuntime::handle_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEvent {
    /// The assistant finished generating a reply
    GenerationEnded,
    /// The chat or active character changed
    ChatChanged,
    MessageSent,
    MessageDeleted,
    MessageSwiped,
}

/// Read-only view of the host conversation history
pub trait ChatHistory: Send + Sync {
    /// Highest message id in the current chat; 0 means fewer than one exchange exists
    fn last_message_id(&self) -> i64;

    /// Messages in the inclusive range formatted as `"lo-hi"`
    fn messages_in_range(&self, range: &str) -> Vec<ChatMessage>;
}

/// Persisted key-value storage scoped to a process-wide namespace
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SuggestError>;
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), SuggestError>;
}

/// Supplies the character the user is currently talking to
pub trait CharacterSource: Send + Sync {
    fn active_character(&self) -> Option<CharacterInfo>;
}

/// Where rendered suggestion capsules go
pub trait SuggestionSink: Send + Sync {
    fn render(&self, suggestions: &[String], mode: DisplayMode);

    /// Remove any capsules currently displayed. Must be idempotent.
    fn clear(&self);
}

/// Dispatches a chosen suggestion as if the user had typed it
///
/// Quoting and escaping of arbitrary user/model text are the adapter's
/// responsibility, not the core's.
pub trait SendTarget: Send + Sync {
    fn send_text(&self, text: &str) -> Result<(), String>;
}

/// Receives the per-run audit trail: step outcomes, the composed prompt, and
/// the raw model output
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, level: LogLevel, message: &str);
}
