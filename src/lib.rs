//! replyhint: reply-suggestion engine for chat frontends
//!
//! After each assistant turn, the engine gathers the last user/assistant
//! exchange, fills the active prompt preset's template, asks an
//! OpenAI-compatible chat-completion endpoint for a reply, and extracts the
//! 【】-delimited suggestion tokens for the host UI to render. Preset choice
//! is tracked per conversation character and persisted through the host's
//! key-value store.
//!
//! The host platform is reached exclusively through the traits in [`ports`];
//! [`runtime::PluginRuntime`] is the event-driven entry point an adapter
//! wires the host's lifecycle bus into.

pub mod context;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod prompt;
pub mod provider;
pub mod runtime;
pub mod settings;
pub mod suggestion;

#[cfg(test)]
pub mod test_utils;

pub use error::SuggestError;
pub use pipeline::GenerationPipeline;
pub use ports::{ChatEvent, LogLevel};
pub use provider::{ApiConfig, CompletionClient, OpenAiClient};
pub use runtime::{HostPorts, PluginRuntime};
pub use settings::{DisplayMode, Preset, Settings, SettingsService};
