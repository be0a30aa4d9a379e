//! Host event wiring
//!
//! Translates host lifecycle events into pipeline runs, binding resolution,
//! and suggestion cleanup, and exposes the entry points the host settings
//! panel calls. The host adapter owns the actual event bus; it forwards each
//! event to [`PluginRuntime::handle_event`].

use std::sync::Arc;

use crate::error::SuggestError;
use crate::pipeline::GenerationPipeline;
use crate::ports::{
    CharacterSource, ChatEvent, ChatHistory, DiagnosticSink, KeyValueStore, LogLevel, SendTarget,
    SuggestionSink,
};
use crate::provider::CompletionClient;
use crate::settings::{BindingOutcome, PresetBindingManager, SettingsService};

/// Adapters the embedding layer supplies
pub struct HostPorts {
    pub history: Arc<dyn ChatHistory>,
    pub store: Arc<dyn KeyValueStore>,
    pub characters: Arc<dyn CharacterSource>,
    pub client: Arc<dyn CompletionClient>,
    pub sink: Arc<dyn SuggestionSink>,
    pub sender: Arc<dyn SendTarget>,
    pub diag: Arc<dyn DiagnosticSink>,
}

pub struct PluginRuntime {
    settings: Arc<SettingsService>,
    bindings: PresetBindingManager,
    pipeline: GenerationPipeline,
    characters: Arc<dyn CharacterSource>,
    sink: Arc<dyn SuggestionSink>,
    sender: Arc<dyn SendTarget>,
    diag: Arc<dyn DiagnosticSink>,
}

impl PluginRuntime {
    /// Build the runtime, load persisted settings, and resolve the binding
    /// for the character currently on screen.
    pub async fn init(ports: HostPorts) -> Self {
        let settings = Arc::new(SettingsService::new(ports.store, ports.diag.clone()));
        let runtime = PluginRuntime {
            bindings: PresetBindingManager::new(settings.clone()),
            pipeline: GenerationPipeline::new(
                settings.clone(),
                ports.history,
                ports.client,
                ports.sink.clone(),
                ports.diag.clone(),
            ),
            settings,
            characters: ports.characters,
            sink: ports.sink,
            sender: ports.sender,
            diag: ports.diag,
        };
        runtime.settings.load().await;
        runtime.apply_character_binding().await;
        runtime
            .diag
            .record(LogLevel::Success, "Reply suggestions initialized.");
        runtime
    }

    /// The settings service, for host panels that edit configuration directly.
    pub fn settings(&self) -> &Arc<SettingsService> {
        &self.settings
    }

    /// Dispatch one host lifecycle event.
    pub async fn handle_event(&self, event: ChatEvent) {
        match event {
            ChatEvent::GenerationEnded => self.pipeline.run().await,
            ChatEvent::ChatChanged => {
                self.sink.clear();
                self.apply_character_binding().await;
            }
            ChatEvent::MessageSent | ChatEvent::MessageDeleted | ChatEvent::MessageSwiped => {
                self.sink.clear();
            }
        }
    }

    /// Re-resolve the active preset for the current character.
    pub async fn apply_character_binding(&self) {
        let Some(character) = self.characters.active_character() else {
            return;
        };
        let resolution = self.bindings.resolve_for_character(&character.id).await;
        if !resolution.changed {
            return;
        }
        let preset_name = self
            .settings
            .read(|s| s.prompts.get(resolution.active_index).map(|p| p.name.clone()))
            .unwrap_or_default();
        match resolution.outcome {
            BindingOutcome::Bound => self.diag.record(
                LogLevel::Success,
                &format!(
                    "Character \"{}\": applied bound preset \"{preset_name}\".",
                    character.name
                ),
            ),
            BindingOutcome::Default => self.diag.record(
                LogLevel::Info,
                &format!(
                    "Character \"{}\": no valid binding, using default preset \"{preset_name}\".",
                    character.name
                ),
            ),
        }
    }

    /// Bind the current character to the preset at `index` and make it active.
    /// Without a character on screen this is a no-op.
    pub async fn bind_active_character(&self, index: usize) -> Result<(), SuggestError> {
        let Some(character) = self.characters.active_character() else {
            return Ok(());
        };
        self.bindings.bind(&character.id, index).await?;
        let preset_name = self
            .settings
            .read(|s| s.prompts.get(index).map(|p| p.name.clone()))
            .unwrap_or_default();
        self.diag.record(
            LogLevel::Success,
            &format!(
                "Bound character \"{}\" to preset \"{preset_name}\".",
                character.name
            ),
        );
        Ok(())
    }

    /// Delete a preset, then re-resolve the active index for the current
    /// character so it cannot point at a shifted or removed preset.
    pub async fn delete_preset(&self, index: usize) -> Result<(), SuggestError> {
        self.settings.delete_preset(index).await?;
        self.apply_character_binding().await;
        self.diag.record(
            LogLevel::Success,
            "Preset deleted; character bindings reindexed.",
        );
        Ok(())
    }

    /// Dispatch a chosen suggestion as the user's message. Send failures are
    /// recorded, never propagated; the capsules are cleared either way.
    pub fn send_suggestion(&self, text: &str) {
        if let Err(e) = self.sender.send_text(text) {
            self.diag
                .record(LogLevel::Error, &format!("Failed to send suggestion: {e}"));
        }
        self.sink.clear();
    }

    /// Record that the one-time update notice was shown and dismissed.
    pub async fn mark_update_notice_seen(&self) {
        self.settings.mark_update_notice_seen().await;
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod runtime_tests;
