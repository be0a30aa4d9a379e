//! Settings persistence
//!
//! Owns the in-memory settings value and the load/merge/save cycle against
//! the host key-value store. Load never fails fatally: a missing entry is
//! replaced with persisted defaults, an unreadable or undecodable entry
//! falls back to defaults in memory without writing anything back.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::SuggestError;
use crate::ports::{DiagnosticSink, KeyValueStore, LogLevel};

use super::types::{CRATE_VERSION, DisplayMode, Preset, SETTINGS_KEY, Settings};

pub struct SettingsService {
    inner: RwLock<Settings>,
    store: Arc<dyn KeyValueStore>,
    diag: Arc<dyn DiagnosticSink>,
}

impl SettingsService {
    /// Create the service with default settings; call [`load`](Self::load)
    /// before first use.
    pub fn new(store: Arc<dyn KeyValueStore>, diag: Arc<dyn DiagnosticSink>) -> Self {
        SettingsService {
            inner: RwLock::new(Settings::default()),
            store,
            diag,
        }
    }

    /// Run `f` against the current settings under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Settings) -> R) -> R {
        f(&self.inner.read().expect("settings lock poisoned"))
    }

    /// Clone of the current settings value.
    pub fn snapshot(&self) -> Settings {
        self.read(Settings::clone)
    }

    /// Run `f` against the settings under the write lock, without persisting.
    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(&mut Settings) -> R) -> R {
        f(&mut self.inner.write().expect("settings lock poisoned"))
    }

    /// Read the stored settings object and merge it over the defaults.
    pub async fn load(&self) {
        match self.store.get(SETTINGS_KEY).await {
            Ok(Some(value)) => match serde_json::from_value::<Settings>(value) {
                Ok(mut loaded) => {
                    loaded.normalize();
                    self.with_mut(|settings| *settings = loaded);
                }
                Err(e) => {
                    log::warn!("stored settings did not decode: {e}");
                    self.diag.record(
                        LogLevel::Error,
                        &format!("Stored settings could not be decoded, using defaults: {e}"),
                    );
                }
            },
            // First run: make the defaults visible in the host store
            Ok(None) => self.save().await,
            Err(e) => {
                self.diag.record(
                    LogLevel::Error,
                    &format!("Settings could not be read, using defaults: {e}"),
                );
            }
        }
    }

    /// Write the current settings back to the host store.
    ///
    /// Failures are reported on the diagnostic sink and swallowed; the
    /// in-memory value stays authoritative and there is no retry.
    pub async fn save(&self) {
        let value = match serde_json::to_value(self.snapshot()) {
            Ok(value) => value,
            Err(e) => {
                self.diag
                    .record(LogLevel::Error, &format!("Settings did not serialize: {e}"));
                return;
            }
        };
        if let Err(e) = self.store.set(SETTINGS_KEY, value).await {
            log::warn!("settings save failed: {e}");
            self.diag
                .record(LogLevel::Error, &format!("Failed to save settings: {e}"));
        }
    }

    async fn update<R>(&self, f: impl FnOnce(&mut Settings) -> R) -> R {
        let result = self.with_mut(f);
        self.save().await;
        result
    }

    pub async fn set_api_config(&self, api_key: &str, base_url: &str, model: &str) {
        self.update(|settings| {
            settings.api_key = api_key.to_string();
            settings.base_url = base_url.to_string();
            settings.model = model.to_string();
        })
        .await;
    }

    pub async fn set_display_mode(&self, mode: DisplayMode) {
        self.update(|settings| settings.display_mode = mode).await;
    }

    /// Append a new preset; it does not become active until selected or bound.
    pub async fn add_preset(&self, name: &str, content: &str) {
        self.update(|settings| {
            settings.prompts.push(Preset {
                name: name.to_string(),
                content: content.to_string(),
            });
        })
        .await;
    }

    pub async fn rename_preset(&self, index: usize, name: &str) -> Result<(), SuggestError> {
        self.with_mut(|settings| match settings.prompts.get_mut(index) {
            Some(preset) => {
                preset.name = name.to_string();
                Ok(())
            }
            None => Err(SuggestError::PresetIndexOutOfRange(index)),
        })?;
        self.save().await;
        Ok(())
    }

    pub async fn set_preset_content(&self, index: usize, content: &str) -> Result<(), SuggestError> {
        self.with_mut(|settings| match settings.prompts.get_mut(index) {
            Some(preset) => {
                preset.content = content.to_string();
                Ok(())
            }
            None => Err(SuggestError::PresetIndexOutOfRange(index)),
        })?;
        self.save().await;
        Ok(())
    }

    /// Make the preset at `index` active without binding any character to it.
    pub async fn select_preset(&self, index: usize) -> Result<(), SuggestError> {
        self.with_mut(|settings| {
            if index >= settings.prompts.len() {
                return Err(SuggestError::PresetIndexOutOfRange(index));
            }
            settings.active_prompt_index = index;
            Ok(())
        })?;
        self.save().await;
        Ok(())
    }

    /// Remove the preset at `index` and reindex the character bindings.
    ///
    /// Bindings to the deleted preset are dropped; bindings past it shift
    /// down by one. The active index is clamped back into range, but callers
    /// that track a current character should re-resolve through
    /// [`PresetBindingManager`](super::PresetBindingManager) afterwards.
    pub async fn delete_preset(&self, index: usize) -> Result<(), SuggestError> {
        self.with_mut(|settings| {
            if index >= settings.prompts.len() {
                return Err(SuggestError::PresetIndexOutOfRange(index));
            }
            if settings.prompts.len() <= 1 {
                return Err(SuggestError::LastPreset);
            }
            settings.prompts.remove(index);

            let mut rebound = BTreeMap::new();
            for (character, &bound) in &settings.character_bindings {
                if bound == index {
                    continue;
                }
                let shifted = if bound > index { bound - 1 } else { bound };
                rebound.insert(character.clone(), shifted);
            }
            settings.character_bindings = rebound;

            if settings.active_prompt_index >= settings.prompts.len() {
                settings.active_prompt_index = settings.prompts.len() - 1;
            }
            Ok(())
        })?;
        self.save().await;
        Ok(())
    }

    /// Record that the user saw the update notice for this crate version.
    pub async fn mark_update_notice_seen(&self) {
        let changed = self.with_mut(|settings| {
            if settings.last_seen_version.as_deref() == Some(CRATE_VERSION) {
                false
            } else {
                settings.last_seen_version = Some(CRATE_VERSION.to_string());
                true
            }
        });
        if changed {
            self.save().await;
        }
    }

    /// Whether the one-time update notice should still be shown.
    pub fn update_notice_pending(&self) -> bool {
        self.read(|settings| settings.last_seen_version.as_deref() != Some(CRATE_VERSION))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
