//! Character -> preset binding resolution
//!
//! A character may be bound to a preset index; on every chat/character
//! switch the active preset is re-resolved from that binding. The state is
//! a pure function of (bindings, prompts, character id) plus a persistence
//! side effect when something actually changed.

use std::sync::Arc;

use crate::error::SuggestError;

use super::store::SettingsService;

/// How a resolution picked the active preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOutcome {
    /// A valid binding existed for the character
    Bound,
    /// No valid binding; the default preset (index 0) was applied
    Default,
}

/// Result of [`PresetBindingManager::resolve_for_character`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: BindingOutcome,
    /// The active preset index after resolution
    pub active_index: usize,
    /// Whether the active index moved (drives caller-side diagnostics)
    pub changed: bool,
}

pub struct PresetBindingManager {
    settings: Arc<SettingsService>,
}

impl PresetBindingManager {
    pub fn new(settings: Arc<SettingsService>) -> Self {
        PresetBindingManager { settings }
    }

    /// Apply the binding for `char_id` to the active preset index.
    ///
    /// A stale binding (index out of range) is removed and treated as
    /// unbound. Persists only when the active index changed or a stale
    /// entry was dropped.
    pub async fn resolve_for_character(&self, char_id: &str) -> Resolution {
        let (resolution, dirty) = self.settings.with_mut(|settings| {
            let mut outcome = BindingOutcome::Default;
            let mut target = 0usize;
            let mut removed_stale = false;

            match settings.character_bindings.get(char_id).copied() {
                Some(bound) if bound < settings.prompts.len() => {
                    outcome = BindingOutcome::Bound;
                    target = bound;
                }
                Some(_) => {
                    settings.character_bindings.remove(char_id);
                    removed_stale = true;
                }
                None => {}
            }

            let changed = settings.active_prompt_index != target;
            settings.active_prompt_index = target;
            (
                Resolution {
                    outcome,
                    active_index: target,
                    changed,
                },
                changed || removed_stale,
            )
        });

        if dirty {
            self.settings.save().await;
        }
        resolution
    }

    /// Bind `char_id` to `preset_index` and make that preset active.
    /// Persists unconditionally.
    pub async fn bind(&self, char_id: &str, preset_index: usize) -> Result<(), SuggestError> {
        self.settings.with_mut(|settings| {
            if preset_index >= settings.prompts.len() {
                return Err(SuggestError::PresetIndexOutOfRange(preset_index));
            }
            settings
                .character_bindings
                .insert(char_id.to_string(), preset_index);
            settings.active_prompt_index = preset_index;
            Ok(())
        })?;
        self.settings.save().await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod binding_tests;
