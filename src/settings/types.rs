// Settings type definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Namespace key under which settings are persisted in the host store
pub const SETTINGS_KEY: &str = "reply_suggestions";

/// Version marker used to gate the one-time update notice
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PRESET_NAME: &str = "Guided replies (【】 format)";

const DEFAULT_PRESET_TEMPLATE: &str = r#"# Role
You are a roleplay co-writing engine.

# Task
Generate three short reply suggestions for the user based on the latest exchange.

# Instructions
1. Read [user reply] and [assistant reply] below to understand the scene and the user's voice.
2. Cover three angles: an action that moves the scene forward, a question that probes or tests, and a reaction that shows feeling or stance.
3. Keep every suggestion under ten words and match the tone of [user reply].

# Output format
Respond with a single line of text. Wrap every suggestion in 【】 with nothing else around it: no numbering, no JSON, no extra characters.

Example:
【Draw my sword!】【Is it hurt?】【Hide, quickly!】

# Context
[user reply]:
{{user_last_reply}}

[assistant reply]:
{{ai_last_reply}}

# Suggestions:"#;

/// A named prompt template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub content: String,
}

/// How rendered suggestion capsules lay out in the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Capsules wrap onto multiple rows
    #[default]
    Wrap,
    /// Capsules stay on one horizontally scrolling row
    Scroll,
}

/// Persisted configuration
///
/// The wire format keys are camelCase so settings saved by earlier builds of
/// the host extension load unchanged. Missing fields fall back to defaults
/// field-by-field; in particular `prompts` and `characterBindings` are never
/// silently emptied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub active_prompt_index: usize,
    pub display_mode: DisplayMode,
    pub character_bindings: BTreeMap<String, usize>,
    pub prompts: Vec<Preset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_version: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            active_prompt_index: 0,
            display_mode: DisplayMode::default(),
            character_bindings: BTreeMap::new(),
            prompts: vec![Preset {
                name: DEFAULT_PRESET_NAME.to_string(),
                content: DEFAULT_PRESET_TEMPLATE.to_string(),
            }],
            last_seen_version: None,
        }
    }
}

impl Settings {
    /// The preset `activePromptIndex` points at, if any
    pub fn active_preset(&self) -> Option<&Preset> {
        self.prompts.get(self.active_prompt_index)
    }

    /// Restore invariants after merging an externally stored object:
    /// `prompts` never empty, active index in range, bindings in range.
    pub fn normalize(&mut self) {
        if self.prompts.is_empty() {
            self.prompts = Settings::default().prompts;
        }
        if self.active_prompt_index >= self.prompts.len() {
            self.active_prompt_index = 0;
        }
        let count = self.prompts.len();
        self.character_bindings.retain(|_, index| *index < count);
    }
}
