//! Suggestion-generation pipeline
//!
//! One linear run per trigger: context -> compose -> call -> parse -> render,
//! short-circuiting on the first failure. Overlapping runs are neither
//! cancelled nor serialized; instead each run takes a generation token, and
//! a run whose token has been superseded by the time its response arrives
//! renders nothing. Every step leaves a record on the diagnostic sink,
//! including the composed prompt and the raw model output; prompt-format
//! mismatches are the dominant real-world failure, and the audit trail is
//! how users debug them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::context::{self, ExtractedContext};
use crate::error::SuggestError;
use crate::ports::{ChatHistory, DiagnosticSink, LogLevel, SuggestionSink};
use crate::prompt;
use crate::provider::{ApiConfig, CompletionClient};
use crate::settings::{DisplayMode, SettingsService};
use crate::suggestion::parse_suggestions;

pub struct GenerationPipeline {
    settings: Arc<SettingsService>,
    history: Arc<dyn ChatHistory>,
    client: Arc<dyn CompletionClient>,
    sink: Arc<dyn SuggestionSink>,
    diag: Arc<dyn DiagnosticSink>,
    /// Monotonically increasing run token; only the latest run may render
    generation: AtomicU64,
}

impl GenerationPipeline {
    pub fn new(
        settings: Arc<SettingsService>,
        history: Arc<dyn ChatHistory>,
        client: Arc<dyn CompletionClient>,
        sink: Arc<dyn SuggestionSink>,
        diag: Arc<dyn DiagnosticSink>,
    ) -> Self {
        GenerationPipeline {
            settings,
            history,
            client,
            sink,
            diag,
            generation: AtomicU64::new(0),
        }
    }

    /// Run one generation attempt end to end.
    ///
    /// Failures abort this run only; the next trigger is the only retry.
    pub async fn run(&self) {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.sink.clear();
        self.diag
            .record(LogLevel::Info, "---- starting suggestion generation ----");

        match self.generate().await {
            Ok((suggestions, mode)) => {
                if self.generation.load(Ordering::SeqCst) != token {
                    self.diag.record(
                        LogLevel::Info,
                        "A newer run superseded this one; discarding its suggestions.",
                    );
                    return;
                }
                self.diag.record(
                    LogLevel::Success,
                    &format!("Rendering {} suggestions.", suggestions.len()),
                );
                self.sink.render(&suggestions, mode);
            }
            Err(e) => self.report_failure(&e),
        }
    }

    async fn generate(&self) -> Result<(Vec<String>, DisplayMode), SuggestError> {
        let ExtractedContext { user_text, ai_text } = context::extract(self.history.as_ref())?;
        self.diag
            .record(LogLevel::Info, "Context acquired; composing prompt.");

        let (config, preset_name, prompt_text, mode) = self.settings.read(|settings| {
            let prompt_text = prompt::compose(settings.active_preset(), &user_text, &ai_text)?;
            let preset_name = settings
                .active_preset()
                .map(|preset| preset.name.clone())
                .unwrap_or_default();
            Ok::<_, SuggestError>((
                ApiConfig {
                    base_url: settings.base_url.clone(),
                    api_key: settings.api_key.clone(),
                    model: settings.model.clone(),
                },
                preset_name,
                prompt_text,
                settings.display_mode,
            ))
        })?;

        self.diag
            .record(LogLevel::Info, &format!("[final prompt]\n{prompt_text}"));
        self.diag.record(
            LogLevel::Info,
            &format!("Calling the model with preset \"{preset_name}\"."),
        );

        let raw = self.client.complete(&config, &prompt_text).await?;
        self.diag
            .record(LogLevel::Info, &format!("[raw model output]\n{raw}"));

        let suggestions = parse_suggestions(&raw)?;
        self.diag.record(
            LogLevel::Success,
            &format!("Parsed {} suggestions.", suggestions.len()),
        );
        Ok((suggestions, mode))
    }

    fn report_failure(&self, error: &SuggestError) {
        // Missing context is routine (fresh chats, swipes); everything else
        // is an actual failure the user should look at.
        let level = match error {
            SuggestError::ContextUnavailable(_) | SuggestError::EmptyExtractedText => {
                LogLevel::Warn
            }
            _ => LogLevel::Error,
        };
        self.diag
            .record(level, &format!("Generation aborted: {error}"));
        log::debug!("suggestion generation aborted: {error}");
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod pipeline_tests;
