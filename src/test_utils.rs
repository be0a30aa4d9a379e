#[cfg(test)]
pub mod fakes {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::error::SuggestError;
    use crate::ports::{
        CharacterInfo, CharacterSource, ChatHistory, ChatMessage, DiagnosticSink, KeyValueStore,
        LogLevel, SendTarget, SuggestionSink,
    };
    use crate::provider::{ApiConfig, CompletionClient};
    use crate::settings::DisplayMode;

    /// In-memory key-value store with failure injection
    #[derive(Default)]
    pub struct MemoryStore {
        entries: Mutex<HashMap<String, serde_json::Value>>,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            MemoryStore::default()
        }

        pub fn seeded(key: &str, value: serde_json::Value) -> Self {
            let store = MemoryStore::default();
            store
                .entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value);
            store
        }

        pub fn fail_reads(&self) {
            self.fail_reads.store(true, Ordering::SeqCst);
        }

        pub fn fail_writes(&self) {
            self.fail_writes.store(true, Ordering::SeqCst);
        }

        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub fn stored(&self, key: &str) -> Option<serde_json::Value> {
            self.entries.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SuggestError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(SuggestError::Persistence("injected read failure".into()));
            }
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), SuggestError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(SuggestError::Persistence("injected write failure".into()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.entries.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Conversation history that replays scripted turns
    pub struct ScriptedHistory {
        last_id: i64,
        turns: Vec<ChatMessage>,
        requested_ranges: Mutex<Vec<String>>,
    }

    impl ScriptedHistory {
        pub fn new(last_id: i64, turns: &[(&str, &str)]) -> Self {
            ScriptedHistory {
                last_id,
                turns: turns
                    .iter()
                    .map(|(role, message)| ChatMessage {
                        role: role.to_string(),
                        message: message.to_string(),
                    })
                    .collect(),
                requested_ranges: Mutex::new(Vec::new()),
            }
        }

        pub fn requested_ranges(&self) -> Vec<String> {
            self.requested_ranges.lock().unwrap().clone()
        }
    }

    impl ChatHistory for ScriptedHistory {
        fn last_message_id(&self) -> i64 {
            self.last_id
        }

        fn messages_in_range(&self, range: &str) -> Vec<ChatMessage> {
            self.requested_ranges.lock().unwrap().push(range.to_string());
            self.turns.clone()
        }
    }

    /// Character source that always answers with the same character
    pub struct FixedCharacter(pub Option<CharacterInfo>);

    impl FixedCharacter {
        pub fn named(id: &str, name: &str) -> Self {
            FixedCharacter(Some(CharacterInfo {
                id: id.to_string(),
                name: name.to_string(),
            }))
        }

        pub fn none() -> Self {
            FixedCharacter(None)
        }
    }

    impl CharacterSource for FixedCharacter {
        fn active_character(&self) -> Option<CharacterInfo> {
            self.0.clone()
        }
    }

    /// Completion client that pops scripted replies and records prompts
    #[derive(Default)]
    pub struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, SuggestError>>>,
        pub prompts: Mutex<Vec<String>>,
        pub configs: Mutex<Vec<ApiConfig>>,
    }

    impl ScriptedClient {
        pub fn replying(reply: &str) -> Self {
            let client = ScriptedClient::default();
            client
                .replies
                .lock()
                .unwrap()
                .push_back(Ok(reply.to_string()));
            client
        }

        pub fn failing(error: SuggestError) -> Self {
            let client = ScriptedClient::default();
            client.replies.lock().unwrap().push_back(Err(error));
            client
        }

        pub fn push_reply(&self, reply: Result<String, SuggestError>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn prompt_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(
            &self,
            config: &ApiConfig,
            prompt: &str,
        ) -> Result<String, SuggestError> {
            self.configs.lock().unwrap().push(config.clone());
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SuggestError::Network("no scripted reply".into())))
        }
    }

    /// Completion client whose first call blocks until released, for
    /// overlapping-run tests; later calls return immediately
    pub struct GatedClient {
        pub gate: Notify,
        gate_next: AtomicBool,
        reply: String,
    }

    impl GatedClient {
        pub fn replying(reply: &str) -> Self {
            GatedClient {
                gate: Notify::new(),
                gate_next: AtomicBool::new(true),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for GatedClient {
        async fn complete(&self, _config: &ApiConfig, _prompt: &str) -> Result<String, SuggestError> {
            if self.gate_next.swap(false, Ordering::SeqCst) {
                self.gate.notified().await;
            }
            Ok(self.reply.clone())
        }
    }

    /// Suggestion sink that records renders and clears
    #[derive(Default)]
    pub struct RecordingSink {
        pub rendered: Mutex<Vec<(Vec<String>, DisplayMode)>>,
        pub clears: AtomicUsize,
    }

    impl RecordingSink {
        pub fn render_count(&self) -> usize {
            self.rendered.lock().unwrap().len()
        }

        pub fn last_render(&self) -> Option<(Vec<String>, DisplayMode)> {
            self.rendered.lock().unwrap().last().cloned()
        }

        pub fn clear_count(&self) -> usize {
            self.clears.load(Ordering::SeqCst)
        }
    }

    impl SuggestionSink for RecordingSink {
        fn render(&self, suggestions: &[String], mode: DisplayMode) {
            self.rendered
                .lock()
                .unwrap()
                .push((suggestions.to_vec(), mode));
        }

        fn clear(&self) {
            self.clears.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Send target that records dispatched text and can be made to fail
    #[derive(Default)]
    pub struct RecordingSender {
        pub sent: Mutex<Vec<String>>,
        pub fail: AtomicBool,
    }

    impl RecordingSender {
        pub fn failing() -> Self {
            let sender = RecordingSender::default();
            sender.fail.store(true, Ordering::SeqCst);
            sender
        }
    }

    impl SendTarget for RecordingSender {
        fn send_text(&self, text: &str) -> Result<(), String> {
            if self.fail.load(Ordering::SeqCst) {
                return Err("command dispatch rejected".to_string());
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// Diagnostic sink that records every entry
    #[derive(Default)]
    pub struct RecordingDiag {
        pub records: Mutex<Vec<(LogLevel, String)>>,
    }

    impl RecordingDiag {
        pub fn contains(&self, needle: &str) -> bool {
            self.records
                .lock()
                .unwrap()
                .iter()
                .any(|(_, message)| message.contains(needle))
        }

        pub fn contains_at(&self, level: LogLevel, needle: &str) -> bool {
            self.records
                .lock()
                .unwrap()
                .iter()
                .any(|(l, message)| *l == level && message.contains(needle))
        }
    }

    impl DiagnosticSink for RecordingDiag {
        fn record(&self, level: LogLevel, message: &str) {
            self.records.lock().unwrap().push((level, message.to_string()));
        }
    }
}
