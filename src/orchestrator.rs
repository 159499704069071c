use crate::config::Config;
use crate::logging;
use crate::memory::{ChatHistory, ChatRole, MemoryStore};
use crate::mode_prompts::{ModeReply, SupportModes};
use crate::ollama::OllamaClient;
use crate::persona::{build_prompt, detect_style_hint, Persona};
use crate::support_mode::ModeEvent;
use crate::web_search::{extract_search_query, format_results, WebSearchEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use uuid::Uuid;

/// Results shown when a message is routed to web search
const CHAT_SEARCH_RESULTS: usize = 3;

pub const HELP_TEXT: &str = r#"Tips:
- Ask general questions: "What are 3 ways to learn faster?"
- Advice: "I keep procrastinating - what should I do next?"
- Joke: "Tell me a joke about coffee."
- Motivation: "I need a 30-second pep talk before my interview."
- Memory: prefix with "+remember " to store a note; "+search <term>" to find notes.
- Persona: prefix with "+tweak " to extend Lisa's style temporarily.
- Support modes: "+fu2" / "+fu2 off" for FU-2 Protection, "+OKAY" / "+OKAY OFF" for It's Going To Be Okay.
- Web: "search for <topic>" or "what is <thing>"."#;

// ============ Replies ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplySource {
    Command,
    SupportMode(String),
    WebSearch,
    Model,
}

impl ReplySource {
    pub fn as_str(&self) -> &str {
        match self {
            ReplySource::Command => "command",
            ReplySource::SupportMode(name) => name,
            ReplySource::WebSearch => "web_search",
            ReplySource::Model => "model",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    fn command(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: ReplySource::Command,
        }
    }
}

/// Split `input` into the argument of `command` when it starts with it,
/// e.g. "+remember buy milk" -> Some("buy milk")
fn command_argument<'a>(input: &'a str, command: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(command)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

// ============ Orchestrator ============

/// One conversation: owns its model client, persona, notes, history and its
/// own support-mode state. Create one per session; never share across users.
pub struct Orchestrator {
    session_id: String,
    client: OllamaClient,
    persona: Persona,
    memory: MemoryStore,
    history: ChatHistory,
    modes: SupportModes,
    search: Option<WebSearchEngine>,
    rng: StdRng,
}

impl Orchestrator {
    pub fn new(client: OllamaClient, search: Option<WebSearchEngine>, rng: StdRng) -> Self {
        let session_id = Uuid::new_v4().to_string();
        logging::log_session(Some(&session_id), &format!(
            "Session started (model={}, web_search={})",
            client.model(),
            search.is_some()
        ));

        Self {
            session_id,
            client,
            persona: Persona::default(),
            memory: MemoryStore::default(),
            history: ChatHistory::default(),
            modes: SupportModes::default(),
            search,
            rng,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let client = OllamaClient::from_config(config)?;
        let search = if config.web_search {
            Some(WebSearchEngine::new(config.bing_api_key.clone())?)
        } else {
            None
        };
        Ok(Self::new(client, search, StdRng::from_os_rng()))
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn modes(&self) -> &SupportModes {
        &self.modes
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        logging::log_session(Some(&self.session_id), "Chat history cleared");
    }

    /// Route one user message and record the exchange in the history
    pub async fn handle(&mut self, input: &str) -> Result<Reply, Box<dyn Error + Send + Sync>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Reply::command("Please enter a message."));
        }

        self.history.push(ChatRole::User, input);

        let reply = match self.route_local(input) {
            Some(reply) => reply,
            None => self.route_remote(input).await?,
        };

        self.history.push(ChatRole::Lisa, &reply.text);
        Ok(reply)
    }

    /// Everything answerable without the network: commands, then support modes
    fn route_local(&mut self, input: &str) -> Option<Reply> {
        if let Some(text) = self.handle_command(input) {
            return Some(Reply::command(text));
        }

        let ModeReply { mode_name, event, message } = self.modes.process(input, &mut self.rng)?;
        let what = match event {
            ModeEvent::Activated => "activated",
            ModeEvent::Deactivated => "deactivated",
            ModeEvent::Support => "support response",
        };
        logging::log_mode(Some(&self.session_id), &format!("{}: {}", mode_name, what));

        Some(Reply {
            text: message,
            source: ReplySource::SupportMode(mode_name),
        })
    }

    async fn route_remote(&self, input: &str) -> Result<Reply, Box<dyn Error + Send + Sync>> {
        if let Some(engine) = self.search.as_ref() {
            if let Some(query) = extract_search_query(input) {
                logging::log_agent(Some(&self.session_id), &format!("Routing to web search: {}", query));
                let results = engine.search(&query, CHAT_SEARCH_RESULTS).await;
                return Ok(Reply {
                    text: format!("Here's what I found:\n\n{}", format_results(&results)),
                    source: ReplySource::WebSearch,
                });
            }
        }

        let hint = detect_style_hint(input);
        let system = self.persona.system_for(hint);
        let prompt = build_prompt(input);

        logging::log_agent(Some(&self.session_id), &format!(
            "Generating with {} (style hint: {:?})",
            self.client.model(),
            hint
        ));

        match self.client.generate(&prompt, Some(&system)).await {
            Ok(text) => Ok(Reply {
                text,
                source: ReplySource::Model,
            }),
            Err(e) => {
                logging::log_error(Some(&self.session_id), &format!("Model call failed: {}", e));
                Err(e)
            }
        }
    }

    /// Session commands; `None` when `input` is not one
    fn handle_command(&mut self, input: &str) -> Option<String> {
        if input.eq_ignore_ascii_case("help") {
            return Some(HELP_TEXT.to_string());
        }

        if let Some(note) = command_argument(input, "+remember") {
            if note.is_empty() {
                return Some("Nothing to remember - try '+remember buy milk'.".to_string());
            }
            self.memory.add(note);
            logging::log_session(Some(&self.session_id), &format!("Stored note #{}", self.memory.len()));
            return Some("Noted. I won't forget.".to_string());
        }

        if let Some(term) = command_argument(input, "+search") {
            if term.is_empty() {
                return Some("Try '+search project'.".to_string());
            }
            let hits = self.memory.search(term);
            if hits.is_empty() {
                return Some("No memory matches yet.".to_string());
            }
            let lines: Vec<String> = hits
                .iter()
                .enumerate()
                .map(|(i, h)| format!("  {}. {}", i + 1, h))
                .collect();
            return Some(format!("Memory hits:\n{}", lines.join("\n")));
        }

        if let Some(extra) = command_argument(input, "+tweak") {
            if extra.is_empty() {
                return Some("Nothing to tweak.".to_string());
            }
            self.persona.tweak(extra);
            logging::log_session(Some(&self.session_id), "Persona tweaked");
            return Some("Persona updated for this session.".to_string());
        }

        None
    }
}

#[cfg(test)]
impl Orchestrator {
    /// Session with no web search and a model endpoint nobody listens on
    pub(crate) fn offline() -> Self {
        let client = OllamaClient::new("http://127.0.0.1:9", "test-model", 2)
            .expect("client builds");
        Self::new(client, None, StdRng::seed_from_u64(99))
    }
}
