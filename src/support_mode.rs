//! Supportive-mode trigger engine
//!
//! A support mode is a personality overlay that watches user text for explicit
//! commands and distress phrases, and answers with canned fragments sampled
//! from fixed pools. Each session owns its own `ModeController`s; the `active`
//! flag is per-conversation state.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a trigger-phrase match does to the `active` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerPolicy {
    /// Respond once, leave `active` untouched
    Transient,
    /// Respond and turn the mode on (through `activate`) until an explicit
    /// deactivation
    Sticky,
}

/// Static configuration of one mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportMode {
    pub name: String,
    pub activation_commands: Vec<String>,
    pub deactivation_commands: Vec<String>,
    pub triggers: Vec<String>,
    pub activation_messages: Vec<String>,
    pub deactivation_messages: Vec<String>,
    pub fragment_pools: Vec<Vec<String>>,
    pub separator: String,
    pub trigger_policy: TriggerPolicy,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lowered(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

impl SupportMode {
    /// Start a mode with a name and a trigger policy; everything else is added
    /// with the `with_*` builders.
    pub fn new(name: &str, trigger_policy: TriggerPolicy) -> Self {
        Self {
            name: name.to_string(),
            activation_commands: Vec::new(),
            deactivation_commands: Vec::new(),
            triggers: Vec::new(),
            activation_messages: Vec::new(),
            deactivation_messages: Vec::new(),
            fragment_pools: Vec::new(),
            separator: "\n\n".to_string(),
            trigger_policy,
        }
    }

    pub fn with_activation_commands(mut self, commands: &[&str]) -> Self {
        self.activation_commands = lowered(commands);
        self
    }

    pub fn with_deactivation_commands(mut self, commands: &[&str]) -> Self {
        self.deactivation_commands = lowered(commands);
        self
    }

    pub fn with_triggers(mut self, triggers: &[&str]) -> Self {
        self.triggers = lowered(triggers);
        self
    }

    pub fn with_activation_messages(mut self, messages: &[&str]) -> Self {
        self.activation_messages = owned(messages);
        self
    }

    pub fn with_deactivation_messages(mut self, messages: &[&str]) -> Self {
        self.deactivation_messages = owned(messages);
        self
    }

    /// Append a fragment pool. Pools are sampled in the order they were added;
    /// an empty pool is ignored.
    pub fn with_pool(mut self, pool: &[&str]) -> Self {
        if !pool.is_empty() {
            self.fragment_pools.push(owned(pool));
        }
        self
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }
}

// ============ Trigger Detector ============

/// True iff any of `needles` (already lower-cased) occurs in the lower-cased text
fn contains_any(text: &str, needles: &[String]) -> bool {
    if needles.is_empty() {
        return false;
    }
    let text_lower = text.to_lowercase();
    needles.iter().any(|n| !n.is_empty() && text_lower.contains(n.as_str()))
}

/// Pure, deterministic check of the mode's distress triggers against `text`
pub fn detect(mode: &SupportMode, text: &str) -> bool {
    contains_any(text, &mode.triggers)
}

// ============ Response Composer ============

/// Join already-selected fragments, in pool order, with the separator
pub fn compose<S: AsRef<str>>(fragments: &[S], separator: &str) -> String {
    fragments
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Pick one entry uniformly at random from every pool
pub fn sample_fragments<'a, R: Rng + ?Sized>(pools: &'a [Vec<String>], rng: &mut R) -> Vec<&'a str> {
    pools
        .iter()
        .filter_map(|pool| pool.choose(rng))
        .map(|s| s.as_str())
        .collect()
}

/// Sample every pool of `mode` and join the picks
pub fn compose_response<R: Rng + ?Sized>(mode: &SupportMode, rng: &mut R) -> String {
    let fragments = sample_fragments(&mode.fragment_pools, rng);
    compose(&fragments, &mode.separator)
}

fn pick<R: Rng + ?Sized>(pool: &[String], fallback: &str, rng: &mut R) -> String {
    pool.choose(rng)
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

// ============ Mode Controller ============

/// What `process` did with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    Activated,
    Deactivated,
    Support,
}

/// One mode's state for one conversation
#[derive(Debug, Clone)]
pub struct ModeController {
    mode: SupportMode,
    active: bool,
}

impl ModeController {
    pub fn new(mode: SupportMode) -> Self {
        Self { mode, active: false }
    }

    pub fn name(&self) -> &str {
        &self.mode.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        self.active = true;
        let fallback = format!("{} activated.", self.mode.name);
        pick(&self.mode.activation_messages, &fallback, rng)
    }

    pub fn deactivate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        self.active = false;
        let fallback = format!("{} deactivated.", self.mode.name);
        pick(&self.mode.deactivation_messages, &fallback, rng)
    }

    pub fn detect(&self, text: &str) -> bool {
        detect(&self.mode, text)
    }

    /// Route one message through the mode. `None` means the mode does not
    /// apply and the caller should fall through to its default path.
    pub fn process<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Option<String> {
        self.process_event(text, rng).map(|(_, message)| message)
    }

    /// Like `process`, also reporting which branch produced the message
    pub fn process_event<R: Rng + ?Sized>(
        &mut self,
        text: &str,
        rng: &mut R,
    ) -> Option<(ModeEvent, String)> {
        if let Some(handled) = self.process_command(text, rng) {
            return Some(handled);
        }
        self.respond(text, rng).map(|message| (ModeEvent::Support, message))
    }

    /// Explicit on/off commands only; triggers and the active flag are ignored
    pub fn process_command<R: Rng + ?Sized>(
        &mut self,
        text: &str,
        rng: &mut R,
    ) -> Option<(ModeEvent, String)> {
        // Deactivation first: "+okay off" also contains "+okay"
        if contains_any(text, &self.mode.deactivation_commands) {
            return Some((ModeEvent::Deactivated, self.deactivate(rng)));
        }
        if contains_any(text, &self.mode.activation_commands) {
            return Some((ModeEvent::Activated, self.activate(rng)));
        }
        None
    }

    /// Support reply when the mode is on or `text` trips a trigger
    pub fn respond<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Option<String> {
        let triggered = self.detect(text);
        if triggered && self.mode.trigger_policy == TriggerPolicy::Sticky {
            // The support reply replaces the activation message
            self.activate(rng);
        }

        if self.active || triggered {
            return Some(compose_response(&self.mode, rng));
        }
        None
    }
}
