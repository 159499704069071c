//! Session memory
//!
//! Notes the user asks Lisa to remember, plus the chat history of the session.
//! Both are unbounded, append-only and gone when the process exits.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ============ Notes ============

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    facts: Vec<String>,
}

impl MemoryStore {
    pub fn add(&mut self, item: &str) {
        self.facts.push(item.to_string());
    }

    /// Case-insensitive substring search, in insertion order
    pub fn search(&self, query: &str) -> Vec<&str> {
        let q = query.to_lowercase();
        self.facts
            .iter()
            .filter(|f| f.to_lowercase().contains(&q))
            .map(|f| f.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

// ============ Chat History ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Lisa,
}

impl ChatRole {
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "You",
            ChatRole::Lisa => "Lisa",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl ChatEntry {
    /// 12-hour clock stamp, e.g. "03:07 PM"
    pub fn display_time(&self) -> String {
        self.timestamp.format("%I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    entries: Vec<ChatEntry>,
}

impl ChatHistory {
    pub fn push(&mut self, role: ChatRole, content: &str) {
        self.entries.push(ChatEntry {
            role,
            content: content.to_string(),
            timestamp: Local::now(),
        });
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_search_ignores_case() {
        let mut memory = MemoryStore::default();
        memory.add("Buy milk");
        memory.add("Project deadline is Friday");
        memory.add("call mom about the PROJECT");

        assert_eq!(
            memory.search("project"),
            vec!["Project deadline is Friday", "call mom about the PROJECT"]
        );
        assert!(memory.search("eggs").is_empty());
        assert_eq!(memory.len(), 3);
    }

    #[test]
    fn test_history_appends_and_clears() {
        let mut history = ChatHistory::default();
        history.push(ChatRole::User, "hi");
        history.push(ChatRole::Lisa, "hello!");

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].role, ChatRole::User);
        assert_eq!(history.entries()[1].content, "hello!");
        assert!(history.entries()[0].display_time().ends_with('M'));

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatRole::Lisa).unwrap();
        assert_eq!(json, "\"lisa\"");
    }
}
