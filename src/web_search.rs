//! Web search for Lisa
//!
//! DuckDuckGo's Instant Answer API is tried first (free, no key). When it has
//! nothing and a Bing key is configured, Bing Web Search fills in.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::time::Duration;

use crate::logging;

const DDG_API_URL: &str = "https://api.duckduckgo.com/";
const BING_API_URL: &str = "https://api.bing.microsoft.com/v7.0/search";
const SEARCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub source: String,
}

pub struct WebSearchEngine {
    client: Client,
    bing_api_key: Option<String>,
}

impl WebSearchEngine {
    pub fn new(bing_api_key: Option<String>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            bing_api_key,
        })
    }

    pub fn has_bing(&self) -> bool {
        self.bing_api_key.is_some()
    }

    pub async fn search_duckduckgo(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, Box<dyn Error + Send + Sync>> {
        let response = self.client
            .get(DDG_API_URL)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(format!("DuckDuckGo error ({})", response.status()).into());
        }

        let data: Value = response.json().await?;
        Ok(parse_duckduckgo(&data, max_results))
    }

    pub async fn search_bing(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, Box<dyn Error + Send + Sync>> {
        let api_key = match &self.bing_api_key {
            Some(key) => key,
            None => return Ok(Vec::new()),
        };

        let count = max_results.to_string();
        let response = self.client
            .get(BING_API_URL)
            .header("Ocp-Apim-Subscription-Key", api_key)
            .query(&[
                ("q", query),
                ("count", count.as_str()),
                ("textDecorations", "false"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("Bing error ({}): {}", status, error_text).into());
        }

        let data: Value = response.json().await?;
        Ok(parse_bing(&data, max_results))
    }

    /// Search with every available provider. Provider failures are logged and
    /// count as "no results".
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let mut results = match self.search_duckduckgo(query, max_results).await {
            Ok(results) => results,
            Err(e) => {
                logging::log_search(None, &format!("DuckDuckGo search error: {}", e));
                Vec::new()
            }
        };

        if results.is_empty() && self.has_bing() {
            results = match self.search_bing(query, max_results).await {
                Ok(results) => results,
                Err(e) => {
                    logging::log_search(None, &format!("Bing search error: {}", e));
                    Vec::new()
                }
            };
        }

        logging::log_search(None, &format!("\"{}\" -> {} results", query, results.len()));
        results
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// Abstract first, then related topics that carry text
pub fn parse_duckduckgo(data: &Value, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    let abstract_text = str_field(data, "Abstract");
    if !abstract_text.is_empty() {
        let heading = str_field(data, "Heading");
        results.push(SearchResult {
            title: if heading.is_empty() { "Result".to_string() } else { heading.to_string() },
            snippet: abstract_text.to_string(),
            url: str_field(data, "AbstractURL").to_string(),
            source: "DuckDuckGo".to_string(),
        });
    }

    let remaining = max_results.saturating_sub(results.len());
    let topics = data
        .get("RelatedTopics")
        .and_then(|t| t.as_array())
        .map(|t| t.as_slice())
        .unwrap_or(&[]);

    for topic in topics.iter().take(remaining) {
        let text = match topic.get("Text").and_then(|t| t.as_str()) {
            Some(text) => text,
            None => continue,
        };
        let title = match text.split_once(" - ") {
            Some((head, _)) => head.to_string(),
            None => "Related".to_string(),
        };
        results.push(SearchResult {
            title,
            snippet: text.to_string(),
            url: str_field(topic, "FirstURL").to_string(),
            source: "DuckDuckGo".to_string(),
        });
    }

    results.truncate(max_results);
    results
}

pub fn parse_bing(data: &Value, max_results: usize) -> Vec<SearchResult> {
    data.get("webPages")
        .and_then(|w| w.get("value"))
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .take(max_results)
                .map(|item| SearchResult {
                    title: str_field(item, "name").to_string(),
                    snippet: str_field(item, "snippet").to_string(),
                    url: str_field(item, "url").to_string(),
                    source: "Bing".to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    let mut formatted = String::from("Search Results:\n\n");
    for (i, result) in results.iter().enumerate() {
        let title = if result.title.is_empty() { "No title" } else { &result.title };
        let snippet = if result.snippet.is_empty() { "No description" } else { &result.snippet };
        formatted.push_str(&format!("{}. {}\n", i + 1, title));
        formatted.push_str(&format!("   {}\n", snippet));
        if !result.url.is_empty() {
            formatted.push_str(&format!("   URL: {}\n", result.url));
        }
        formatted.push('\n');
    }

    formatted.trim().to_string()
}

// ============ Search intent ============

const SEARCH_KEYWORDS: [&str; 4] = ["search", "find", "look up", "what is"];
const SEARCH_PREFIXES: [&str; 5] = ["search for", "search", "find", "look up", "what is"];

/// If the message reads like a search request, return the query to run
pub fn extract_search_query(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    if !SEARCH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return None;
    }

    let query = SEARCH_PREFIXES
        .iter()
        .find(|p| lower.contains(*p))
        .map(|p| {
            lower
                .replace(p, "")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_else(|| message.trim().to_string());

    if query.is_empty() {
        None
    } else {
        Some(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_duckduckgo_abstract_and_topics() {
        let data = json!({
            "Heading": "Rust",
            "Abstract": "Rust is a systems programming language.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust",
            "RelatedTopics": [
                {"Text": "Cargo - The Rust package manager", "FirstURL": "https://duckduckgo.com/Cargo"},
                {"Name": "Category group without text", "Topics": []},
                {"Text": "Ferris", "FirstURL": "https://duckduckgo.com/Ferris"}
            ]
        });

        let results = parse_duckduckgo(&data, 5);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Rust");
        assert_eq!(results[1].title, "Cargo");
        assert_eq!(results[1].snippet, "Cargo - The Rust package manager");
        assert_eq!(results[2].title, "Related");
        assert!(results.iter().all(|r| r.source == "DuckDuckGo"));
    }

    #[test]
    fn test_parse_duckduckgo_respects_limit() {
        let data = json!({
            "Abstract": "An abstract",
            "RelatedTopics": [{"Text": "a"}, {"Text": "b"}, {"Text": "c"}]
        });
        let results = parse_duckduckgo(&data, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Result");
    }

    #[test]
    fn test_parse_duckduckgo_empty() {
        assert!(parse_duckduckgo(&json!({}), 5).is_empty());
    }

    #[test]
    fn test_parse_bing() {
        let data = json!({"webPages": {"value": [
            {"name": "One", "snippet": "first", "url": "https://one.example"},
            {"name": "Two", "snippet": "second", "url": "https://two.example"}
        ]}});
        let results = parse_bing(&data, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "One");
        assert_eq!(results[0].source, "Bing");
        assert!(parse_bing(&json!({}), 5).is_empty());
    }

    #[test]
    fn test_format_results() {
        assert_eq!(format_results(&[]), "No results found.");

        let results = vec![
            SearchResult {
                title: "Rust".to_string(),
                snippet: "A language".to_string(),
                url: "https://rust-lang.org".to_string(),
                source: "DuckDuckGo".to_string(),
            },
            SearchResult {
                title: String::new(),
                snippet: String::new(),
                url: String::new(),
                source: "Bing".to_string(),
            },
        ];
        assert_eq!(
            format_results(&results),
            "Search Results:\n\n1. Rust\n   A language\n   URL: https://rust-lang.org\n\n2. No title\n   No description"
        );
    }

    #[test]
    fn test_extract_search_query() {
        assert_eq!(extract_search_query("Search for Python tutorials").as_deref(), Some("python tutorials"));
        assert_eq!(extract_search_query("what is quantum computing?").as_deref(), Some("quantum computing?"));
        assert_eq!(extract_search_query("Can you look up the weather").as_deref(), Some("can you the weather"));
        assert_eq!(extract_search_query("search"), None);
        assert_eq!(extract_search_query("tell me a joke"), None);
    }
}
