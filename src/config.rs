// Runtime configuration, read from the environment at startup

use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_OLLAMA_BASE: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "dolphin-mistral";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_VOICE_RATE: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceMode {
    /// Text only
    Off,
    /// Replies are spoken, input is typed
    Speak,
    /// Listen/respond voice loop with silent replies
    Listen,
    /// Spoken replies and the listen/respond voice loop
    Full,
}

impl FromStr for VoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "0" | "false" | "" => Ok(VoiceMode::Off),
            "speak" | "tts" | "on" | "1" | "true" => Ok(VoiceMode::Speak),
            "listen" | "stt" => Ok(VoiceMode::Listen),
            "full" | "loop" => Ok(VoiceMode::Full),
            other => Err(format!("Unknown voice mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub bing_api_key: Option<String>,
    pub web_search: bool,
    pub voice: VoiceMode,
    pub voice_rate: u32,
    pub log_dir: PathBuf,
    pub log_echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_base_url: DEFAULT_OLLAMA_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            bing_api_key: None,
            web_search: true,
            voice: VoiceMode::Off,
            voice_rate: DEFAULT_VOICE_RATE,
            log_dir: default_log_dir(),
            log_echo: false,
        }
    }
}

fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".lisa").join("logs")
}

fn is_disabled(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "0" | "false" | "off" | "no")
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("OLLAMA_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.ollama_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("LISA_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(secs) = lookup("LISA_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            config.timeout_secs = secs;
        }
        config.bing_api_key = lookup("BING_API_KEY").filter(|v| !v.trim().is_empty());
        if let Some(flag) = lookup("LISA_WEB_SEARCH") {
            config.web_search = !is_disabled(&flag);
        }
        if let Some(voice) = lookup("LISA_VOICE").and_then(|v| v.parse().ok()) {
            config.voice = voice;
        }
        if let Some(rate) = lookup("LISA_VOICE_RATE").and_then(|v| v.trim().parse().ok()) {
            config.voice_rate = rate;
        }
        if let Some(dir) = lookup("LISA_LOG_DIR").filter(|v| !v.trim().is_empty()) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("LISA_LOG_ECHO") {
            config.log_echo = !is_disabled(&flag);
        }

        config
    }
}
