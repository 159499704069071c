//! Voice interaction for Lisa
//!
//! Speech engines sit behind two small traits: `Speaker` (text to speech) and
//! `Listener` (speech to text). `SystemSpeaker` drives the platform speech
//! command; recognition engines plug in through `Listener`, with
//! `ConsoleListener` standing in when there is no microphone pipeline.

use std::io::{self, BufRead, Write};
use std::process::{Command, Stdio};

use crate::logging;
use crate::orchestrator::Orchestrator;

pub const GREETING: &str = "Hello! I'm Lisa. How can I help you today?";
pub const FAREWELL: &str = "Goodbye! Have a great day!";
const EXIT_WORDS: [&str; 4] = ["goodbye", "bye", "exit", "quit"];

pub trait Speaker: Send {
    /// Speak `text`; true when the engine reported success
    fn speak(&mut self, text: &str) -> bool;
}

pub trait Listener: Send {
    /// One utterance, or `None` when nothing usable was heard
    fn listen(&mut self) -> Option<String>;
}

// ============ Speakers ============

/// Speaker that never makes a sound
#[derive(Debug, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&mut self, text: &str) -> bool {
        !text.trim().is_empty()
    }
}

/// Text to speech through the operating system's speech command
#[derive(Debug, Clone)]
pub struct SystemSpeaker {
    /// Words per minute
    pub rate: u32,
}

impl SystemSpeaker {
    pub fn new(rate: u32) -> Self {
        Self { rate }
    }

    /// Program and arguments that would speak `text` on this platform
    pub fn command_for(&self, text: &str) -> (String, Vec<String>) {
        if cfg!(target_os = "macos") {
            (
                "say".to_string(),
                vec!["-r".to_string(), self.rate.to_string(), text.to_string()],
            )
        } else if cfg!(target_os = "windows") {
            // System.Speech rate runs -10..10 with 0 at roughly 150 wpm
            let ps_rate = ((self.rate as i64 - 150) / 15).clamp(-10, 10);
            let escaped = text.replace('\'', "''");
            let script = format!(
                "Add-Type -AssemblyName System.Speech; \
                 $s = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
                 $s.Rate = {}; $s.Speak('{}')",
                ps_rate, escaped
            );
            (
                "powershell".to_string(),
                vec!["-NoProfile".to_string(), "-Command".to_string(), script],
            )
        } else {
            (
                "espeak".to_string(),
                vec!["-s".to_string(), self.rate.to_string(), text.to_string()],
            )
        }
    }
}

impl Speaker for SystemSpeaker {
    fn speak(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        let (program, args) = self.command_for(text);
        match Command::new(&program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => true,
            Ok(status) => {
                logging::log_voice(None, &format!("{} exited with {}", program, status));
                false
            }
            Err(e) => {
                logging::log_voice(None, &format!("{} unavailable: {}", program, e));
                false
            }
        }
    }
}

// ============ Listeners ============

/// Reads typed lines in place of recognized speech
pub struct ConsoleListener<R: BufRead + Send> {
    input: R,
    prompt: String,
}

impl ConsoleListener<io::BufReader<io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()), "Listening> ")
    }
}

impl<R: BufRead + Send> ConsoleListener<R> {
    pub fn new(input: R, prompt: &str) -> Self {
        Self {
            input,
            prompt: prompt.to_string(),
        }
    }
}

impl<R: BufRead + Send> Listener for ConsoleListener<R> {
    fn listen(&mut self) -> Option<String> {
        if !self.prompt.is_empty() {
            print!("{}", self.prompt);
            let _ = io::stdout().flush();
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let heard = line.trim();
                if heard.is_empty() {
                    None
                } else {
                    Some(heard.to_string())
                }
            }
        }
    }
}

// ============ Voice Assistant ============

/// Whole-word match, so "quite" or "byte" never ends a session
pub fn is_exit_phrase(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| EXIT_WORDS.contains(&word))
}

/// Spoken replies plus an optional listener for the voice loop
pub struct VoiceAssistant {
    speaker: Box<dyn Speaker>,
    listener: Option<Box<dyn Listener>>,
}

impl VoiceAssistant {
    pub fn new(speaker: Box<dyn Speaker>, listener: Option<Box<dyn Listener>>) -> Self {
        Self { speaker, listener }
    }

    pub fn can_listen(&self) -> bool {
        self.listener.is_some()
    }

    pub fn speak(&mut self, text: &str) -> bool {
        self.speaker.speak(text)
    }

    pub fn listen(&mut self) -> Option<String> {
        match self.listener.as_mut() {
            Some(listener) => listener.listen(),
            None => {
                logging::log_voice(None, "Speech-to-text not available");
                None
            }
        }
    }

    /// Greet, then listen and answer until an exit phrase or until the
    /// listener runs dry. Returns the number of exchanges handled.
    pub async fn conversation_loop(&mut self, orchestrator: &mut Orchestrator) -> usize {
        if !self.can_listen() {
            println!("Speech-to-text not available. Cannot run conversation loop.");
            return 0;
        }

        let session = orchestrator.session_id().to_string();
        logging::log_voice(Some(&session), "Voice loop started");
        if !self.speak(GREETING) {
            logging::log_voice(Some(&session), "Greeting was not spoken");
        }

        let mut exchanges = 0;
        let mut misses = 0;
        loop {
            let heard = match self.listen() {
                Some(text) => text,
                None => {
                    // A closed input stream would otherwise spin forever
                    misses += 1;
                    if misses >= 3 {
                        break;
                    }
                    continue;
                }
            };
            misses = 0;

            println!("You said: {}", heard);

            if is_exit_phrase(&heard) {
                if !self.speak(FAREWELL) {
                    logging::log_voice(Some(&session), "Farewell was not spoken");
                }
                break;
            }

            let reply = match orchestrator.handle(&heard).await {
                Ok(reply) => reply.text,
                Err(e) => {
                    logging::log_error(Some(&session), &format!("Voice turn failed: {}", e));
                    format!("I'm having trouble processing that. Error: {}", e)
                }
            };
            println!("Lisa: {}", reply);

            if !self.speak(&reply) {
                logging::log_voice(Some(&session), "Reply was not spoken");
            }
            exchanges += 1;
        }

        logging::log_voice(Some(&session), &format!("Voice loop ended after {} exchanges", exchanges));
        exchanges
    }
}
