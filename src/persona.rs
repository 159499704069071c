// Lisa's persona prompt and the lightweight style routing applied on top of it

pub const LISA_PERSONA: &str = r#"You are Lisa: a warm, high-energy, capable AI partner.
Core traits:
- Empathetic, encouraging, but candid when needed.
- Action-oriented: suggest next steps, frameworks, and concrete examples.
- Playful wit when appropriate; respectful and professional by default.
- Clear, structured communication; concise by default; expand on request.

Capabilities you emphasize:
- Strategic reasoning, brainstorming, and step-by-step planning
- Coaching, accountability, and motivational support
- Research assistance and summarization
- Creative ideation (naming, copy, pitches, scripts)

Boundaries:
- Avoid medical, legal, or financial advice beyond general information.
- Never claim tools or browsing beyond what is explicitly available.

Voice & style:
- Friendly, optimistic, and direct.
- Default to bullet points for clarity; add examples when useful.
- End with a crisp takeaway or next action when appropriate.

When asked for a joke: keep it clean and light. When asked for a motivational
boost: be energetic, specific, and draw on proven mindset techniques."#;

/// The system prompt for one session; tweaks only live as long as the session
#[derive(Debug, Clone)]
pub struct Persona {
    pub system_prompt: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            system_prompt: LISA_PERSONA.to_string(),
        }
    }
}

impl Persona {
    pub fn tweak(&mut self, additions: &str) {
        self.system_prompt.push_str("\n\n");
        self.system_prompt.push_str(additions.trim());
    }

    /// System prompt for this turn, with the style hint appended when present
    pub fn system_for(&self, hint: Option<StyleHint>) -> String {
        match hint {
            Some(hint) => format!("{}\n\nStyle hint: {}", self.system_prompt, hint.instruction()),
            None => self.system_prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleHint {
    Joke,
    Motivation,
    Advice,
}

impl StyleHint {
    pub fn instruction(&self) -> &'static str {
        match self {
            StyleHint::Joke => "User requests a short, clean joke.",
            StyleHint::Motivation => "User requests a brief, high-energy motivational speech.",
            StyleHint::Advice => "User requests practical, step-by-step advice with examples.",
        }
    }
}

/// Detect the kind of reply the user is asking for. Jokes win over motivation,
/// motivation over advice.
pub fn detect_style_hint(message: &str) -> Option<StyleHint> {
    let lower = message.trim().to_lowercase();

    let joke_keywords = ["joke", "make me laugh"];
    let motivation_keywords = ["motivate", "pep talk", "motivation", "hype me"];
    let advice_keywords = ["advice", "how do i", "what should i do"];

    if joke_keywords.iter().any(|k| lower.contains(k)) {
        Some(StyleHint::Joke)
    } else if motivation_keywords.iter().any(|k| lower.contains(k)) {
        Some(StyleHint::Motivation)
    } else if advice_keywords.iter().any(|k| lower.contains(k)) {
        Some(StyleHint::Advice)
    } else {
        None
    }
}

/// Prompt sent to the model for a single user turn
pub fn build_prompt(user_input: &str) -> String {
    format!("User: {}\nAssistant:", user_input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_style_hint() {
        assert_eq!(detect_style_hint("Tell me a JOKE about coffee"), Some(StyleHint::Joke));
        assert_eq!(detect_style_hint("I need a pep talk"), Some(StyleHint::Motivation));
        assert_eq!(detect_style_hint("What should I do next?"), Some(StyleHint::Advice));
        assert_eq!(detect_style_hint("hello"), None);
        // joke outranks advice
        assert_eq!(detect_style_hint("any advice on a joke?"), Some(StyleHint::Joke));
    }

    #[test]
    fn test_tweak_appends_to_prompt() {
        let mut persona = Persona::default();
        persona.tweak("  Speak like a pirate.  ");
        assert!(persona.system_prompt.starts_with("You are Lisa"));
        assert!(persona.system_prompt.ends_with("\n\nSpeak like a pirate."));
    }

    #[test]
    fn test_system_for_adds_hint() {
        let persona = Persona::default();
        let system = persona.system_for(Some(StyleHint::Joke));
        assert!(system.ends_with("Style hint: User requests a short, clean joke."));
        assert_eq!(persona.system_for(None), LISA_PERSONA);
    }

    #[test]
    fn test_build_prompt() {
        assert_eq!(build_prompt("hi"), "User: hi\nAssistant:");
    }
}
