use std::collections::HashMap;
use std::str::FromStr;

use tracing::warn;

use crate::service::openai_service::OpenAIClient;

/// Tone preset for generated acknowledgment phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Depressing,
    Motivational,
    #[default]
    Disciplined,
}

impl Theme {
    pub fn prompt_type(self) -> &'static str {
        match self {
            Theme::Depressing => "ack_depressing",
            Theme::Motivational => "ack_motivational",
            Theme::Disciplined => "ack_disciplined",
        }
    }

    /// Deterministic phrase used when the model call fails or returns
    /// nothing usable.
    pub fn fallback_phrase(self, activity: &str) -> String {
        match self {
            Theme::Depressing => format!(
                "Another obligation begins. I am starting {} now, for what it is worth.",
                activity
            ),
            Theme::Motivational => format!(
                "Let's go! I am starting {} right now and giving it everything!",
                activity
            ),
            Theme::Disciplined => {
                format!("Commencing {} as scheduled. Focus and execute.", activity)
            }
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "depressing" => Ok(Theme::Depressing),
            "motivational" => Ok(Theme::Motivational),
            "disciplined" => Ok(Theme::Disciplined),
            other => Err(format!("unknown reminder theme: {}", other)),
        }
    }
}

/// Outcome of checking a user reply against the pending phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched { activity: String },
    NoMatch,
}

/// Outstanding acknowledgment phrases, keyed by activity name.
///
/// The key is the plain name: two activities sharing a name share one
/// pending slot, and a later reminder overwrites the earlier phrase.
/// Session-only state, lost on restart.
#[derive(Debug, Default)]
pub struct AckState {
    pending: HashMap<String, String>,
}

impl AckState {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Records the phrase expected for an activity, replacing any prior
    /// entry under the same name.
    pub fn expect_phrase(&mut self, activity: &str, phrase: &str) {
        self.pending.insert(activity.to_string(), phrase.to_string());
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_phrase(&self, activity: &str) -> Option<&str> {
        self.pending.get(activity).map(String::as_str)
    }

    /// Compares the reply case-insensitively against every pending phrase.
    /// A match removes exactly that entry; anything else leaves the set
    /// untouched. No fuzzy matching, no partial credit.
    pub fn acknowledge(&mut self, user_text: &str) -> MatchResult {
        let spoken = user_text.trim().to_lowercase();
        let matched = self
            .pending
            .iter()
            .find(|(_, phrase)| phrase.trim().to_lowercase() == spoken)
            .map(|(name, _)| name.clone());
        match matched {
            Some(activity) => {
                self.pending.remove(&activity);
                MatchResult::Matched { activity }
            }
            None => MatchResult::NoMatch,
        }
    }
}

pub struct AcknowledgmentService;

impl AcknowledgmentService {
    /// Asks the model for a themed acknowledgment phrase for the activity.
    /// Surrounding quote characters are stripped from the reply; a failed
    /// call or an empty reply falls back to the theme's fixed template.
    pub async fn request_phrase<C: OpenAIClient + ?Sized>(
        openai: &C,
        activity: &str,
        theme: Theme,
    ) -> String {
        match openai.generate_prompt(activity, theme.prompt_type()).await {
            Ok(reply) => {
                let phrase = reply.trim().trim_matches(|c| c == '"' || c == '\'').trim();
                if phrase.is_empty() {
                    theme.fallback_phrase(activity)
                } else {
                    phrase.to_string()
                }
            }
            Err(err) => {
                warn!(
                    "phrase generation failed for '{}', using the {:?} fallback: {}",
                    activity, theme, err
                );
                theme.fallback_phrase(activity)
            }
        }
    }
}
