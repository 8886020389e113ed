use std::fmt;

use super::action::{Action, PowerMode, VoiceProfile};
use super::utterance::Utterance;

/// Structural test applied to a normalized utterance.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Substring anywhere.
    Contains(&'static str),
    /// Utterance starts with the literal prefix.
    Prefix(&'static str),
    /// The bare keyword, or the keyword followed by a space.
    Command(&'static str),
    /// A whole alphanumeric word ("male" does not match inside "female").
    Word(&'static str),
    AllOf(&'static [Trigger]),
    AnyOf(&'static [Trigger]),
}

impl Trigger {
    pub fn holds(&self, text: &str) -> bool {
        match self {
            Trigger::Contains(needle) => text.contains(needle),
            Trigger::Prefix(prefix) => text.starts_with(prefix),
            Trigger::Command(keyword) => match text.strip_prefix(keyword) {
                Some(rest) => rest.is_empty() || rest.starts_with(' '),
                None => false,
            },
            Trigger::Word(word) => text
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == *word),
            Trigger::AllOf(parts) => parts.iter().all(|t| t.holds(text)),
            Trigger::AnyOf(parts) => parts.iter().any(|t| t.holds(text)),
        }
    }
}

/// Ordered (predicate, action) pair. The table order is the tie-break.
#[derive(Clone, Copy)]
pub struct IntentRule {
    pub name: &'static str,
    pub trigger: Trigger,
    build: fn(&str) -> Action,
}

impl fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRule")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .finish()
    }
}

impl IntentRule {
    pub fn action_for(&self, text: &str) -> Action {
        (self.build)(text)
    }
}

fn remainder(text: &str, keyword: &str) -> String {
    text.strip_prefix(keyword).unwrap_or_default().trim().to_string()
}

pub static RULES: &[IntentRule] = &[
    IntentRule { name: "time", trigger: Trigger::Contains("time"), build: |_| Action::ReportTime },
    IntentRule {
        name: "open",
        trigger: Trigger::Prefix("open "),
        build: |t| Action::OpenTarget { target: remainder(t, "open ") },
    },
    IntentRule {
        name: "play",
        trigger: Trigger::Command("play"),
        build: |t| Action::PlayMedia { query: remainder(t, "play") },
    },
    IntentRule {
        name: "search",
        trigger: Trigger::Command("search"),
        build: |t| Action::WebSearch { query: remainder(t, "search") },
    },
    IntentRule {
        name: "shutdown",
        trigger: Trigger::Contains("shutdown"),
        build: |_| Action::PowerControl(PowerMode::Shutdown),
    },
    IntentRule {
        name: "restart",
        trigger: Trigger::Contains("restart"),
        build: |_| Action::PowerControl(PowerMode::Restart),
    },
    IntentRule {
        name: "logout",
        trigger: Trigger::Contains("logout"),
        build: |_| Action::PowerControl(PowerMode::Logout),
    },
    IntentRule { name: "screenshot", trigger: Trigger::Contains("screenshot"), build: |_| Action::Screenshot },
    IntentRule { name: "mute", trigger: Trigger::Contains("mute"), build: |_| Action::MuteVolume },
    IntentRule { name: "battery", trigger: Trigger::Contains("battery"), build: |_| Action::ReportBattery },
    IntentRule { name: "take_note", trigger: Trigger::Contains("take a note"), build: |_| Action::AddNote },
    IntentRule { name: "read_notes", trigger: Trigger::Contains("read notes"), build: |_| Action::ReadNotes },
    // Unlike the other rules, "male" is a whole-word test so "voice female"
    // falls through to the rule below.
    IntentRule {
        name: "voice_male",
        trigger: Trigger::AllOf(&[Trigger::Contains("voice"), Trigger::Word("male")]),
        build: |_| Action::SetVoice(VoiceProfile::Male),
    },
    IntentRule {
        name: "voice_female",
        trigger: Trigger::AllOf(&[Trigger::Contains("voice"), Trigger::Contains("female")]),
        build: |_| Action::SetVoice(VoiceProfile::Female),
    },
    IntentRule { name: "help", trigger: Trigger::Contains("help"), build: |_| Action::ShowHelp },
    IntentRule {
        name: "exit",
        trigger: Trigger::AnyOf(&[Trigger::Contains("exit"), Trigger::Contains("quit")]),
        build: |_| Action::Exit,
    },
];

/// First-match-wins lookup over a static rule table.
#[derive(Debug, Clone, Copy)]
pub struct IntentMatcher {
    rules: &'static [IntentRule],
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentMatcher {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    pub fn rules(&self) -> &'static [IntentRule] {
        self.rules
    }

    /// The first rule whose trigger holds, in table order.
    pub fn rule_for(&self, utterance: &Utterance) -> Option<&'static IntentRule> {
        self.rules.iter().find(|rule| rule.trigger.holds(utterance.as_str()))
    }

    /// Pure: no rule means a knowledge lookup on the whole utterance.
    pub fn resolve(&self, utterance: &Utterance) -> Action {
        match self.rule_for(utterance) {
            Some(rule) => rule.action_for(utterance.as_str()),
            None => Action::KnowledgeLookup { topic: utterance.as_str().to_string() },
        }
    }
}
