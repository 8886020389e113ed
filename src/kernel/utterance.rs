use std::fmt;

/// One normalized line of user input: trimmed and lowercased.
/// Lives for a single dispatch turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Utterance(String);

impl Utterance {
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
