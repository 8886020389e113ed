use std::path::{Path, PathBuf};

use super::action::VoiceProfile;
use super::notes::NoteStore;

/// Process-wide assistant state, owned by the dispatcher.
#[derive(Debug, Clone)]
pub struct AssistantContext {
    name: String,
    voice: VoiceProfile,
    notes: NoteStore,
    screenshot_dir: PathBuf,
}

impl AssistantContext {
    pub fn new(name: impl Into<String>, notes: NoteStore, screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            voice: VoiceProfile::default(),
            notes,
            screenshot_dir: screenshot_dir.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn voice(&self) -> VoiceProfile {
        self.voice
    }

    /// Affects speech from now on only.
    pub fn set_voice(&mut self, voice: VoiceProfile) {
        self.voice = voice;
    }

    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    pub fn screenshot_dir(&self) -> &Path {
        &self.screenshot_dir
    }
}
