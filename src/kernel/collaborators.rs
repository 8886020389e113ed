//! Narrow capability interfaces the dispatcher drives.
//!
//! Every call is awaited in turn by the single dispatch loop, so none of these
//! futures need to be `Send`.
#![allow(async_fn_in_trait)]

use std::path::Path;
use std::time::Duration;

use super::action::{LocalApp, PowerMode, VoiceProfile};
use super::knowledge::LookupOutcome;

/// Bounds for one microphone listen attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenWindow {
    /// How long to wait for speech to begin.
    pub timeout: Duration,
    /// Maximum phrase length once speech has begun.
    pub phrase_limit: Duration,
    /// Trailing silence that ends the phrase.
    pub pause: Duration,
}

impl Default for ListenWindow {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            phrase_limit: Duration::from_secs(5),
            pause: Duration::from_secs(1),
        }
    }
}

/// Speech capture + transcription. Any failure means "unavailable".
pub trait SpeechListener {
    async fn listen(&mut self, window: &ListenWindow) -> anyhow::Result<String>;
}

/// Terminal I/O. `read_line` blocks without a bound; `None` means the input closed.
pub trait Console {
    fn print(&mut self, line: &str);
    async fn read_line(&mut self, label: &str) -> Option<String>;
}

pub trait Speaker {
    /// Returns once playback has finished.
    async fn speak(&mut self, text: &str, voice: VoiceProfile);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryStatus {
    pub percent: u8,
    pub plugged: bool,
}

/// OS-facing effects. All best-effort; the dispatcher logs failures and moves on.
pub trait Desktop {
    async fn launch(&mut self, app: LocalApp) -> anyhow::Result<()>;
    async fn open_url(&mut self, url: &str) -> anyhow::Result<()>;
    async fn play_media(&mut self, query: &str) -> anyhow::Result<()>;
    async fn power(&mut self, mode: PowerMode) -> anyhow::Result<()>;
    async fn save_screenshot(&mut self, path: &Path) -> anyhow::Result<()>;
    async fn mute(&mut self) -> anyhow::Result<()>;
    /// `None` when no battery sensor is present.
    async fn battery(&mut self) -> Option<BatteryStatus>;
}

pub trait KnowledgeSource {
    async fn summarize(&mut self, topic: &str) -> LookupOutcome;
}
