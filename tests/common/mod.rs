#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use lumo::kernel::action::{LocalApp, PowerMode, VoiceProfile};
use lumo::kernel::collaborators::{
    BatteryStatus, Console, Desktop, KnowledgeSource, ListenWindow, Speaker, SpeechListener,
};
use lumo::kernel::context::AssistantContext;
use lumo::kernel::knowledge::LookupOutcome;
use lumo::kernel::notes::NoteStore;
use lumo::{Collaborators, Dispatcher};

/// Pops one scripted result per listen; an empty script behaves like a missing microphone.
#[derive(Default)]
pub struct ScriptedListener {
    pub results: VecDeque<Result<String, String>>,
    pub attempts: usize,
}

impl ScriptedListener {
    pub fn new(results: Vec<Result<&str, &str>>) -> Self {
        Self {
            results: results
                .into_iter()
                .map(|r| r.map(String::from).map_err(String::from))
                .collect(),
            attempts: 0,
        }
    }
}

impl SpeechListener for ScriptedListener {
    async fn listen(&mut self, _window: &ListenWindow) -> anyhow::Result<String> {
        self.attempts += 1;
        match self.results.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(anyhow!(reason)),
            None => Err(anyhow!("no input device available")),
        }
    }
}

/// Typed input comes from a queue; running dry means stdin closed.
#[derive(Default)]
pub struct FakeConsole {
    pub input: VecDeque<String>,
    pub printed: Vec<String>,
    pub prompts: Vec<String>,
}

impl FakeConsole {
    pub fn with_input(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn printed_text(&self) -> String {
        self.printed.join("\n")
    }
}

impl Console for FakeConsole {
    fn print(&mut self, line: &str) {
        self.printed.push(line.to_string());
    }

    async fn read_line(&mut self, label: &str) -> Option<String> {
        self.prompts.push(label.to_string());
        self.input.pop_front()
    }
}

#[derive(Default)]
pub struct RecordingSpeaker {
    pub spoken: Vec<(String, VoiceProfile)>,
}

impl RecordingSpeaker {
    pub fn said(&self, text: &str) -> bool {
        self.spoken.iter().any(|(t, _)| t == text)
    }

    pub fn count(&self, text: &str) -> usize {
        self.spoken.iter().filter(|(t, _)| t == text).count()
    }

    pub fn last_voice(&self) -> Option<VoiceProfile> {
        self.spoken.last().map(|(_, v)| *v)
    }
}

impl Speaker for RecordingSpeaker {
    async fn speak(&mut self, text: &str, voice: VoiceProfile) {
        self.spoken.push((text.to_string(), voice));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopCall {
    Launch(LocalApp),
    OpenUrl(String),
    PlayMedia(String),
    Power(PowerMode),
    Screenshot(PathBuf),
    Mute,
}

#[derive(Default)]
pub struct FakeDesktop {
    pub calls: Vec<DesktopCall>,
    pub battery: Option<BatteryStatus>,
    pub fail_screenshot: bool,
}

impl Desktop for FakeDesktop {
    async fn launch(&mut self, app: LocalApp) -> anyhow::Result<()> {
        self.calls.push(DesktopCall::Launch(app));
        Ok(())
    }

    async fn open_url(&mut self, url: &str) -> anyhow::Result<()> {
        self.calls.push(DesktopCall::OpenUrl(url.to_string()));
        Ok(())
    }

    async fn play_media(&mut self, query: &str) -> anyhow::Result<()> {
        self.calls.push(DesktopCall::PlayMedia(query.to_string()));
        Ok(())
    }

    async fn power(&mut self, mode: PowerMode) -> anyhow::Result<()> {
        self.calls.push(DesktopCall::Power(mode));
        Ok(())
    }

    async fn save_screenshot(&mut self, path: &Path) -> anyhow::Result<()> {
        self.calls.push(DesktopCall::Screenshot(path.to_path_buf()));
        if self.fail_screenshot {
            return Err(anyhow!("no monitor available"));
        }
        std::fs::write(path, b"png")?;
        Ok(())
    }

    async fn mute(&mut self) -> anyhow::Result<()> {
        self.calls.push(DesktopCall::Mute);
        Ok(())
    }

    async fn battery(&mut self) -> Option<BatteryStatus> {
        self.battery
    }
}

/// Canned answers per topic; anything else gets `unknown`.
pub struct FakeKnowledge {
    pub answers: HashMap<String, LookupOutcome>,
    pub unknown: LookupOutcome,
    pub queries: Vec<String>,
}

impl Default for FakeKnowledge {
    fn default() -> Self {
        Self {
            answers: HashMap::new(),
            unknown: LookupOutcome::NotFound,
            queries: Vec::new(),
        }
    }
}

impl FakeKnowledge {
    pub fn answering(pairs: Vec<(&str, LookupOutcome)>) -> Self {
        Self {
            answers: pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            ..Self::default()
        }
    }

    pub fn failing_with(unknown: LookupOutcome) -> Self {
        Self {
            unknown,
            ..Self::default()
        }
    }
}

impl KnowledgeSource for FakeKnowledge {
    async fn summarize(&mut self, topic: &str) -> LookupOutcome {
        self.queries.push(topic.to_string());
        self.answers.get(topic).cloned().unwrap_or_else(|| self.unknown.clone())
    }
}

pub type TestDispatcher = Dispatcher<ScriptedListener, FakeConsole, RecordingSpeaker, FakeDesktop, FakeKnowledge>;

pub fn context_in(dir: &Path) -> AssistantContext {
    AssistantContext::new("LUMO", NoteStore::new(dir.join("notes.txt")), dir.join("screenshots"))
}

/// Text-only dispatcher fed by `lines`.
pub fn text_dispatcher(dir: &Path, lines: &[&str], knowledge: FakeKnowledge) -> TestDispatcher {
    build(dir, None, lines, knowledge, FakeDesktop::default())
}

pub fn build(
    dir: &Path,
    listener: Option<ScriptedListener>,
    lines: &[&str],
    knowledge: FakeKnowledge,
    desktop: FakeDesktop,
) -> TestDispatcher {
    let collaborators = Collaborators {
        listener,
        console: FakeConsole::with_input(lines),
        speaker: RecordingSpeaker::default(),
        desktop,
        knowledge,
    };
    Dispatcher::new(collaborators, context_in(dir), ListenWindow::default())
}
