use chrono::{Local, Timelike};
use tracing::{info, warn};

use super::action::{web_search_url, Action, LaunchTarget, PowerMode, VoiceProfile};
use super::collaborators::{Console, Desktop, KnowledgeSource, ListenWindow, Speaker, SpeechListener};
use super::context::AssistantContext;
use super::input::acquire_utterance;
use super::knowledge::{resolve_unknown, Resolution};
use super::matcher::IntentMatcher;
use super::notes::NotesReport;
use super::screenshot::next_screenshot_path;
use super::telemetry::SessionStats;
use super::utterance::Utterance;
use crate::outputs::realizer;

/// Whether the loop driver should request another utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Exit,
}

/// The external capabilities one dispatcher drives.
/// `listener: None` runs in text-only mode.
pub struct Collaborators<L, C, S, D, K> {
    pub listener: Option<L>,
    pub console: C,
    pub speaker: S,
    pub desktop: D,
    pub knowledge: K,
}

/// Single-threaded turn loop: acquire -> match -> handle, until Exit.
pub struct Dispatcher<L, C, S, D, K> {
    collab: Collaborators<L, C, S, D, K>,
    context: AssistantContext,
    matcher: IntentMatcher,
    window: ListenWindow,
    stats: SessionStats,
}

impl<L, C, S, D, K> Dispatcher<L, C, S, D, K>
where
    L: SpeechListener,
    C: Console,
    S: Speaker,
    D: Desktop,
    K: KnowledgeSource,
{
    pub fn new(collab: Collaborators<L, C, S, D, K>, context: AssistantContext, window: ListenWindow) -> Self {
        Self {
            collab,
            context,
            matcher: IntentMatcher::new(),
            window,
            stats: SessionStats::new(),
        }
    }

    pub fn context(&self) -> &AssistantContext {
        &self.context
    }

    pub fn collaborators(&self) -> &Collaborators<L, C, S, D, K> {
        &self.collab
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Greets, then runs turns until an Exit outcome.
    pub async fn run(&mut self) {
        info!(session = %self.stats.session_id, "Assistant loop started");
        self.greet(Local::now().hour()).await;

        while self.run_turn().await == TurnOutcome::Continue {}

        self.stats.log_summary();
    }

    pub async fn greet(&mut self, hour: u32) {
        self.say(realizer::greeting(hour)).await;
        let intro = realizer::introduction(self.context.name());
        self.say(&intro).await;
    }

    /// One full cycle. Nothing short of Exit (or closed input) ends the loop.
    pub async fn run_turn(&mut self) -> TurnOutcome {
        let Some(utterance) = self.acquire().await else {
            return self.end_session().await;
        };
        if utterance.is_empty() {
            return TurnOutcome::Continue;
        }

        let action = self.matcher.resolve(&utterance);
        info!(action = action.kind(), "Dispatching turn");
        self.execute(action).await
    }

    /// Runs exactly one handler.
    pub async fn execute(&mut self, action: Action) -> TurnOutcome {
        self.stats.record_action(action.kind());

        match action {
            Action::ReportTime => self.report_time().await,
            Action::OpenTarget { target } => self.open_target(&target).await,
            Action::PlayMedia { query } => return self.play_media(query).await,
            Action::WebSearch { query } => return self.web_search(query).await,
            Action::PowerControl(mode) => self.power(mode).await,
            Action::Screenshot => self.screenshot().await,
            Action::MuteVolume => self.mute().await,
            Action::ReportBattery => self.report_battery().await,
            Action::AddNote => return self.add_note().await,
            Action::ReadNotes => self.read_notes().await,
            Action::SetVoice(voice) => self.set_voice(voice).await,
            Action::ShowHelp => self.show_help().await,
            Action::Exit => return self.end_session().await,
            Action::KnowledgeLookup { topic } => self.lookup(&topic).await,
        }

        TurnOutcome::Continue
    }

    async fn acquire(&mut self) -> Option<Utterance> {
        acquire_utterance(
            self.collab.listener.as_mut(),
            &mut self.collab.console,
            &self.window,
            self.context.name(),
        )
        .await
    }

    /// Printed and spoken.
    async fn say(&mut self, text: &str) {
        self.collab.console.print(&format!("{}: {}", self.context.name(), text));
        self.speak(text).await;
    }

    async fn speak(&mut self, text: &str) {
        self.collab.speaker.speak(text, self.context.voice()).await;
    }

    /// Returns `value` if present, otherwise asks `question` once.
    /// `Err` carries the outcome for the turn when no argument was obtained.
    async fn require(&mut self, value: String, question: &str) -> Result<String, TurnOutcome> {
        if !value.is_empty() {
            return Ok(value);
        }

        self.say(question).await;
        match self.acquire().await {
            Some(answer) if !answer.is_empty() => Ok(answer.into_string()),
            Some(_) => {
                self.say("I didn't catch that.").await;
                Err(TurnOutcome::Continue)
            }
            None => Err(self.end_session().await),
        }
    }

    async fn end_session(&mut self) -> TurnOutcome {
        let farewell = realizer::farewell(self.context.name());
        self.say(&farewell).await;
        TurnOutcome::Exit
    }

    async fn report_time(&mut self) {
        let now = Local::now().format("%H:%M:%S").to_string();
        self.say(&format!("The time is {}", now)).await;
    }

    async fn open_target(&mut self, target: &str) {
        match LaunchTarget::resolve(target) {
            LaunchTarget::App(app) => {
                self.say(&format!("Opening {}", app.display_name())).await;
                if let Err(e) = self.collab.desktop.launch(app).await {
                    warn!(app = app.display_name(), "Launch failed: {:#}", e);
                }
            }
            LaunchTarget::Site(url) => {
                self.say(&format!("Opening {}", target)).await;
                self.open_url(&url).await;
            }
        }
    }

    async fn open_url(&mut self, url: &str) {
        if let Err(e) = self.collab.desktop.open_url(url).await {
            warn!(url, "Browser open failed: {:#}", e);
        }
    }

    async fn open_search(&mut self, query: &str) {
        let url = web_search_url(query);
        self.open_url(&url).await;
    }

    async fn play_media(&mut self, query: String) -> TurnOutcome {
        let query = match self.require(query, "Which song should I play?").await {
            Ok(query) => query,
            Err(outcome) => return outcome,
        };

        self.say(&format!("Playing {} on YouTube", query)).await;
        if let Err(e) = self.collab.desktop.play_media(&query).await {
            warn!("Media playback failed: {:#}", e);
        }
        TurnOutcome::Continue
    }

    async fn web_search(&mut self, query: String) -> TurnOutcome {
        let query = match self.require(query, "What do you want me to search?").await {
            Ok(query) => query,
            Err(outcome) => return outcome,
        };

        self.say(&format!("Searching for {}", query)).await;
        self.open_search(&query).await;
        TurnOutcome::Continue
    }

    async fn power(&mut self, mode: PowerMode) {
        self.say(realizer::power_announcement(mode)).await;
        if let Err(e) = self.collab.desktop.power(mode).await {
            warn!(?mode, "Power command failed: {:#}", e);
        }
    }

    async fn screenshot(&mut self) {
        let path = match next_screenshot_path(self.context.screenshot_dir()) {
            Ok(path) => path,
            Err(e) => {
                warn!("Screenshot directory unavailable: {}", e);
                self.say("I couldn't prepare the screenshot folder.").await;
                return;
            }
        };

        match self.collab.desktop.save_screenshot(&path).await {
            Ok(()) => {
                self.say(&format!("Screenshot taken and saved as {}", path.display())).await;
            }
            Err(e) => {
                warn!("Screen capture failed: {:#}", e);
                self.say("I couldn't take a screenshot.").await;
            }
        }
    }

    async fn mute(&mut self) {
        if let Err(e) = self.collab.desktop.mute().await {
            warn!("Mute command failed: {:#}", e);
        }
        self.say("System volume muted").await;
    }

    async fn report_battery(&mut self) {
        match self.collab.desktop.battery().await {
            Some(status) => {
                let sentence = realizer::battery_sentence(&status);
                self.say(&sentence).await;
            }
            None => self.say("Battery information not available.").await,
        }
    }

    async fn add_note(&mut self) -> TurnOutcome {
        let note = match self.require(String::new(), "What should I write in your note?").await {
            Ok(note) => note,
            Err(outcome) => return outcome,
        };

        match self.context.notes().append(&note) {
            Ok(()) => self.say("I have saved your note.").await,
            Err(e) => {
                warn!("{}", e);
                self.say("I couldn't save your note.").await;
            }
        }
        TurnOutcome::Continue
    }

    async fn read_notes(&mut self) {
        match self.context.notes().read() {
            Ok(NotesReport::Missing) => self.say("No notes found yet.").await,
            Ok(NotesReport::Empty) => self.say("Your notes file is empty.").await,
            Ok(NotesReport::Notes(notes)) => {
                self.say("Here are your saved notes.").await;
                for note in notes {
                    self.collab.console.print(&format!("- {}", note));
                    self.speak(&note).await;
                }
            }
            Err(e) => {
                warn!("{}", e);
                self.say("I couldn't read your notes.").await;
            }
        }
    }

    async fn set_voice(&mut self, voice: VoiceProfile) {
        self.context.set_voice(voice);
        self.say(realizer::voice_confirmation(voice)).await;
    }

    async fn show_help(&mut self) {
        let listing = realizer::help_listing(self.context.name());
        self.collab.console.print(&listing);
        self.say("I have shown the list of commands on your screen.").await;
    }

    async fn lookup(&mut self, topic: &str) {
        let resolution = resolve_unknown(&mut self.collab.knowledge, topic).await;
        self.stats.record_resolution(&resolution);

        match resolution {
            Resolution::Answered { topic, summary } => self.report_summary(&topic, &summary).await,
            Resolution::Disambiguated { chosen, summary, .. } => self.report_summary(&chosen, &summary).await,
            Resolution::NotFound { topic } => {
                self.say(&format!("Sorry, I couldn't find any page for {}. Let me search online.", topic))
                    .await;
                self.open_search(&topic).await;
            }
            Resolution::Failed { topic, reason } => {
                warn!(%reason, "Knowledge lookup failed");
                self.say(&format!("I don't know about {}, but I can search it online.", topic))
                    .await;
                self.open_search(&topic).await;
            }
        }
    }

    async fn report_summary(&mut self, topic: &str, summary: &str) {
        let name = self.context.name().to_string();
        self.collab
            .console
            .print(&format!("\n[{}] Info about '{}':\n{}\n", name, topic, summary));
        self.speak(summary).await;
    }
}
