use reqwest::Url;

const WEB_SEARCH_URL: &str = "https://www.google.com/search";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerMode {
    Shutdown,
    Restart,
    Logout,
}

/// Process-wide speaking voice. Not persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VoiceProfile {
    Male,
    #[default]
    Female,
}

/// Applications that "open <name>" launches locally instead of as a website.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalApp {
    Notepad,
    Calculator,
    Chrome,
}

impl LocalApp {
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias {
            "notepad" => Some(Self::Notepad),
            "calculator" => Some(Self::Calculator),
            "chrome" => Some(Self::Chrome),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Notepad => "Notepad",
            Self::Calculator => "Calculator",
            Self::Chrome => "Chrome",
        }
    }
}

/// Where an `OpenTarget` ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    App(LocalApp),
    Site(String),
}

impl LaunchTarget {
    /// Local aliases win; anything else is treated as a bare domain name.
    pub fn resolve(target: &str) -> Self {
        match LocalApp::from_alias(target) {
            Some(app) => Self::App(app),
            None => Self::Site(site_url(target)),
        }
    }
}

/// `"example"` -> `https://example.com`. Inner whitespace is dropped so
/// "stack overflow" still forms a host name.
pub fn site_url(target: &str) -> String {
    let host: String = target.split_whitespace().collect();
    format!("https://{}.com", host)
}

pub fn web_search_url(query: &str) -> String {
    match Url::parse_with_params(WEB_SEARCH_URL, &[("q", query)]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}?q={}", WEB_SEARCH_URL, query),
    }
}

/// The single operation selected for a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ReportTime,
    OpenTarget { target: String },
    /// Empty query means the handler re-prompts first.
    PlayMedia { query: String },
    /// Empty query means the handler re-prompts first.
    WebSearch { query: String },
    PowerControl(PowerMode),
    Screenshot,
    MuteVolume,
    ReportBattery,
    /// Note text is collected by a follow-up prompt, never from the trigger.
    AddNote,
    ReadNotes,
    SetVoice(VoiceProfile),
    ShowHelp,
    Exit,
    KnowledgeLookup { topic: String },
}

impl Action {
    /// Stable label used in logs and session counters.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::ReportTime => "report_time",
            Action::OpenTarget { .. } => "open_target",
            Action::PlayMedia { .. } => "play_media",
            Action::WebSearch { .. } => "web_search",
            Action::PowerControl(PowerMode::Shutdown) => "shutdown",
            Action::PowerControl(PowerMode::Restart) => "restart",
            Action::PowerControl(PowerMode::Logout) => "logout",
            Action::Screenshot => "screenshot",
            Action::MuteVolume => "mute",
            Action::ReportBattery => "battery",
            Action::AddNote => "add_note",
            Action::ReadNotes => "read_notes",
            Action::SetVoice(_) => "set_voice",
            Action::ShowHelp => "help",
            Action::Exit => "exit",
            Action::KnowledgeLookup { .. } => "knowledge_lookup",
        }
    }
}
