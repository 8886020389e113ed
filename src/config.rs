use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::kernel::collaborators::ListenWindow;

pub const CONFIG_ENV: &str = "LUMO_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "lumo.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub name: String,
    pub notes_path: PathBuf,
    pub screenshot_dir: PathBuf,
    /// `false` skips the microphone and always prompts for typed input.
    pub voice_input: bool,
    pub listen: ListenConfig,
    pub speech: SpeechConfig,
    pub transcription: TranscriptionConfig,
    pub knowledge: KnowledgeConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "LUMO".to_string(),
            notes_path: PathBuf::from("notes.txt"),
            screenshot_dir: PathBuf::from("screenshots"),
            voice_input: true,
            listen: ListenConfig::default(),
            speech: SpeechConfig::default(),
            transcription: TranscriptionConfig::default(),
            knowledge: KnowledgeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub timeout_ms: u64,
    pub phrase_limit_ms: u64,
    pub pause_ms: u64,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            phrase_limit_ms: 5000,
            pause_ms: 1000,
        }
    }
}

impl ListenConfig {
    pub fn window(&self) -> ListenWindow {
        ListenWindow {
            timeout: Duration::from_millis(self.timeout_ms),
            phrase_limit: Duration::from_millis(self.phrase_limit_ms),
            pause: Duration::from_millis(self.pause_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// Words per minute.
    pub rate: u32,
    /// Synthesizer voice names; `None` picks a platform default.
    pub female_voice: Option<String>,
    pub male_voice: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 170,
            female_voice: None,
            male_voice: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// whisper.cpp style `/inference` endpoint.
    pub url: String,
    pub language: String,
    pub timeout_ms: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/inference".to_string(),
            language: "en".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub base_url: String,
    /// Sentences kept from each summary.
    pub sentences: usize,
    pub timeout_ms: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
            sentences: 2,
            timeout_ms: 10_000,
        }
    }
}

impl AssistantConfig {
    /// `$LUMO_CONFIG`, else `./lumo.toml` if present, else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}
