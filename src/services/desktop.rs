use std::path::Path;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tokio::process::Command;
use tracing::{debug, warn};

use super::battery;
use super::media::VideoResolver;
use crate::kernel::action::{LocalApp, PowerMode};
use crate::kernel::collaborators::{BatteryStatus, Desktop};

/// Program invocation: executable plus arguments.
type Invocation = (&'static str, Vec<String>);

/// Per-platform program for a local app alias.
pub fn app_invocation(app: LocalApp) -> Invocation {
    let (windows, linux, macos) = match app {
        LocalApp::Notepad => ("notepad.exe", "gedit", "TextEdit"),
        LocalApp::Calculator => ("calc.exe", "gnome-calculator", "Calculator"),
        LocalApp::Chrome => ("chrome.exe", "google-chrome", "Google Chrome"),
    };
    if cfg!(target_os = "windows") {
        ("cmd", vec!["/C".into(), "start".into(), String::new(), windows.into()])
    } else if cfg!(target_os = "macos") {
        ("open", vec!["-a".into(), macos.into()])
    } else {
        (linux, vec![])
    }
}

pub fn url_invocation(url: &str) -> Invocation {
    if cfg!(target_os = "windows") {
        ("rundll32", vec!["url.dll,FileProtocolHandler".into(), url.into()])
    } else if cfg!(target_os = "macos") {
        ("open", vec![url.into()])
    } else {
        ("xdg-open", vec![url.into()])
    }
}

pub fn power_invocation(mode: PowerMode) -> Invocation {
    if cfg!(target_os = "windows") {
        let args = match mode {
            PowerMode::Shutdown => vec!["/s", "/t", "1"],
            PowerMode::Restart => vec!["/r", "/t", "1"],
            PowerMode::Logout => vec!["-l"],
        };
        ("shutdown", args.into_iter().map(String::from).collect())
    } else if cfg!(target_os = "macos") {
        let script = match mode {
            PowerMode::Shutdown => "tell application \"System Events\" to shut down",
            PowerMode::Restart => "tell application \"System Events\" to restart",
            PowerMode::Logout => "tell application \"System Events\" to log out",
        };
        ("osascript", vec!["-e".into(), script.into()])
    } else {
        match mode {
            PowerMode::Shutdown => ("systemctl", vec!["poweroff".into()]),
            PowerMode::Restart => ("systemctl", vec!["reboot".into()]),
            PowerMode::Logout => {
                let user = std::env::var("USER").unwrap_or_default();
                ("loginctl", vec!["terminate-user".into(), user])
            }
        }
    }
}

pub fn mute_invocation() -> Invocation {
    if cfg!(target_os = "windows") {
        // Requires NirCmd on PATH.
        ("nircmd.exe", vec!["mutesysvolume".into(), "1".into()])
    } else if cfg!(target_os = "macos") {
        ("osascript", vec!["-e".into(), "set volume output muted true".into()])
    } else {
        ("amixer", vec!["set".into(), "Master".into(), "mute".into()])
    }
}

/// Fire-and-forget start of a GUI program.
fn spawn_detached((program, args): Invocation) -> Result<()> {
    debug!(program, ?args, "Spawning");
    Command::new(program)
        .args(&args)
        .spawn()
        .with_context(|| format!("failed to spawn {}", program))?;
    Ok(())
}

/// Runs a short command to completion and checks its exit status.
async fn run((program, args): Invocation) -> Result<()> {
    debug!(program, ?args, "Running");
    let status = Command::new(program)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("failed to run {}", program))?;
    if !status.success() {
        return Err(anyhow!("{} exited with {}", program, status));
    }
    Ok(())
}

/// The host operating system as a `Desktop`.
pub struct SystemDesktop {
    videos: VideoResolver,
}

impl SystemDesktop {
    pub fn new(client: Client) -> Self {
        Self {
            videos: VideoResolver::new(client),
        }
    }
}

impl Desktop for SystemDesktop {
    async fn launch(&mut self, app: LocalApp) -> Result<()> {
        spawn_detached(app_invocation(app))
    }

    async fn open_url(&mut self, url: &str) -> Result<()> {
        spawn_detached(url_invocation(url))
    }

    async fn play_media(&mut self, query: &str) -> Result<()> {
        let url = match self.videos.resolve(query).await {
            Ok(url) => url,
            Err(e) => {
                warn!("Video lookup failed, opening results page: {:#}", e);
                VideoResolver::results_url(query)?
            }
        };
        spawn_detached(url_invocation(url.as_str()))
    }

    async fn power(&mut self, mode: PowerMode) -> Result<()> {
        spawn_detached(power_invocation(mode))
    }

    async fn save_screenshot(&mut self, path: &Path) -> Result<()> {
        let monitor = xcap::Monitor::all()?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no monitor available"))?;
        let image = monitor.capture_image()?;
        image
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    async fn mute(&mut self) -> Result<()> {
        run(mute_invocation()).await
    }

    async fn battery(&mut self) -> Option<BatteryStatus> {
        battery::battery_status().await
    }
}
