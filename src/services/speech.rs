use tokio::process::Command;
use tracing::warn;

use crate::config::SpeechConfig;
use crate::kernel::action::VoiceProfile;
use crate::kernel::collaborators::Speaker;

/// Text-to-speech through the platform synthesizer (`say` or `espeak`).
pub struct CommandSpeaker {
    enabled: bool,
    rate: u32,
    female_voice: String,
    male_voice: String,
}

fn default_voice(voice: VoiceProfile) -> &'static str {
    match (cfg!(target_os = "macos"), voice) {
        (true, VoiceProfile::Female) => "Samantha",
        (true, VoiceProfile::Male) => "Alex",
        (false, VoiceProfile::Female) => "en+f3",
        (false, VoiceProfile::Male) => "en+m3",
    }
}

impl CommandSpeaker {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            enabled: config.enabled,
            rate: config.rate,
            female_voice: config
                .female_voice
                .clone()
                .unwrap_or_else(|| default_voice(VoiceProfile::Female).to_string()),
            male_voice: config
                .male_voice
                .clone()
                .unwrap_or_else(|| default_voice(VoiceProfile::Male).to_string()),
        }
    }

    fn voice_name(&self, voice: VoiceProfile) -> &str {
        match voice {
            VoiceProfile::Female => &self.female_voice,
            VoiceProfile::Male => &self.male_voice,
        }
    }

    fn command(&self, text: &str, voice: VoiceProfile) -> Command {
        let rate = self.rate.to_string();
        let (program, rate_flag) = if cfg!(target_os = "macos") {
            ("say", "-r")
        } else {
            ("espeak", "-s")
        };
        let mut cmd = Command::new(program);
        // "--" keeps text such as "-5 degrees" from being read as a flag.
        cmd.args(["-v", self.voice_name(voice), rate_flag, rate.as_str(), "--", text])
            .kill_on_drop(true);
        cmd
    }
}

impl Speaker for CommandSpeaker {
    async fn speak(&mut self, text: &str, voice: VoiceProfile) {
        if !self.enabled || text.trim().is_empty() {
            return;
        }
        match self.command(text, voice).status().await {
            Ok(status) if !status.success() => warn!("Speech synthesizer exited with {}", status),
            Ok(_) => {}
            Err(e) => warn!("Failed to spawn speech synthesizer: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn dash_leading_text_is_not_a_flag() {
        let speaker = CommandSpeaker::new(&SpeechConfig::default());
        let args = args(&speaker.command("-5 degrees outside", VoiceProfile::Female));

        assert_eq!(args[args.len() - 2..], ["--", "-5 degrees outside"]);
    }

    #[test]
    fn configured_voice_is_used() {
        let config = SpeechConfig {
            male_voice: Some("en+m1".into()),
            ..SpeechConfig::default()
        };
        let speaker = CommandSpeaker::new(&config);
        let args = args(&speaker.command("hello", VoiceProfile::Male));

        assert_eq!(args[0], "-v");
        assert_eq!(args[1], "en+m1");
        assert_eq!(args[3], "170");
    }
}
