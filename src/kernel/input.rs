use tracing::{debug, warn};

use super::collaborators::{Console, ListenWindow, SpeechListener};
use super::utterance::Utterance;

/// Obtains one utterance, preferring the microphone and degrading to typed
/// input on any capture or transcription failure.
///
/// With no listener (text-only mode) it prompts directly. The typed prompt has
/// no timeout. `None` only when the console input has closed.
pub async fn acquire_utterance<L, C>(
    listener: Option<&mut L>,
    console: &mut C,
    window: &ListenWindow,
    name: &str,
) -> Option<Utterance>
where
    L: SpeechListener,
    C: Console,
{
    if let Some(listener) = listener {
        console.print(&format!("[{}] Listening...", name));
        match listener.listen(window).await {
            Ok(text) => {
                console.print(&format!("[{}] You said: {}", name, text));
                return Some(Utterance::normalize(&text));
            }
            Err(e) => {
                debug!("Voice capture unavailable: {:#}", e);
                console.print(&format!("[{}] Voice not working. Please type your command below:", name));
            }
        }
    }

    match console.read_line(&format!("{} Command: ", name)).await {
        Some(line) => Some(Utterance::normalize(&line)),
        None => {
            warn!("Console input closed");
            None
        }
    }
}
