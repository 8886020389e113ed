use std::time::Duration;

use lumo::audio::MicrophoneListener;
use lumo::config::AssistantConfig;
use lumo::kernel::context::AssistantContext;
use lumo::kernel::notes::NoteStore;
use lumo::services::console::StdConsole;
use lumo::services::desktop::SystemDesktop;
use lumo::services::knowledge::WikipediaClient;
use lumo::services::speech::CommandSpeaker;
use lumo::services::transcription::TranscriptionService;
use lumo::{Collaborators, Dispatcher};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs on stderr; stdout is the assistant's console.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lumo=info")))
        .with_writer(std::io::stderr)
        .init();

    let config = AssistantConfig::load()?;
    tracing::info!(name = %config.name, voice_input = config.voice_input, "Assistant Booting...");
    println!(" Starting {} AI Assistant ", config.name);

    let listener = config
        .voice_input
        .then(|| MicrophoneListener::new(TranscriptionService::new(&config.transcription)));

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_default();

    let collaborators = Collaborators {
        listener,
        console: StdConsole::new(),
        speaker: CommandSpeaker::new(&config.speech),
        desktop: SystemDesktop::new(http),
        knowledge: WikipediaClient::new(&config.knowledge),
    };
    let context = AssistantContext::new(
        config.name.clone(),
        NoteStore::new(config.notes_path.clone()),
        config.screenshot_dir.clone(),
    );

    let mut dispatcher = Dispatcher::new(collaborators, context, config.listen.window());
    dispatcher.run().await;

    tracing::info!("Assistant stopped");
    Ok(())
}
