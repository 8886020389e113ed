use anyhow::{anyhow, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::TranscriptionConfig;

/// Speech-to-text over a whisper.cpp compatible HTTP server.
#[derive(Clone)]
pub struct TranscriptionService {
    client: Client,
    url: String,
    language: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl TranscriptionService {
    pub fn new(config: &TranscriptionConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .unwrap_or_default(),
            url: config.url.clone(),
            language: config.language.clone(),
        }
    }

    /// Unrecognized (empty) speech is an error, like any transport failure.
    pub async fn transcribe(&self, wav: Vec<u8>) -> Result<String> {
        let file = Part::bytes(wav).file_name("phrase.wav").mime_str("audio/wav")?;
        let form = Form::new()
            .part("file", file)
            .text("language", self.language.clone())
            .text("response_format", "json");

        let response = self.client.post(&self.url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Transcription Server Error: {}", response.status()));
        }

        let body: TranscriptionResponse = response.json().await?;
        let text = body.text.trim();
        if text.is_empty() {
            return Err(anyhow!("speech was not recognized"));
        }
        Ok(text.to_string())
    }
}
