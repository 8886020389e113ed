//! Microphone input: capture, phrase segmentation and hand-off to transcription.

pub mod capture;
pub mod processing;

use std::io::Cursor;

use ringbuf::traits::Split;
use ringbuf::HeapRb;
use thiserror::Error;
use tracing::debug;

use crate::kernel::collaborators::{ListenWindow, SpeechListener};
use crate::services::transcription::TranscriptionService;
use capture::AudioCapture;

/// Half a second of headroom at 48kHz.
const RING_CAPACITY: usize = 24_000;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device available")]
    NoDevice,
    #[error("input device error: {0}")]
    Device(String),
    #[error("unsupported sample rate {0}Hz; VAD needs 8k, 16k, 32k or 48k")]
    UnsupportedRate(u32),
    #[error("unsupported sample format {0}")]
    UnsupportedFormat(String),
    #[error("no speech before the listen timeout")]
    ListenTimeout,
    #[error("input stream stopped while listening")]
    StreamLost,
    #[error("failed to encode phrase: {0}")]
    Encode(#[from] hound::Error),
}

/// Encodes 16-bit mono PCM as an in-memory WAV file.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, CaptureError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Opens the default microphone for each listen attempt and transcribes
/// one phrase.
pub struct MicrophoneListener {
    transcriber: TranscriptionService,
}

impl MicrophoneListener {
    pub fn new(transcriber: TranscriptionService) -> Self {
        Self { transcriber }
    }
}

impl SpeechListener for MicrophoneListener {
    async fn listen(&mut self, window: &ListenWindow) -> anyhow::Result<String> {
        let (producer, mut consumer) = HeapRb::<f32>::new(RING_CAPACITY).split();
        let capture = AudioCapture::new(producer)?;
        let sample_rate = capture.sample_rate;

        let samples =
            processing::record_phrase(&mut consumer, sample_rate, window, capture.failure_flag()).await?;
        drop(capture);
        debug!(samples = samples.len(), sample_rate, "Phrase captured");

        let wav = encode_wav(&samples, sample_rate)?;
        self.transcriber.transcribe(wav).await
    }
}
