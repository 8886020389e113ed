use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ringbuf::traits::{Consumer, Observer};
use tracing::{debug, info};
use webrtc_vad::{SampleRate, Vad, VadMode};

use super::CaptureError;
use crate::kernel::collaborators::ListenWindow;

pub const FRAME_MS: u32 = 30;

/// Extra wall-clock time allowed on top of timeout + phrase limit.
const DEADLINE_SLACK: Duration = Duration::from_millis(500);

/// Wall-clock bound on one listen attempt, whether or not samples arrive.
pub fn listen_deadline(window: &ListenWindow) -> Duration {
    window.timeout + window.phrase_limit + DEADLINE_SLACK
}

/// Frame counts derived from a listen window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// Consecutive voiced frames that count as speech starting.
    pub min_speech_frames: usize,
    pub silence_frames: usize,
    pub timeout_frames: usize,
    pub phrase_limit_frames: usize,
}

impl SegmenterConfig {
    pub fn from_window(window: &ListenWindow) -> Self {
        let frames = |d: Duration| ((d.as_millis() as usize) / FRAME_MS as usize).max(1);
        Self {
            min_speech_frames: 3, // 90ms
            silence_frames: frames(window.pause),
            timeout_frames: frames(window.timeout),
            phrase_limit_frames: frames(window.phrase_limit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStep {
    Waiting,
    Recording,
    Complete,
    TimedOut,
}

/// Debounced speech start/end detection over VAD-labelled frames.
#[derive(Debug)]
pub struct PhraseSegmenter {
    config: SegmenterConfig,
    recording: bool,
    waited_frames: usize,
    recorded_frames: usize,
    consecutive_speech: usize,
    consecutive_silence: usize,
    pre_roll: VecDeque<Vec<i16>>,
    samples: Vec<i16>,
}

impl PhraseSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            recording: false,
            waited_frames: 0,
            recorded_frames: 0,
            consecutive_speech: 0,
            consecutive_silence: 0,
            pre_roll: VecDeque::with_capacity(config.min_speech_frames),
            samples: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: &[i16], is_speech: bool) -> SegmentStep {
        if is_speech {
            self.consecutive_silence = 0;
            self.consecutive_speech += 1;
        } else {
            self.consecutive_speech = 0;
            self.consecutive_silence += 1;
        }

        if !self.recording {
            self.waited_frames += 1;
            if self.pre_roll.len() == self.config.min_speech_frames {
                self.pre_roll.pop_front();
            }
            self.pre_roll.push_back(frame.to_vec());

            if self.consecutive_speech >= self.config.min_speech_frames {
                info!("Audio Control: Speech START detected");
                self.recording = true;
                for buffered in self.pre_roll.drain(..) {
                    self.samples.extend_from_slice(&buffered);
                    self.recorded_frames += 1;
                }
                return SegmentStep::Recording;
            }
            if self.waited_frames >= self.config.timeout_frames {
                return SegmentStep::TimedOut;
            }
            return SegmentStep::Waiting;
        }

        self.samples.extend_from_slice(frame);
        self.recorded_frames += 1;

        if self.consecutive_silence >= self.config.silence_frames {
            info!("Audio Control: Speech END detected");
            return SegmentStep::Complete;
        }
        if self.recorded_frames >= self.config.phrase_limit_frames {
            debug!("Phrase limit reached");
            return SegmentStep::Complete;
        }
        SegmentStep::Recording
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

fn vad_rate(sample_rate: u32) -> Result<SampleRate, CaptureError> {
    match sample_rate {
        8000 => Ok(SampleRate::Rate8kHz),
        16000 => Ok(SampleRate::Rate16kHz),
        32000 => Ok(SampleRate::Rate32kHz),
        48000 => Ok(SampleRate::Rate48kHz),
        other => Err(CaptureError::UnsupportedRate(other)),
    }
}

/// Pulls 30ms frames from the ring until one phrase is segmented.
///
/// Bounded by [`listen_deadline`] even when the device stops delivering
/// samples. A raised `stream_failed` flag ends the attempt early.
pub async fn record_phrase<C>(
    consumer: &mut C,
    sample_rate: u32,
    window: &ListenWindow,
    stream_failed: &AtomicBool,
) -> Result<Vec<i16>, CaptureError>
where
    C: Consumer<Item = f32> + Observer,
{
    let mut vad = Vad::new_with_rate(vad_rate(sample_rate)?);
    vad.set_mode(VadMode::Aggressive);

    let frames = segment_frames(consumer, &mut vad, sample_rate, window, stream_failed);
    match tokio::time::timeout(listen_deadline(window), frames).await {
        Ok(result) => result,
        Err(_) => {
            debug!("Listen deadline elapsed while waiting for samples");
            Err(CaptureError::ListenTimeout)
        }
    }
}

async fn segment_frames<C>(
    consumer: &mut C,
    vad: &mut Vad,
    sample_rate: u32,
    window: &ListenWindow,
    stream_failed: &AtomicBool,
) -> Result<Vec<i16>, CaptureError>
where
    C: Consumer<Item = f32> + Observer,
{
    let frame_size = (sample_rate as usize * FRAME_MS as usize) / 1000;
    let mut frame_f32 = vec![0.0f32; frame_size];
    let mut frame_i16 = vec![0i16; frame_size];
    let mut segmenter = PhraseSegmenter::new(SegmenterConfig::from_window(window));

    loop {
        if stream_failed.load(Ordering::Acquire) {
            return Err(CaptureError::StreamLost);
        }
        if consumer.occupied_len() < frame_size {
            tokio::time::sleep(Duration::from_millis(10)).await;
            continue;
        }

        let _ = consumer.pop_slice(&mut frame_f32);
        for (dst, &sample) in frame_i16.iter_mut().zip(frame_f32.iter()) {
            *dst = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        }

        let is_speech = match vad.is_voice_segment(&frame_i16) {
            Ok(voiced) => voiced,
            Err(e) => {
                debug!("VAD Error: {:?}", e);
                false
            }
        };

        match segmenter.push(&frame_i16, is_speech) {
            SegmentStep::Waiting | SegmentStep::Recording => {}
            SegmentStep::Complete => return Ok(segmenter.into_samples()),
            SegmentStep::TimedOut => return Err(CaptureError::ListenTimeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbuf::traits::Split;
    use ringbuf::HeapRb;
    use std::time::Instant;

    fn short_window() -> ListenWindow {
        ListenWindow {
            timeout: Duration::from_millis(100),
            phrase_limit: Duration::from_millis(100),
            pause: Duration::from_millis(50),
        }
    }

    fn config() -> SegmenterConfig {
        SegmenterConfig {
            min_speech_frames: 3,
            silence_frames: 2,
            timeout_frames: 5,
            phrase_limit_frames: 10,
        }
    }

    #[test]
    fn window_converts_to_frames() {
        let cfg = SegmenterConfig::from_window(&ListenWindow::default());
        assert_eq!(cfg.timeout_frames, 166);
        assert_eq!(cfg.phrase_limit_frames, 166);
        assert_eq!(cfg.silence_frames, 33);
    }

    #[test]
    fn silence_times_out_before_speech() {
        let mut seg = PhraseSegmenter::new(config());
        let frame = [0i16; 4];
        for _ in 0..4 {
            assert_eq!(seg.push(&frame, false), SegmentStep::Waiting);
        }
        assert_eq!(seg.push(&frame, false), SegmentStep::TimedOut);
    }

    #[test]
    fn phrase_ends_after_trailing_silence() {
        let mut seg = PhraseSegmenter::new(config());
        let frame = [1i16; 4];
        assert_eq!(seg.push(&frame, true), SegmentStep::Waiting);
        assert_eq!(seg.push(&frame, true), SegmentStep::Waiting);
        assert_eq!(seg.push(&frame, true), SegmentStep::Recording);
        assert_eq!(seg.push(&frame, true), SegmentStep::Recording);
        assert_eq!(seg.push(&frame, false), SegmentStep::Recording);
        assert_eq!(seg.push(&frame, false), SegmentStep::Complete);
        // 3 pre-roll frames + 3 recorded
        assert_eq!(seg.into_samples().len(), 6 * 4);
    }

    #[test]
    fn phrase_limit_cuts_long_speech() {
        let mut seg = PhraseSegmenter::new(config());
        let frame = [1i16; 2];
        let mut steps = Vec::new();
        for _ in 0..20 {
            let step = seg.push(&frame, true);
            steps.push(step);
            if step == SegmentStep::Complete {
                break;
            }
        }
        assert_eq!(steps.last(), Some(&SegmentStep::Complete));
        assert_eq!(steps.len(), 10);
    }

    #[tokio::test]
    async fn silent_device_still_times_out() {
        let (_producer, mut consumer) = HeapRb::<f32>::new(1024).split();
        let window = short_window();
        let started = Instant::now();

        let result = record_phrase(&mut consumer, 16000, &window, &AtomicBool::new(false)).await;

        assert!(matches!(result, Err(CaptureError::ListenTimeout)), "got {:?}", result.map(|s| s.len()));
        assert!(started.elapsed() < listen_deadline(&window) + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn stream_failure_ends_the_attempt() {
        let (_producer, mut consumer) = HeapRb::<f32>::new(1024).split();
        let failed = AtomicBool::new(true);

        let result = record_phrase(&mut consumer, 16000, &ListenWindow::default(), &failed).await;

        assert!(matches!(result, Err(CaptureError::StreamLost)));
    }

    #[test]
    fn deadline_covers_timeout_and_phrase_limit() {
        let window = short_window();
        assert!(listen_deadline(&window) > window.timeout + window.phrase_limit);
    }
}
