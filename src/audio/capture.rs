use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::Producer;
use tracing::{error, info};

use super::CaptureError;

/// Sample rates webrtc-vad accepts, most efficient first.
const TARGET_RATES: [u32; 4] = [16000, 32000, 48000, 8000];

/// Live input stream feeding mono f32 samples into a ring buffer.
/// Capture stops when this is dropped.
pub struct AudioCapture {
    _stream: cpal::Stream,
    pub sample_rate: u32,
    failed: Arc<AtomicBool>,
}

impl AudioCapture {
    pub fn new<P>(mut producer: P) -> Result<Self, CaptureError>
    where
        P: Producer<Item = f32> + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        info!("Audio Input Device: {}", device.name().unwrap_or_default());

        let mut selected = None;
        for &rate in &TARGET_RATES {
            let configs = device
                .supported_input_configs()
                .map_err(|e| CaptureError::Device(e.to_string()))?;
            for range in configs {
                if range.min_sample_rate().0 <= rate && range.max_sample_rate().0 >= rate {
                    selected = Some(range.with_sample_rate(cpal::SampleRate(rate)));
                    break;
                }
            }
            if selected.is_some() {
                break;
            }
        }

        let config = match selected {
            Some(config) => config,
            None => {
                let fallback = device
                    .default_input_config()
                    .map_err(|e| CaptureError::Device(e.to_string()))?;
                let rate = fallback.sample_rate().0;
                if !TARGET_RATES.contains(&rate) {
                    return Err(CaptureError::UnsupportedRate(rate));
                }
                fallback
            }
        };

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        info!("Audio Config Selected: Rate={}Hz, Channels={}", sample_rate, channels);

        let failed = Arc::new(AtomicBool::new(false));
        let stream_failed = Arc::clone(&failed);
        let err_fn = move |err: cpal::StreamError| {
            error!("an error occurred on stream: {}", err);
            stream_failed.store(true, Ordering::Release);
        };

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config.into(),
                move |data: &[f32], _: &_| write_input_data(data, channels, &mut producer),
                err_fn,
                None,
            ),
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config.into(),
                move |data: &[i16], _: &_| write_input_data_i16(data, channels, &mut producer),
                err_fn,
                None,
            ),
            other => return Err(CaptureError::UnsupportedFormat(format!("{:?}", other))),
        }
        .map_err(|e| CaptureError::Device(e.to_string()))?;

        stream.play().map_err(|e| CaptureError::Device(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            sample_rate,
            failed,
        })
    }

    /// Raised by the stream error callback, e.g. when the device is unplugged.
    pub fn failure_flag(&self) -> &AtomicBool {
        &self.failed
    }
}

fn write_input_data<P>(input: &[f32], channels: usize, producer: &mut P)
where
    P: Producer<Item = f32>,
{
    // Lossy when the ring is full.
    if channels <= 1 {
        producer.push_slice(input);
        return;
    }
    for frame in input.chunks(channels) {
        let mixed = frame.iter().sum::<f32>() / frame.len() as f32;
        let _ = producer.try_push(mixed);
    }
}

fn write_input_data_i16<P>(input: &[i16], channels: usize, producer: &mut P)
where
    P: Producer<Item = f32>,
{
    for frame in input.chunks(channels.max(1)) {
        let mixed = frame.iter().map(|&s| s as f32 / i16::MAX as f32).sum::<f32>() / frame.len() as f32;
        let _ = producer.try_push(mixed);
    }
}
