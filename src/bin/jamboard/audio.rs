//! cpal output stream driving the synth engine

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use jamboard::{synth::RtEngine, NUM_CHANNELS, SAMPLE_RATE};
use rtrb::{Consumer, RingBuffer};

/// Scope samples buffered between the audio thread and the UI.
const SCOPE_RING_LEN: usize = 16 * 1024;
const ERROR_RING_LEN: usize = 16;

/// A running output stream plus the rings the UI reads from it.
pub struct AudioOutput {
    /// Dropping this stops playback.
    pub stream: cpal::Stream,
    pub device_name: String,
    pub sample_rate: u32,
    pub channels: usize,
    /// First channel of every rendered frame.
    pub scope: Consumer<f32>,
    /// Stream errors reported by the backend.
    pub errors: Consumer<String>,
}

/// Open the default output device and start rendering `engine` into it.
///
/// Asks for 44.1 kHz stereo f32 and falls back to the device's default
/// config when that is not offered.
pub fn start(mut engine: RtEngine) -> EyreResult<AudioOutput> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let device_name = device.name().unwrap_or_else(|_| "unknown device".into());
    let supported = pick_config(&device)?;

    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;

    let (mut scope_tx, scope) = RingBuffer::<f32>::new(SCOPE_RING_LEN);
    let (mut error_tx, errors) = RingBuffer::<String>::new(ERROR_RING_LEN);

    let stream = device
        .build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                engine.render(data, channels);

                // Feed the scope, dropping samples if the UI falls behind
                for frame in data.chunks_exact(channels) {
                    if scope_tx.push(frame[0]).is_err() {
                        break;
                    }
                }
            },
            move |err| {
                eprintln!("Stream error: {err}");
                let _ = error_tx.push(err.to_string());
            },
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    Ok(AudioOutput {
        stream,
        device_name,
        sample_rate,
        channels,
        scope,
        errors,
    })
}

fn pick_config(device: &cpal::Device) -> EyreResult<cpal::SupportedStreamConfig> {
    let wanted = cpal::SampleRate(SAMPLE_RATE);
    let preferred = device
        .supported_output_configs()
        .wrap_err("failed to query output configs")?
        .find(|range| {
            range.channels() as usize == NUM_CHANNELS
                && range.sample_format() == cpal::SampleFormat::F32
                && range.min_sample_rate() <= wanted
                && wanted <= range.max_sample_rate()
        });

    match preferred {
        Some(range) => Ok(range.with_sample_rate(wanted)),
        None => device
            .default_output_config()
            .wrap_err("failed to fetch default output config"),
    }
}
