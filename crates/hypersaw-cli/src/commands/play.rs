//! Real-time playback on an output device.
//!
//! The audio callback owns the voice and its LFOs. The main thread clocks
//! the note sequence and hands each new pitch over through [`SharedParams`],
//! which the callback applies once per buffer.

use super::load_patch;
use super::render::PEAK_REPORT_BLOCKS;
use crate::performer::Performer;
use clap::Args;
use hypersaw_io::{OutputStream, PeakMeter, StreamConfig};
use hypersaw_synth::SharedParams;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

const CONTROL_TICK: Duration = Duration::from_millis(10);

#[derive(Args)]
pub struct PlayArgs {
    /// Patch file or factory patch name
    #[arg(short, long, default_value = "classic")]
    patch: String,

    /// Output device (index, exact name, or partial name)
    #[arg(short, long)]
    device: Option<String>,

    /// Render block size in frames
    #[arg(long, default_value = "256")]
    buffer_size: u32,

    /// Stop after this many seconds (default: until Ctrl+C)
    #[arg(short = 't', long)]
    duration: Option<f64>,

    /// Seed for phase randomisation (overrides the patch)
    #[arg(long)]
    seed: Option<u64>,

    /// Play a 440 Hz sine at 0.3 instead of the voice
    #[arg(long)]
    test_tone: bool,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let patch = load_patch(&args.patch, args.seed)?;
    let limit = args
        .duration
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .ok()
                .filter(|d| !d.is_zero())
                .ok_or_else(|| anyhow::anyhow!("duration must be a positive number of seconds"))
        })
        .transpose()?;

    let mut stream = OutputStream::new(StreamConfig {
        sample_rate: patch.sample_rate,
        buffer_size: args.buffer_size,
        device: args.device.clone(),
    })?;
    let sample_rate = stream.sample_rate() as f32;

    let sequence = patch.sequence.clone().filter(|_| !args.test_tone);
    let first_freq = sequence
        .as_ref()
        .and_then(|s| s.freq_at(0))
        .unwrap_or(patch.voice.freq);
    let params = Arc::new(SharedParams::new(
        first_freq,
        patch.voice.detune,
        patch.voice.mix,
    ));
    let peak_bits = Arc::new(AtomicU32::new(0));

    let mut performer = if args.test_tone {
        Performer::test_tone(sample_rate)
    } else {
        Performer::new(&patch, sample_rate).without_sequencer()
    };
    let cb_params = Arc::clone(&params);
    let cb_peak = Arc::clone(&peak_bits);
    let mut meter = PeakMeter::new();

    stream.start(move |block| {
        if let Some(voice) = performer.voice_mut() {
            cb_params.apply_to(voice);
        }
        performer.render_block(block);
        meter.process_block(block);
        if meter.blocks() >= PEAK_REPORT_BLOCKS {
            cb_peak.store(meter.take().to_bits(), Ordering::Relaxed);
        }
    })?;

    let running = stream.running_handle();
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })?;

    println!(
        "Playing '{}' on {} ({} Hz, {} ch). Press Ctrl+C to stop.",
        if args.test_tone { "test tone" } else { patch.name.as_str() },
        stream.device_name(),
        stream.sample_rate(),
        stream.channels()
    );

    let start = Instant::now();
    let step_length = sequence
        .as_ref()
        .and_then(|s| Duration::try_from_secs_f32(s.step_seconds.max(0.001)).ok());
    let mut next_step = step_length.map(|len| start + len);
    let mut step = 0usize;

    while stream.is_running() {
        let now = Instant::now();
        if limit.is_some_and(|limit| now.duration_since(start) >= limit) {
            break;
        }

        if let (Some(sequence), Some(len), Some(due)) = (&sequence, step_length, next_step)
            && now >= due
        {
            step += 1;
            if let Some(freq) = sequence.freq_at(step) {
                params.set_freq(freq);
                tracing::debug!(step, freq, "note");
            }
            next_step = Some(due + len);
        }

        let peak = f32::from_bits(peak_bits.swap(0, Ordering::Relaxed));
        if peak > 0.0 {
            tracing::info!(peak, "{PEAK_REPORT_BLOCKS} buffers played");
        }

        std::thread::sleep(CONTROL_TICK);
    }

    stream.stop();
    println!("Stopped.");
    Ok(())
}
