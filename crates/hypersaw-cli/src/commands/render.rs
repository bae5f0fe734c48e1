//! Offline rendering to WAV.

use super::load_patch;
use crate::performer::Performer;
use clap::Args;
use hypersaw_config::MIN_SAMPLE_RATE;
use hypersaw_io::{PeakMeter, WavSpec, WavStreamWriter};
use std::path::PathBuf;

/// Frames rendered per block.
pub const BLOCK_SIZE: usize = 256;
/// Blocks between peak-level log lines.
pub const PEAK_REPORT_BLOCKS: u32 = 1000;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Patch file or factory patch name
    #[arg(short, long, default_value = "classic")]
    patch: String,

    /// Duration in seconds
    #[arg(short, long, default_value = "10.0")]
    duration: f64,

    /// Sample rate (defaults to the patch's)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Seed for phase randomisation (overrides the patch)
    #[arg(long)]
    seed: Option<u64>,

    /// Render a 440 Hz sine at 0.3 instead of the voice
    #[arg(long)]
    test_tone: bool,

    /// Write 32-bit float mono instead of 16-bit stereo
    #[arg(long)]
    float: bool,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let patch = load_patch(&args.patch, args.seed)?;
    let sample_rate = args.sample_rate.unwrap_or(patch.sample_rate);
    check_sample_rate(sample_rate)?;
    anyhow::ensure!(
        args.duration.is_finite() && args.duration > 0.0,
        "duration must be a positive number of seconds"
    );

    let mut performer = if args.test_tone {
        Performer::test_tone(sample_rate as f32)
    } else {
        Performer::new(&patch, sample_rate as f32)
    };
    let spec = if args.float {
        WavSpec::float_mono(sample_rate)
    } else {
        WavSpec::pcm16_stereo(sample_rate)
    };
    let frames = (args.duration * f64::from(sample_rate)).round() as usize;

    println!(
        "Rendering '{}' to {} ({:.1}s, {} Hz, {})",
        if args.test_tone { "test tone" } else { patch.name.as_str() },
        args.output.display(),
        args.duration,
        sample_rate,
        if args.float { "32-bit float mono" } else { "16-bit stereo" }
    );

    let mut writer = WavStreamWriter::create(&args.output, spec)?;
    let peak = render(&mut performer, &mut writer, frames)?;
    writer.finalize()?;

    println!("Done. {frames} frames, peak {peak:.3}");
    if peak > 1.0 {
        tracing::warn!(peak, "output clipped");
    }
    Ok(())
}

fn check_sample_rate(sample_rate: u32) -> anyhow::Result<()> {
    anyhow::ensure!(
        sample_rate >= MIN_SAMPLE_RATE,
        "sample rate {sample_rate} Hz is below the {MIN_SAMPLE_RATE} Hz minimum"
    );
    Ok(())
}

/// Render `frames` samples block by block, logging the peak every
/// [`PEAK_REPORT_BLOCKS`] blocks. Returns the overall peak.
fn render(
    performer: &mut Performer,
    writer: &mut WavStreamWriter,
    frames: usize,
) -> anyhow::Result<f32> {
    let mut block = [0.0f32; BLOCK_SIZE];
    let mut meter = PeakMeter::new();
    let mut overall = 0.0f32;
    let mut remaining = frames;

    while remaining > 0 {
        let chunk = &mut block[..remaining.min(BLOCK_SIZE)];
        performer.render_block(chunk);
        writer.write_mono_block(chunk)?;
        meter.process_block(chunk);

        if meter.blocks() >= PEAK_REPORT_BLOCKS {
            let peak = meter.take();
            overall = overall.max(peak);
            tracing::info!(peak, "{PEAK_REPORT_BLOCKS} buffers rendered");
        }
        remaining -= chunk.len();
    }

    Ok(overall.max(meter.peak()))
}
