//! Audio I/O layer for hypersaw.
//!
//! This crate provides the host side of the voice:
//!
//! - **PCM conversion**: [`sample_to_i16`], channel duplication, [`PeakMeter`]
//! - **WAV output**: [`write_wav`] for whole buffers, [`WavStreamWriter`] for
//!   block-by-block rendering, [`read_wav`] / [`read_wav_info`] for checking results
//! - **Real-time output**: [`OutputStream`] on a cpal device
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hypersaw_io::{WavSpec, WavStreamWriter};
//! use hypersaw_synth::Hypersaw;
//!
//! let mut voice = Hypersaw::with_seed(48000.0, 1);
//! let mut writer = WavStreamWriter::create("out.wav", WavSpec::pcm16_stereo(48000))?;
//! let mut block = [0.0f32; 256];
//! for _ in 0..188 {
//!     voice.process_block(&mut block);
//!     writer.write_mono_block(&block)?;
//! }
//! writer.finalize()?;
//! ```

mod pcm;
mod stream;
mod wav;

pub use pcm::{PeakMeter, duplicate_to_channels, mono_to_interleaved_i16, sample_to_i16};
pub use stream::{AudioDevice, OutputStream, StreamConfig, default_output_device, list_output_devices};
pub use wav::{WavInfo, WavSpec, WavStreamWriter, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The device's sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
