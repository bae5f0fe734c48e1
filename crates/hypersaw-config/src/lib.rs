//! Patch files for the hypersaw voice.
//!
//! A [`Patch`] is a TOML file holding the voice's static controls, its
//! voicing choices, and optionally the slow LFO sweeps and note sequence the
//! classic demo plays.
//!
//! # Features
//!
//! - **Patches**: load and save TOML, build a ready-to-play voice
//! - **Validation**: every out-of-range value reported at once
//! - **Factory patches**: `init`, `classic`, `reduced`
//!
//! # Example
//!
//! ```rust,no_run
//! use hypersaw_config::Patch;
//!
//! let patch = Patch::resolve("classic").unwrap();
//! patch.validate().unwrap();
//! let mut voice = patch.build_voice();
//! let mut block = [0.0f32; 256];
//! voice.process_block(&mut block);
//! ```

mod error;
mod patch;

/// Patch validation.
pub mod validation;

/// Factory patches bundled with the library.
pub mod factory;

pub use error::ConfigError;
pub use factory::{FACTORY_PATCH_NAMES, factory_patches, get_factory_patch, is_factory_patch};
pub use patch::{DEMO_SCALE, Modulation, Patch, Sequence, VoiceSettings};
pub use validation::{MIN_SAMPLE_RATE, ValidationError, ValidationResult, validate_patch};
