//! Factory patches bundled with the library.
//!
//! These are embedded as TOML so they double as format examples, and are
//! always available without external files.

use crate::Patch;

/// Names accepted by [`get_factory_patch`], in display order.
pub static FACTORY_PATCH_NAMES: &[&str] = &["init", "classic", "reduced"];

static FACTORY_PATCHES_TOML: &[(&str, &str)] = &[
    ("init", INIT_PATCH),
    ("classic", CLASSIC_PATCH),
    ("reduced", REDUCED_PATCH),
];

/// A static voice at the power-on defaults.
const INIT_PATCH: &str = r#"
name = "Init"
description = "Power-on defaults, 100 Hz, no modulation"
sample_rate = 48000

[voice]
freq = 100.0
detune = 0.5
mix = 0.5
"#;

/// The classic demo: slow detune/mix sweeps under a looping two-octave run.
const CLASSIC_PATCH: &str = r#"
name = "Classic"
description = "Detune and mix swept by slow LFOs over a two-octave run from C3"
sample_rate = 48000

[voice]
detune_curve = "polynomial"
summing = "weighted"
filter_drive = 0.0
filter_resonance = 0.1
waveform = "saw"

[modulation]
detune_lfo_hz = 0.1
mix_lfo_hz = 0.07

[sequence]
root_note = 48
step_seconds = 1.0
scale = [0, 3, 5, 7, 9, 10, 12, 15, 17, 19, 21, 22, 24, 27, 29, 31, 32, 34, 36, 39, 41, 43, 46, 48]
"#;

/// The cheaper voicing with the same sequence and sweeps.
const REDUCED_PATCH: &str = r#"
name = "Reduced"
description = "Quartic detune, flat summing, driven filter"
sample_rate = 48000

[voice]
detune_curve = "quartic"
summing = "unweighted"
filter_drive = 0.8
filter_resonance = 0.1
waveform = "saw"

[modulation]
detune_lfo_hz = 0.1
mix_lfo_hz = 0.07

[sequence]
root_note = 48
step_seconds = 1.0
scale = [0, 3, 5, 7, 9, 10, 12, 15, 17, 19, 21, 22, 24, 27, 29, 31, 32, 34, 36, 39, 41, 43, 46, 48]
"#;

/// All factory patches, in [`FACTORY_PATCH_NAMES`] order.
pub fn factory_patches() -> Vec<Patch> {
    FACTORY_PATCHES_TOML
        .iter()
        .filter_map(|(name, toml)| match Patch::from_toml(toml) {
            Ok(patch) => Some(patch),
            Err(err) => {
                tracing::error!(name, %err, "factory patch failed to parse");
                None
            }
        })
        .collect()
}

/// Look up a factory patch by name (case-insensitive).
pub fn get_factory_patch(name: &str) -> Option<Patch> {
    let name = name.to_lowercase();
    FACTORY_PATCHES_TOML
        .iter()
        .find(|(n, _)| *n == name)
        .and_then(|(_, toml)| Patch::from_toml(toml).ok())
}

/// Whether `name` is a factory patch.
pub fn is_factory_patch(name: &str) -> bool {
    let name = name.to_lowercase();
    FACTORY_PATCH_NAMES.contains(&name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::DEMO_SCALE;
    use hypersaw_synth::{DetuneCurve, HypersawConfig, SummingMode};

    #[test]
    fn test_every_factory_patch_parses_and_validates() {
        let patches = factory_patches();
        assert_eq!(patches.len(), FACTORY_PATCH_NAMES.len());
        for patch in &patches {
            patch
                .validate()
                .unwrap_or_else(|e| panic!("{}: {e}", patch.name));
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(get_factory_patch("CLASSIC").is_some());
        assert!(is_factory_patch("Reduced"));
        assert!(!is_factory_patch("nope"));
        assert!(get_factory_patch("nope").is_none());
    }

    #[test]
    fn test_classic_matches_demo() {
        let patch = get_factory_patch("classic").unwrap();
        assert_eq!(patch.voice.to_config(), HypersawConfig::default());
        let sequence = patch.sequence.unwrap();
        assert_eq!(sequence.scale, DEMO_SCALE.to_vec());
        assert_eq!(sequence.root_note, 48);
    }

    #[test]
    fn test_reduced_matches_reduced_config() {
        let patch = get_factory_patch("reduced").unwrap();
        let config = patch.voice.to_config();
        assert_eq!(config, HypersawConfig::reduced());
        assert_eq!(config.detune_curve, DetuneCurve::Quartic);
        assert_eq!(config.summing, SummingMode::Unweighted);
    }
}
