//! Integration tests for hypersaw-config.
//!
//! Patch files on disk through to a sounding voice.

use hypersaw_config::{ConfigError, Modulation, Patch, Sequence, ValidationError, factory_patches};
use hypersaw_synth::OscillatorWaveform;
use tempfile::TempDir;

#[test]
fn test_save_load_roundtrip_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("lead.toml");

    let mut patch = Patch::new("Lead")
        .with_description("saved and reloaded")
        .with_modulation(Modulation::default())
        .with_sequence(Sequence::default());
    patch.voice.seed = Some(1234);
    patch.voice.waveform = OscillatorWaveform::Ramp;

    patch.save(&path).unwrap();
    assert!(path.exists(), "save should create parent directories");

    let loaded = Patch::load(&path).unwrap();
    assert_eq!(loaded, patch);

    // resolve() prefers a real file over the factory table.
    let resolved = Patch::resolve(path.to_str().unwrap()).unwrap();
    assert_eq!(resolved.name, "Lead");
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Patch::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_load_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "name = \n[voice").unwrap();
    assert!(matches!(
        Patch::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

#[test]
fn test_invalid_patch_file_reports_every_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wild.toml");
    std::fs::write(
        &path,
        r#"
name = "Wild"
[voice]
detune = 3.0
mix = -1.0
"#,
    )
    .unwrap();

    let patch = Patch::load(&path).unwrap();
    match patch.validate() {
        Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected two errors, got {other:?}"),
    }

    // The voice still plays: controls clamp.
    let mut voice = patch.build_voice();
    assert_eq!(voice.detune(), 1.0);
    assert_eq!(voice.mix(), 0.0);
    assert!(voice.process().is_finite());
}

#[test]
fn test_factory_patches_render() {
    for mut patch in factory_patches() {
        patch.voice.seed = Some(7);
        let mut voice = patch.build_voice();
        let mut block = [0.0f32; 1024];
        voice.process_block(&mut block);
        assert!(
            block.iter().all(|s| s.is_finite()),
            "patch '{}' produced non-finite output",
            patch.name
        );
        assert!(
            block.iter().any(|&s| s.abs() > 1e-3),
            "patch '{}' is silent",
            patch.name
        );
    }
}
