//! CLI command implementations.

pub mod curve;
pub mod devices;
pub mod info;
pub mod play;
pub mod render;

use hypersaw_config::Patch;

/// Resolve a patch by file path or factory name and apply a seed override.
///
/// Validation problems are logged as warnings: the voice clamps every
/// control, so an out-of-range patch still plays.
pub fn load_patch(name_or_path: &str, seed: Option<u64>) -> anyhow::Result<Patch> {
    let mut patch = Patch::resolve(name_or_path)?;
    if let Err(err) = patch.validate() {
        tracing::warn!(patch = %patch.name, %err, "patch has out-of-range values");
    }
    if seed.is_some() {
        patch.voice.seed = seed;
    }
    Ok(patch)
}
