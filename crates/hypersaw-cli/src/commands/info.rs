//! Show a patch, or list the factory patches.

use clap::Args;
use hypersaw_config::{FACTORY_PATCH_NAMES, Patch, ValidationError, get_factory_patch};
use hypersaw_synth::freq_to_midi;

/// Display patch information.
#[derive(Args)]
pub struct InfoArgs {
    /// Patch file or factory patch name (omit to list factory patches)
    pub patch: Option<String>,

    /// Print the patch as TOML
    #[arg(long)]
    pub toml: bool,
}

/// Run the info command. Fails when the patch does not validate.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let Some(name) = args.patch else {
        println!("Factory patches:");
        for name in FACTORY_PATCH_NAMES {
            let description = get_factory_patch(name)
                .and_then(|p| p.description)
                .unwrap_or_default();
            println!("  {name:<10} {description}");
        }
        return Ok(());
    };

    let patch = Patch::resolve(&name)?;

    if args.toml {
        print!("{}", patch.to_toml()?);
    } else {
        print_summary(&patch);
    }

    match patch.validate() {
        Ok(()) => {
            println!("\nValid.");
            Ok(())
        }
        Err(ValidationError::Multiple(errors)) => {
            println!("\n{} problems:", errors.len());
            for err in &errors {
                println!("  - {err}");
            }
            anyhow::bail!("patch '{}' is invalid", patch.name)
        }
        Err(err) => {
            println!("\nProblem:\n  - {err}");
            anyhow::bail!("patch '{}' is invalid", patch.name)
        }
    }
}

fn print_summary(patch: &Patch) {
    let v = &patch.voice;
    println!("Name:        {}", patch.name);
    if let Some(description) = &patch.description {
        println!("Description: {description}");
    }
    println!("Sample Rate: {} Hz", patch.sample_rate);
    println!(
        "Voice:       detune {} mix {} ({:?} curve, {:?} summing, {:?})",
        v.detune, v.mix, v.detune_curve, v.summing, v.waveform
    );
    println!(
        "Filter:      drive {} resonance {}",
        v.filter_drive, v.filter_resonance
    );
    match v.seed {
        Some(seed) => println!("Seed:        {seed}"),
        None => println!("Seed:        (random)"),
    }
    match &patch.modulation {
        Some(m) => println!(
            "Modulation:  detune LFO {} Hz, mix LFO {} Hz",
            m.detune_lfo_hz, m.mix_lfo_hz
        ),
        None => println!("Modulation:  none"),
    }
    match &patch.sequence {
        Some(s) => println!(
            "Sequence:    {} steps from MIDI {} every {}s",
            s.scale.len(),
            s.root_note,
            s.step_seconds
        ),
        None => println!("Pitch:       {} Hz (MIDI {:.2})", v.freq, freq_to_midi(v.freq)),
    }
}
