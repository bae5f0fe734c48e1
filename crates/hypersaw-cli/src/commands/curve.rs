//! Coefficient engine tables.

use clap::{Args, ValueEnum};
use hypersaw_synth::{CENTER_SLOT, Coefficients, DetuneCurve, NORMALIZATION, NUM_OSCILLATORS};

/// Detune curve choice for the CLI.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliCurve {
    #[default]
    Polynomial,
    Quartic,
}

impl From<CliCurve> for DetuneCurve {
    fn from(c: CliCurve) -> Self {
        match c {
            CliCurve::Polynomial => DetuneCurve::Polynomial,
            CliCurve::Quartic => DetuneCurve::Quartic,
        }
    }
}

#[derive(Args)]
pub struct CurveArgs {
    /// Fundamental in Hz
    #[arg(short, long, default_value = "220.0")]
    freq: f32,

    /// Grid points from 0 to 1 (inclusive)
    #[arg(short, long, default_value = "11")]
    steps: usize,

    /// Detune curve
    #[arg(short, long, value_enum, default_value_t = CliCurve::Polynomial)]
    curve: CliCurve,

    /// Mix used for the detune table
    #[arg(long, default_value = "0.5")]
    mix: f32,

    /// Print every slot frequency instead of the outer pair
    #[arg(long)]
    all_slots: bool,
}

pub fn run(args: &CurveArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.steps >= 2, "need at least 2 grid points");
    let curve = DetuneCurve::from(args.curve);

    println!("Detune ({curve:?} curve, {} Hz, mix {})", args.freq, args.mix);
    if args.all_slots {
        let header: Vec<String> = (0..NUM_OSCILLATORS).map(|i| format!("{:>9}", format!("osc{i}"))).collect();
        println!("  detune   applied {}", header.join(" "));
    } else {
        println!("  detune   applied   lowest Hz  highest Hz");
    }
    for (x, c) in grid(args.steps).zip(detune_rows(args.freq, args.mix, curve, args.steps)) {
        if args.all_slots {
            let freqs: Vec<String> = c.frequencies.iter().map(|f| format!("{f:>9.3}")).collect();
            println!("  {x:>6.3}  {:>8.5} {}", c.scaled_detune, freqs.join(" "));
        } else {
            println!(
                "  {x:>6.3}  {:>8.5}  {:>10.3}  {:>10.3}",
                c.scaled_detune,
                c.frequencies[0],
                c.frequencies[NUM_OSCILLATORS - 1]
            );
        }
    }

    if args.all_slots {
        println!();
        println!("Slot ratios ({curve:?} curve)");
        for (x, row) in grid(args.steps).zip(ratio_rows(curve, args.steps)) {
            let ratios: Vec<String> = row.iter().map(|r| format!("{r:>9.5}")).collect();
            println!("  {x:>6.3}           {}", ratios.join(" "));
        }
    }

    println!();
    println!("Mix gains (center is slot {CENTER_SLOT})");
    println!("     mix    center      side   sum/{NORMALIZATION}");
    for x in grid(args.steps) {
        let c = Coefficients::compute(args.freq, 0.5, x, curve);
        println!(
            "  {x:>6.3}  {:>8.5}  {:>8.5}  {:>8.5}",
            c.center_gain,
            c.side_gain,
            headroom(&c)
        );
    }
    Ok(())
}

fn grid(steps: usize) -> impl Iterator<Item = f32> {
    let last = (steps - 1).max(1) as f32;
    (0..steps).map(move |i| i as f32 / last)
}

fn detune_rows(freq: f32, mix: f32, curve: DetuneCurve, steps: usize) -> Vec<Coefficients> {
    grid(steps)
        .map(|x| Coefficients::compute(freq, x, mix, curve))
        .collect()
}

/// Per-slot frequency multipliers over the detune grid.
fn ratio_rows(curve: DetuneCurve, steps: usize) -> Vec<[f32; NUM_OSCILLATORS]> {
    grid(steps)
        .map(|x| Coefficients::compute(1.0, x, 0.0, curve).ratios())
        .collect()
}

/// Worst-case normalised bank level: every oscillator at full scale.
fn headroom(c: &Coefficients) -> f32 {
    (6.0 * c.side_gain + c.center_gain) / NORMALIZATION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_spans_unit_interval() {
        let points: Vec<f32> = grid(5).collect();
        assert_eq!(points, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_detune_rows_widen() {
        let rows = detune_rows(220.0, 0.5, DetuneCurve::Quartic, 11);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].frequencies[0], 220.0);
        for pair in rows.windows(2) {
            assert!(pair[1].frequencies[0] <= pair[0].frequencies[0]);
            assert!(pair[1].frequencies[6] >= pair[0].frequencies[6]);
        }
    }

    #[test]
    fn test_headroom_below_unity() {
        for x in grid(101) {
            let c = Coefficients::compute(220.0, 0.5, x, DetuneCurve::Polynomial);
            assert!(headroom(&c) < 1.0);
        }
    }

    #[test]
    fn test_ratio_rows_scale_frequencies() {
        let ratios = ratio_rows(DetuneCurve::Polynomial, 5);
        let rows = detune_rows(220.0, 0.5, DetuneCurve::Polynomial, 5);
        for (r, c) in ratios.iter().zip(&rows) {
            assert_eq!(r[CENTER_SLOT], 1.0);
            assert!(r[0] < 1.0 && r[NUM_OSCILLATORS - 1] > 1.0);
            for (ratio, freq) in r.iter().zip(&c.frequencies) {
                assert!((220.0 * ratio - freq).abs() < 1e-3);
            }
        }
    }
}
