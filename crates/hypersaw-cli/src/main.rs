//! Hypersaw CLI - render, play, and inspect the Super Saw voice.

mod commands;
mod performer;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hypersaw")]
#[command(author, version, about = "JP-8000 style Super Saw voice", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a patch to a WAV file
    Render(commands::render::RenderArgs),

    /// Play a patch on an output device
    Play(commands::play::PlayArgs),

    /// Print detune curve, gains, and slot frequencies
    Curve(commands::curve::CurveArgs),

    /// Validate and show a patch, or list factory patches
    Info(commands::info::InfoArgs),

    /// List audio output devices
    Devices,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Curve(args) => commands::curve::run(&args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Devices => commands::devices::run(),
    }
}
