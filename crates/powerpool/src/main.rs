//! powerpool CLI - power-sum convolution, multi-scale pooling and difference
//! maps for images.
//!
//! Writes three PNGs next to the input (or into `--output-dir`):
//! `{stem}_conv.png`, `{stem}_avg.png` and `{stem}_diff_{size}.png`.
//!
//! # Usage
//!
//! ```bash
//! # Convolve with a 5x5 window, pool the default sizes, diff the two
//! powerpool photo.jpg 5
//!
//! # Square-root power, colormapped difference, JSON summary on stdout
//! powerpool photo.jpg 7 --power 0.5 --diff-colormap --summary
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};

mod cli;
mod logging;

/// powerpool - power-sum convolution, multi-scale pooling and difference maps.
#[derive(Parser, Debug)]
#[command(name = "powerpool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "POWERPOOL_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    run: cli::run::RunArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            powerpool_core::Config::load_from(Path::new(&expanded))?
        }
        None => match powerpool_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check {}",
                    powerpool_core::Config::default_path().display()
                );
                powerpool_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("powerpool v{}", powerpool_core::VERSION);

    cli::run::execute(cli.run, config)
}
