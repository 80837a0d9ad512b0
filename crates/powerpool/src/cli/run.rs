//! The default command: filter one image and write the three outputs.

use anyhow::Context;
use clap::Args;
use powerpool_core::{
    scale_color, Config, ImageDecoder, OutputPaths, Pipeline, RenderMode, Renderer, RunSummary,
};
use std::path::PathBuf;

use super::progress::{advance, create_progress_bar};

/// Arguments for a filter run.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the input image
    pub image_path: PathBuf,

    /// Window size of the single convolution pass
    #[arg(value_parser = parse_window_size)]
    pub size: usize,

    /// Brightness factor applied to the saved convolution image
    #[arg(long, default_value = "1.0")]
    pub multiply: f64,

    /// Exponent applied to each window element (overrides filter.power)
    #[arg(long)]
    pub power: Option<f64>,

    /// Comma-separated window sizes to pool (overrides filter.pool_sizes)
    #[arg(long, value_delimiter = ',', value_parser = parse_window_size)]
    pub pool_sizes: Option<Vec<usize>>,

    /// Directory for the output PNGs (defaults to the input's directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Render the difference map through the pink colormap
    #[arg(long)]
    pub diff_colormap: bool,

    /// Compute on the calling thread only
    #[arg(long)]
    pub sequential: bool,

    /// Print a JSON run summary to stdout
    #[arg(long)]
    pub summary: bool,
}

fn parse_window_size(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("window size must be >= 1".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(format!("invalid window size {s:?}: {e}")),
    }
}

/// Fold CLI overrides into the loaded config and re-validate.
fn apply_overrides(mut config: Config, args: &RunArgs) -> anyhow::Result<Config> {
    if let Some(power) = args.power {
        config.filter.power = power;
    }
    if let Some(sizes) = &args.pool_sizes {
        config.filter.pool_sizes = sizes.clone();
    }
    if args.sequential {
        config.filter.parallel = false;
    }
    if args.diff_colormap {
        config.output.diff_colormap = true;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Execute a filter run.
pub fn execute(args: RunArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args)?;

    if !args.image_path.is_file() {
        anyhow::bail!(
            "Input image does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.image_path
        );
    }

    let decoded = ImageDecoder::new(config.limits.clone()).decode(&args.image_path)?;
    tracing::info!(
        "Applying convolution to {:?} ({}x{}, size {}, power {})",
        args.image_path,
        decoded.width,
        decoded.height,
        args.size,
        config.filter.power
    );

    let pipeline = Pipeline::new(config.filter.clone());
    let pb = create_progress_bar(pipeline.total_stages() as u64);
    let mut completed = 0;
    let result = pipeline.run_with_progress(decoded.pixels.view(), args.size, |stage| {
        advance(&pb, &mut completed, stage)
    });
    let output = match result {
        Ok(output) => {
            pb.finish_and_clear();
            output
        }
        Err(e) => {
            pb.abandon_with_message("failed");
            return Err(e).with_context(|| format!("Filtering {:?} failed", args.image_path));
        }
    };

    let output_dir = config.output_dir();
    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create output directory {:?}", dir))?;
    }
    let paths = OutputPaths::for_input(&args.image_path, output_dir.as_deref(), args.size);

    let renderer = Renderer::new(config.output.clone());
    let convolved = scale_color(output.convolved.view(), args.multiply);
    renderer.save(convolved.view(), &paths.convolved, RenderMode::Rgb)?;
    renderer.save(output.pooled.view(), &paths.pooled, RenderMode::Rgb)?;
    renderer.save(
        output.difference.view(),
        &paths.difference,
        renderer.difference_mode(),
    )?;

    if args.summary {
        let (convolved, pooled, difference) = output.stats();
        let summary = RunSummary {
            input: args.image_path.clone(),
            size: args.size,
            power: config.filter.power,
            pool_sizes: config.filter.pool_sizes.clone(),
            multiply: args.multiply,
            convolved,
            pooled,
            difference,
            outputs: paths.all().iter().map(|p| p.to_path_buf()).collect(),
            elapsed_ms: output.elapsed.as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    tracing::info!("Done in {:?}", output.elapsed);
    Ok(())
}
