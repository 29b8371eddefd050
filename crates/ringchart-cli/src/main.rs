mod config;
#[cfg(feature = "preview")]
mod preview;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Render ring charts described in TOML files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canvas size of a chart, in points and pixels.
    Size { chart: PathBuf },
    /// Render one frame as PNG.
    Render {
        chart: PathBuf,
        /// Defaults to the chart path with a .png extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Seconds into the animation; the final state when omitted.
        #[arg(short, long)]
        time: Option<f64>,
    },
    /// Render the whole animation as GIF.
    Animate {
        chart: PathBuf,
        /// Defaults to the chart path with a .gif extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overrides `frame_rate` from the chart file.
        #[arg(long)]
        fps: Option<f64>,
        /// Repeat the animation forever.
        #[arg(long = "loop")]
        looping: bool,
    },
    /// Write a sample chart file.
    Init {
        #[arg(default_value = "chart.toml")]
        path: PathBuf,
        #[arg(long)]
        force: bool,
    },
    /// Play the animation in a window, reloading when the chart file changes.
    #[cfg(feature = "preview")]
    Preview { chart: PathBuf },
}

fn output_path(chart: &Path, output: Option<PathBuf>, extension: &str) -> PathBuf {
    output.unwrap_or_else(|| chart.with_extension(extension))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Size { chart } => {
            let chart = config::load_chart(&chart)?;
            let layout = ringchart::compute_layout(&chart.config)?;
            let (width, height) = layout.pixel_size(chart.config.scale);
            println!(
                "{}x{} pt, {}x{} px",
                layout.size.width, layout.size.height, width, height
            );
        }
        Command::Render {
            chart: path,
            output,
            time,
        } => {
            let chart = config::load_chart(&path)?;
            let frame = match time {
                Some(time) => ringchart::image_for_time(&chart.config, time)?,
                None => ringchart::image(&chart.config)?,
            };
            let output = output_path(&path, output, "png");
            frame
                .save_png(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!(
                "Wrote {}x{} image to {}",
                frame.width(),
                frame.height(),
                output.display()
            );
        }
        Command::Animate {
            chart: path,
            output,
            fps,
            looping,
        } => {
            let chart = config::load_chart(&path)?;
            let frame_rate = fps.unwrap_or(chart.frame_rate);
            let animation =
                ringchart::animated_image_with_frame_rate(&chart.config, frame_rate)?
                    .with_looping(looping || chart.looping);
            let output = output_path(&path, output, "gif");
            animation
                .save_gif(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            log::info!(
                "Wrote {} frames to {}",
                animation.frames().len(),
                output.display()
            );
        }
        Command::Init { path, force } => {
            config::write_default_chart(&path, force)?;
            println!("Wrote {}", path.display());
        }
        #[cfg(feature = "preview")]
        Command::Preview { chart } => {
            let chart = fs_err::canonicalize(&chart)?;
            preview::run(chart)?;
        }
    }
    Ok(())
}
