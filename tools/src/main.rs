//! Host side of the DTEK-V image pipeline: make test inputs, preview results, and dry-run a
//! transfer against the simulated board.

mod error;
mod pattern;
mod preview;
mod simulate;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use error::ToolError;

#[derive(Parser)]
#[command(name = "dtekv-tools")]
#[command(about = "Test images and previews for the DTEK-V image pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a square grayscale test image for upload
    GenImage {
        /// Image size in bytes, must be a perfect square
        #[arg(short, long, default_value_t = pattern::DEFAULT_IMAGE_BYTES)]
        len: usize,

        #[arg(short, long, default_value = "img.bin")]
        output: PathBuf,
    },

    /// Write a 320x240 RRRGGGBB test frame
    GenFrame {
        #[arg(short, long, default_value = "vga_test.bin")]
        output: PathBuf,
    },

    /// Put an uploaded image and the downloaded result next to each other as a PNG
    Show {
        #[arg(short, long, default_value = "img.bin")]
        input: PathBuf,

        #[arg(short, long, default_value = "out.bin")]
        output: PathBuf,

        /// Row width, guessed from the input length when absent
        #[arg(long, requires = "height")]
        width: Option<u32>,

        #[arg(long, requires = "width")]
        height: Option<u32>,

        #[arg(short, long, default_value = "result.png")]
        save: PathBuf,
    },

    /// Decode a raw VGA frame to a PNG
    ShowFrame {
        #[arg(default_value = "vga_test.bin")]
        frame: PathBuf,

        #[arg(short, long, default_value = "frame.png")]
        save: PathBuf,
    },

    /// Run one transfer through the firmware on the simulated memory map
    Simulate {
        #[arg(short, long, default_value = "img.bin")]
        input: PathBuf,

        /// Transform selector, as set on switches 2 and up
        #[arg(short, long, default_value_t = 1)]
        method: u32,

        #[arg(short, long, default_value = "out.bin")]
        output: PathBuf,

        /// Where to write the VGA frame the firmware drew
        #[arg(short, long, default_value = "vga_out.bin")]
        frame: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::GenImage { len, output } => {
            let image = pattern::checker_ramp(len)?;
            write(&output, &image)?;
            info!("{} bytes written to {}", image.len(), output.display());
        }
        Commands::GenFrame { output } => {
            let frame = pattern::test_frame();
            write(&output, &frame)?;
            info!("{} bytes written to {}", frame.len(), output.display());
        }
        Commands::Show {
            input,
            output,
            width,
            height,
            save,
        } => {
            let dimensions = width.zip(height);
            let inverted = compare(&input, &output, dimensions, &save)?;
            if inverted {
                info!("output looks like the inverse of the input");
            }
            info!("comparison saved to {}", save.display());
        }
        Commands::ShowFrame { frame, save } => {
            let bytes = read(&frame)?;
            preview::decode_frame(&bytes)?
                .save(&save)
                .with_context(|| format!("Failed to write {}", save.display()))?;
            info!("frame saved to {}", save.display());
        }
        Commands::Simulate {
            input,
            method,
            output,
            frame,
        } => {
            let bytes = read(&input)?;
            let outcome = simulate::run(&bytes, method)?;
            print!("{}", outcome.console);
            if let Some(Err(err)) = outcome.report.rendered {
                warn!("nothing drawn: {:?}", err);
            }
            write(&output, &outcome.output)?;
            write(&frame, &outcome.frame)?;
            info!(
                "{} bytes through {:?}, result in {}",
                outcome.report.length,
                outcome.report.method,
                output.display()
            );
        }
    }

    Ok(())
}

/// Render `input` and `output` side by side into `save`. Returns the inversion guess.
fn compare(
    input: &Path,
    output: &Path,
    dimensions: Option<(u32, u32)>,
    save: &Path,
) -> Result<bool> {
    let inp = read(input)?;
    let out = read(output)?;
    if inp.len() != out.len() {
        warn!("input is {} bytes, output {}", inp.len(), out.len());
    }

    let (width, height) = dimensions.unwrap_or_else(|| preview::guess_dimensions(inp.len()));
    let both = preview::side_by_side(
        &preview::grayscale(&inp, width, height),
        &preview::grayscale(&out, width, height),
    );
    both.save(save)
        .with_context(|| format!("Failed to write {}", save.display()))?;

    Ok(preview::looks_inverted(&inp, &out))
}

fn read(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.is_empty() {
        return Err(ToolError::Empty {
            path: path.to_owned(),
        }
        .into());
    }
    Ok(bytes)
}

fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_png_has_both_halves() {
        let dir = tempfile::tempdir().unwrap();
        let input: Vec<u8> = (0..=255).collect();
        let output: Vec<u8> = input.iter().map(|b| !b).collect();
        write(&dir.path().join("img.bin"), &input).unwrap();
        write(&dir.path().join("out.bin"), &output).unwrap();
        let save = dir.path().join("result.png");

        let inverted = compare(
            &dir.path().join("img.bin"),
            &dir.path().join("out.bin"),
            None,
            &save,
        )
        .unwrap();
        assert!(inverted);

        let png = image::open(&save).unwrap().into_luma8();
        // 256 bytes is a 16x16 square.
        assert_eq!(png.dimensions(), (16 + 8 + 16, 16));
        assert_eq!(png.get_pixel(1, 0).0, [1]);
        assert_eq!(png.get_pixel(16 + 8 + 1, 0).0, [254]);
    }

    #[test]
    fn frame_png_round_trips_colours() {
        let dir = tempfile::tempdir().unwrap();
        let save = dir.path().join("frame.png");
        preview::decode_frame(&pattern::test_frame())
            .unwrap()
            .save(&save)
            .unwrap();

        let png = image::open(&save).unwrap().into_rgb8();
        assert_eq!(png.dimensions(), (320, 240));
        assert_eq!(png.get_pixel(319, 0).0, [255, 255, 255]);
        assert_eq!(png.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        write(&path, &[]).unwrap();

        let err = read(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ToolError>(),
            Some(ToolError::Empty { .. })
        ));
    }
}
