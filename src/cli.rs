use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cutout::{ExportFormat, RemovalMethod, RemovalOptions, TiffCompression};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Print resolution in dots per inch (commonly 72, 150, 300 or 600)
    #[arg(long, default_value_t = 300, value_parser = parse_dpi)]
    pub dpi: u32,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove the background, resize to a physical size, and export
    Cut(CutCommand),
    /// Flood-fill a region transparent from a seed pixel
    Wand(WandCommand),
    /// Render the fit-to-viewport preview with a transparency checkerboard
    Preview(PreviewCommand),
    /// Print pixel and physical dimensions for an image
    Info(InfoCommand),
}

#[derive(Args, Debug)]
pub struct CutCommand {
    /// Input image path
    pub input: PathBuf,
    /// Output path (defaults to `<name>-processed.<ext>`; ignored for `both`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Export format
    #[arg(long, value_enum, default_value_t = FormatArg::Jpeg)]
    pub format: FormatArg,
    /// Scale factor applied to the original pixel size (0.1-20)
    #[arg(long, value_parser = parse_positive_number)]
    pub scale: Option<f64>,
    /// Output width in inches
    #[arg(long = "width-inches", value_parser = parse_positive_number)]
    pub width_inches: Option<f64>,
    /// Output height in inches
    #[arg(long = "height-inches", value_parser = parse_positive_number)]
    pub height_inches: Option<f64>,
    /// Let width and height vary independently
    #[arg(long = "no-lock-aspect")]
    pub no_lock_aspect: bool,
    #[command(flatten)]
    pub removal: RemovalArgs,
    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 95)]
    pub quality: u8,
    /// TIFF compression
    #[arg(long, value_enum, default_value_t = CompressionArg::Lzw)]
    pub compression: CompressionArg,
}

#[derive(Args, Debug)]
pub struct RemovalArgs {
    /// Remove the background before resizing
    #[arg(long = "remove-background")]
    pub remove_background: bool,
    /// Background removal engine
    #[arg(long, value_enum, default_value_t = MethodArg::Threshold)]
    pub method: MethodArg,
    /// Brightness cutoff for threshold removal (0-255)
    #[arg(long, default_value_t = 240)]
    pub threshold: u8,
}

impl From<&RemovalArgs> for RemovalOptions {
    fn from(args: &RemovalArgs) -> Self {
        Self::default()
            .with_enabled(args.remove_background)
            .with_method(args.method.into())
            .with_threshold(args.threshold)
    }
}

#[derive(Args, Debug)]
pub struct WandCommand {
    /// Input image path
    pub input: PathBuf,
    /// Seed pixel X coordinate
    pub x: u32,
    /// Seed pixel Y coordinate
    pub y: u32,
    /// Output PNG path (defaults to `<name>-wand.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Per-channel color tolerance (0-255)
    #[arg(long, default_value_t = 32)]
    pub tolerance: u8,
}

#[derive(Args, Debug)]
pub struct PreviewCommand {
    /// Input image path
    pub input: PathBuf,
    /// Output PNG path (defaults to `<name>-preview.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Viewport width in pixels
    #[arg(long = "viewport-width", default_value_t = 800)]
    pub viewport_width: u32,
    /// Viewport height in pixels
    #[arg(long = "viewport-height", default_value_t = 600)]
    pub viewport_height: u32,
    #[command(flatten)]
    pub removal: RemovalArgs,
}

#[derive(Args, Debug)]
pub struct InfoCommand {
    /// Input image path
    pub input: PathBuf,
}

/// Export formats accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Jpeg,
    Tiff,
    Both,
}

impl FormatArg {
    /// The concrete formats to encode.
    pub fn formats(self) -> &'static [ExportFormat] {
        match self {
            FormatArg::Jpeg => &[ExportFormat::Jpeg],
            FormatArg::Tiff => &[ExportFormat::Tiff],
            FormatArg::Both => &[ExportFormat::Jpeg, ExportFormat::Tiff],
        }
    }
}

/// Background removal engines accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodArg {
    Ai,
    Threshold,
}

impl From<MethodArg> for RemovalMethod {
    /// Convert MethodArg to cutout::RemovalMethod.
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Ai => RemovalMethod::Ai,
            MethodArg::Threshold => RemovalMethod::Threshold,
        }
    }
}

/// TIFF compression schemes accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CompressionArg {
    None,
    Lzw,
    Deflate,
}

impl From<CompressionArg> for TiffCompression {
    /// Convert CompressionArg to cutout::TiffCompression.
    fn from(value: CompressionArg) -> Self {
        match value {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::Deflate => TiffCompression::Deflate,
        }
    }
}

fn parse_dpi(value: &str) -> Result<u32, String> {
    let dpi = value
        .parse::<u32>()
        .map_err(|_| format!("dpi must be a whole number, got `{value}`"))?;
    if dpi == 0 {
        return Err("dpi must be positive".to_string());
    }
    Ok(dpi)
}

fn parse_positive_number(value: &str) -> Result<f64, String> {
    let number = value
        .parse::<f64>()
        .map_err(|_| format!("expected a number, got `{value}`"))?;
    if !number.is_finite() || number <= 0.0 {
        return Err(format!("expected a positive number, got `{value}`"));
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_positive_number {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn accepts_plain_decimals() {
                assert_eq!(parse_positive_number("2.5").unwrap(), 2.5);
                assert_eq!(parse_positive_number("1").unwrap(), 1.0);
            }

            #[test]
            fn rejects_non_numeric_text() {
                assert!(parse_positive_number("abc").is_err());
                assert!(parse_positive_number("").is_err());
            }

            #[test]
            fn rejects_zero_and_negatives() {
                assert!(parse_positive_number("0").is_err());
                assert!(parse_positive_number("-1.5").is_err());
            }

            #[test]
            fn rejects_non_finite_values() {
                assert!(parse_positive_number("inf").is_err());
                assert!(parse_positive_number("NaN").is_err());
            }
        }
    }

    mod parse_dpi {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn accepts_standard_resolutions() {
                for dpi in [72u32, 150, 300, 600] {
                    assert_eq!(parse_dpi(&dpi.to_string()).unwrap(), dpi);
                }
            }

            #[test]
            fn rejects_zero_and_fractions() {
                assert!(parse_dpi("0").is_err());
                assert!(parse_dpi("72.5").is_err());
            }
        }
    }
}
