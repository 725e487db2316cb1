use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum MediaKindArg {
    Image,
    Video,
}

#[derive(Debug, Parser)]
#[command(
    name = "pothole-guard",
    about = "Detect road potholes in images and videos and estimate severity",
    disable_help_subcommand = true
)]
pub struct CliArgs {
    /// Lock detection to a specific backend implementation
    #[arg(short = 'b', long = "backend")]
    pub backend: Option<String>,

    /// Override the configuration file path
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Treat the input as an image or a video instead of inferring from the
    /// file extension
    #[arg(long = "kind", value_enum)]
    pub kind: Option<MediaKindArg>,

    /// Submission latitude (requires --lon)
    #[arg(long = "lat", value_name = "DEG")]
    pub lat: Option<String>,

    /// Submission longitude (requires --lat)
    #[arg(long = "lon", value_name = "DEG")]
    pub lon: Option<String>,

    /// Minimum detector confidence for a box to be counted
    #[arg(long = "confidence")]
    pub confidence: Option<f32>,

    /// Directory for annotated result frames
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Skip reverse geocoding and report the placeholder address
    #[arg(long = "offline")]
    pub offline: bool,

    /// Print the list of available detection backends
    #[arg(long = "list-backends")]
    pub list_backends: bool,

    /// Input media path
    pub input: Option<PathBuf>,
}
