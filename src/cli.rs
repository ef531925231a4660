use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "digit-dataset-prep",
    version,
    about = "Inspect and reorganize a labeled digit image dataset driven by CSV manifests"
)]
pub struct Cli {
    /// Settings file (JSON). Defaults to the platform config directory.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Runs the interactive menu when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Count images per digit in the train and test manifests
    Stats {
        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write per-digit counts of both manifests to their stats CSV files
    SaveStats,
    /// Show a random sample of images with their labels
    Preview(PreviewArgs),
    /// Copy images into <dataset_root>/<split>/<digit>/ directories
    Reorganize {
        /// Print the per-split counts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the default settings file
    InitConfig {
        /// Destination, defaults to the platform config directory
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct PreviewArgs {
    /// Number of images to draw
    #[arg(short = 'n', long, default_value_t = 9)]
    pub count: usize,

    /// Seed for a reproducible selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Manifest to sample from, defaults to the train manifest
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Directory the images are loaded from, defaults to the train images
    #[arg(long)]
    pub images: Option<PathBuf>,

    /// Log the selected tiles instead of opening a window
    #[arg(long)]
    pub headless: bool,
}

impl PreviewArgs {
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            seed: None,
            manifest: None,
            images: None,
            headless: false,
        }
    }
}
