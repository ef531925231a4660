use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;

/// Install the global subscriber: console on stderr, plus a timestamped log
/// file when `log_dir` is set. `RUST_LOG` overrides `level`.
///
/// Returns the log file path, if any.
pub fn setup_logging(level: &str, log_dir: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            // Keep our crate at the configured level, but quiet the windowing stack
            EnvFilter::try_new(level)
                .with_context(|| format!("invalid log level {:?}", level))?
                .add_directive("winit=warn".parse()?)
                .add_directive("egui=warn".parse()?)
                .add_directive("eframe=warn".parse()?)
        }
    };

    let stderr_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::io::stderr);

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {:?}", dir))?;

            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let log_path = dir.join(format!("digit_dataset_{}.log", timestamp));

            let file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&log_path)
                .with_context(|| format!("failed to create log file {:?}", log_path))?;

            let layer = fmt::layer()
                .event_format(BracketedFormatter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false); // Disable ANSI colors in file

            (Some(layer), Some(log_path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    if let Some(path) = &log_path {
        info!("Log file created at: {:?}", path);
    }

    Ok(log_path)
}
