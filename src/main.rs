use clap::Parser;
use std::io;
use tracing::info;

use digit_dataset_prep::app::App;
use digit_dataset_prep::cli::Cli;
use digit_dataset_prep::config::AppConfig;
use digit_dataset_prep::logging::setup_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, origin) = AppConfig::resolve(cli.config.as_deref())?;
    setup_logging(&config.log_level, config.log_dir.as_deref())?;
    origin.log();

    info!("Starting digit dataset preparation");
    let app = App::new(config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match &cli.command {
        Some(command) => app.run(command, &mut out),
        None => app.run_menu(io::stdin().lock(), &mut out),
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}
