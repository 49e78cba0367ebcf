use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use telemenu::ControlScheme;
use telemenu::core::config::{self, CliOverrides};

#[derive(Parser)]
#[command(name = "telemenu", about = "Stacked multi-tree menu navigation on a telemetry screen")]
struct Args {
    /// Directional control preset (overrides [controls] in the config file)
    #[arg(short, long, value_enum)]
    scheme: Option<ControlScheme>,

    /// Input settle window after entering a menu, in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Config file (default: ~/.telemenu/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file
    #[arg(long, default_value = "telemenu.log")]
    log_file: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config(args.config.as_deref())?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            scheme: args.scheme,
            settle_ms: args.settle_ms,
        },
    );

    // Initialize file logger; the terminal belongs to the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!(
        "Telemenu starting up with controls {:?}",
        resolved.controls
    );

    telemenu::tui::run(resolved, args.scheme.unwrap_or_default())?;
    Ok(())
}
