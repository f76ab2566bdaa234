use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use usdrub::cli::ui::{StyleType, style_text};
use usdrub::config::AppConfig;
use usdrub::core::log::{LogConfig, LogLevel, REPORT_TARGET, init_logging};

#[derive(Parser)]
#[command(version, about = "Convert USD to RUB")]
struct Cli {
    /// Amount of USD to convert
    #[arg(long = "USD", value_name = "AMOUNT", allow_hyphen_values = true)]
    usd: Option<String>,

    /// Verbosity of the log file
    #[arg(long = "LOGS", value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    logs: LogLevel,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match cli.config_path.as_deref() {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    init_logging(&LogConfig::new(
        config.log_file.clone(),
        cli.logs,
        config.console_level,
    ))?;

    match usdrub::run(&config, cli.usd.as_deref()).await {
        Ok(conversion) => {
            println!("{}", style_text(&conversion.rub.to_string(), StyleType::Result));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let output = e.report_line();
            tracing::error!(target: REPORT_TARGET, "{output}");
            println!("{}", style_text(&output, StyleType::Error));
            Ok(ExitCode::FAILURE)
        }
    }
}
