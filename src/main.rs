use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use echo_numfmt_api::{
    cli::{Cli, Command, FormatArguments},
    error::{ServiceError, ServiceResult},
    metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION},
    server,
    tools::format_number_with,
};

#[tokio::main]
async fn main() -> ServiceResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Start(args) => server::start_server(args.into_config()?).await,
        Command::Status(args) => {
            let config = args.into_config()?;
            println!("{} {}", PKG_NAME.bold(), PKG_VERSION);
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Format(args) => run_format(&args),
        Command::Version => {
            println!("{} {} - {}", PKG_NAME.bold(), PKG_VERSION.green(), PKG_DESCRIPTION);
            Ok(())
        }
    }
}

fn run_format(args: &FormatArguments) -> ServiceResult<()> {
    args.validate().map_err(ServiceError::Config)?;
    let value: f64 = args
        .value
        .trim()
        .parse()
        .map_err(|e| ServiceError::FromString(format!("'{}' is not a number: {e}", args.value)))?;
    let formatted = format_number_with(value, args.decimal_places)
        .map_err(|e| ServiceError::FromString(e.to_string()))?;
    println!("{formatted}");
    Ok(())
}
