pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pricewise_core::config::{AuthorizationMode, ConfigOverrides, LoadOptions};
use rust_decimal::Decimal;

#[derive(Debug, Parser)]
#[command(
    name = "pricewise",
    about = "Pricewise discount pricing CLI",
    long_about = "Resolve discounted product prices, inspect configuration, and run readiness checks.",
    after_help = "Examples:\n  pricewise price --price 100 --discount-type percentage --category books\n  pricewise config\n  pricewise doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a pricewise.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override logging.level for this invocation")]
    log_level: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Override authorization.mode for this invocation (allow_all|deny_all|api_key)"
    )]
    authorization_mode: Option<AuthorizationMode>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute the discounted price of a product and return a structured outcome")]
    Price(PriceArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, strategy wiring, and configured discount rows")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct PriceArgs {
    #[arg(long, help = "List price of the product")]
    price: Decimal,
    #[arg(long, help = "Discount classification, e.g. percentage or moneyoff")]
    discount_type: String,
    #[arg(long, help = "Product category used to look up the discount")]
    category: String,
    #[arg(long, help = "API key presented when authorization.mode is api_key")]
    api_key: Option<String>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        config_path: cli.config,
        require_file: false,
        overrides: ConfigOverrides {
            log_level: cli.log_level,
            authorization_mode: cli.authorization_mode,
        },
    };

    let result = match cli.command {
        Command::Price(args) => commands::price::run(
            options,
            commands::price::PriceRequest {
                price: args.price,
                discount_type: args.discount_type,
                product_category: args.category,
                api_key: args.api_key,
            },
        ),
        Command::Config => commands::config::run(options),
        Command::Doctor { json } => commands::doctor::run(options, json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
