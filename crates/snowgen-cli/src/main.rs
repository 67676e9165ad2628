#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Command, GeneratorConfig};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    init_telemetry()?;

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());

    match args.command {
        Command::Generate(args) => {
            let config =
                GeneratorConfig::try_from(args).context("invalid generate configuration")?;
            tracing::debug!("generate config: {config:#?}");
            commands::generate(&config, &mut out)
        }
        Command::Decode(args) => commands::decode(&args, &mut out),
    }
}
