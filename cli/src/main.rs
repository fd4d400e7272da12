//! Gavel command line: inspect configs, hash queued actions and dry-run a
//! governor migration against an in-memory engine.

mod simulate;

use anyhow::Context;
use clap::Parser;
use gavel_engine::EngineConfig;
use gavel_types::{Action, Principal, Tick};
use gavel_utils::LogFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gavel", about = "Gavel governance engine tooling")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's value, or "info".
    #[arg(long, env = "GAVEL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "GAVEL_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Load and validate a config file, then print it with defaults filled in.
    #[command(name = "check-config")]
    CheckConfig {
        #[arg(long, env = "GAVEL_CONFIG")]
        config: PathBuf,
    },

    /// Print the timelock hash of an action scheduled at `eta`.
    #[command(name = "hash-action")]
    HashAction {
        #[arg(long)]
        target: String,

        #[arg(long, default_value_t = 0)]
        value: u128,

        /// Entry point signature; empty for a plain value transfer.
        #[arg(long, default_value = "")]
        selector: String,

        /// Hex-encoded call arguments.
        #[arg(long, default_value = "")]
        payload_hex: String,

        #[arg(long)]
        eta: u64,
    },

    /// Run a full predecessor → successor handoff in memory and print every
    /// event as a JSON line.
    #[command(name = "simulate-migration")]
    SimulateMigration {
        /// Config file; built-in defaults are used when omitted.
        #[arg(long, env = "GAVEL_CONFIG")]
        config: Option<PathBuf>,

        /// Voting delegates (comma-separated: "alice=500000,bob=250000").
        #[arg(long, value_delimiter = ',', value_parser = parse_delegate, required = true)]
        delegates: Vec<(String, u128)>,
    },
}

fn parse_delegate(s: &str) -> Result<(String, u128), String> {
    let (name, weight) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=weight, got {s:?}"))?;
    let weight = weight
        .trim()
        .parse::<u128>()
        .map_err(|e| format!("invalid weight for {name}: {e}"))?;
    Ok((name.trim().to_string(), weight))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Command::CheckConfig { config } => Some(config.clone()),
        Command::SimulateMigration { config, .. } => config.clone(),
        Command::HashAction { .. } => None,
    };
    let config = load_config(config_path.as_ref());

    let (format, level) = match &config {
        Ok(cfg) => (cfg.log_format, cfg.log_level.clone()),
        Err(_) => (LogFormat::default(), "info".to_string()),
    };
    gavel_utils::init_logging(
        cli.log_format.unwrap_or(format),
        cli.log_level.as_deref().unwrap_or(&level),
    );

    match cli.command {
        Command::CheckConfig { .. } => {
            let config = config?;
            tracing::info!(
                voting_period = %gavel_utils::format_span(config.governor.voting_period),
                delay = %gavel_utils::format_span(config.timelock.delay),
                grace_period = %gavel_utils::format_span(config.timelock.grace_period),
                "config is valid"
            );
            print!("{}", config.to_toml_string());
        }
        Command::HashAction {
            target,
            value,
            selector,
            payload_hex,
            eta,
        } => {
            let payload = hex::decode(payload_hex.trim_start_matches("0x"))
                .context("payload is not valid hex")?;
            let action = Action::new(Principal::new(target), value, selector, payload);
            println!("{}", gavel_crypto::hash_action(&action, Tick::new(eta)));
        }
        Command::SimulateMigration { delegates, .. } => {
            let config = config?;
            for record in simulate::run_migration(&config, &delegates)? {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
    }

    Ok(())
}
