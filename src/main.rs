//! x402 trust skill CLI.
//!
//! ```text
//! x402-trust [--config FILE] run <action> [--params JSON] [-p key=value]...
//! x402-trust [--config FILE] serve [--bind ADDR]
//! x402-trust [--config FILE] health
//! x402-trust [--config FILE] config
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;

use x402_trust::config::{load_config, validate_config};
use x402_trust::lifecycle::{wait_for_ctrl_c, Shutdown};
use x402_trust::observability::{logging, metrics};
use x402_trust::{HttpServer, Params, TrustSkill};

#[derive(Parser)]
#[command(name = "x402-trust", version)]
#[command(about = "Trust-aware payments over the x402 trust protocol", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one action and print its result
    Run {
        /// check_provider, compare_providers, secure_payment, confirm_delivery, raise_dispute
        action: String,

        /// Parameters as a JSON object
        #[arg(long)]
        params: Option<String>,

        /// Single parameter; the value is parsed as JSON when possible
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        param: Vec<String>,
    },
    /// Serve actions over HTTP
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Check RPC reachability and chain id
    Health,
    /// Print the effective configuration and validate it
    Config,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (mut config, env_warnings) = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability)?;
    for warning in &env_warnings {
        warning.log();
    }

    match cli.command {
        Commands::Run { action, params, param } => {
            let params = build_params(params.as_deref(), &param)?;
            let skill = TrustSkill::new(Arc::new(config));
            let result = skill.run(&action, &params).await;

            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.contains_key("error") {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            if let Err(errors) = validate_config(&config) {
                for e in &errors {
                    tracing::error!(field = e.field, message = %e.message, "Invalid configuration");
                }
                return Ok(ExitCode::FAILURE);
            }

            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr)?,
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            tracing::info!(
                bind_address = %config.server.bind_address,
                rpc_url = %config.blockchain.rpc_url,
                chain_id = config.blockchain.chain_id,
                signer_configured = config.signing_key.is_some(),
                "Configuration loaded"
            );

            let listener = TcpListener::bind(&config.server.bind_address).await?;
            let server = HttpServer::new(Arc::new(TrustSkill::new(Arc::new(config.clone()))), &config.server);

            let shutdown = Shutdown::new();
            tokio::spawn(wait_for_ctrl_c(shutdown.clone()));
            server.run(listener, shutdown).await?;

            tracing::info!("Shutdown complete");
        }
        Commands::Health => {
            let skill = TrustSkill::new(Arc::new(config));
            let report = skill.health().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.healthy {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            println!(
                "# signing key: {}",
                if config.signing_key.is_some() { "configured" } else { "not configured" }
            );
            if let Err(errors) = validate_config(&config) {
                for e in &errors {
                    eprintln!("invalid {}: {}", e.field, e.message);
                }
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Merge `--params` JSON and `-p key=value` pairs. Pairs win.
fn build_params(json: Option<&str>, pairs: &[String]) -> Result<Params, String> {
    let mut params = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err("--params must be a JSON object".to_string()),
            Err(e) => return Err(format!("--params is not valid JSON: {}", e)),
        },
        None => Params::new(),
    };

    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", pair))?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        params.insert(key.trim().to_string(), value);
    }
    Ok(params)
}
