//! Scripted driver for the ledger transaction client.
//!
//! # Commands
//! ```text
//! keygen                                  new key pair (base64)
//! balance [--address A]                   balance + nonce
//! view  -i iface.json METHOD [PARAMS..]   read-only contract call
//! call  -i iface.json METHOD [PARAMS..]   signed contract call, optional --wait N
//! wait  HASH [--max-attempts N]           poll an earlier submission
//! ```
//!
//! The attempt budget for waiting is always explicit: a flag or
//! `polling.max_attempts` in the config file.

use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

use ledger_client::config::{self, ClientConfig};
use ledger_client::ledger::{
    signer, CallKind, CallOutcome, ConfirmationPoller, ContractClient, ContractInterface,
    HttpGateway, KeyMaterial, LedgerError, PollPolicy, PrivateKey,
};
use ledger_client::observability::{logging, metrics};

const MISSING_BUDGET: &str =
    "an attempt budget is required: pass --max-attempts or set polling.max_attempts";

#[derive(Parser)]
#[command(name = "ledger-cli")]
#[command(about = "Sign, submit, and confirm ledger contract transactions", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON key file; overrides `wallet.key_file`.
    #[arg(short, long)]
    key_file: Option<PathBuf>,

    /// Gateway base URL; overrides the key file and config.
    #[arg(long)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new private key
    Keygen,
    /// Show balance and nonce
    Balance {
        /// Address to query (defaults to the loaded account)
        #[arg(long)]
        address: Option<String>,
    },
    /// Run a read-only contract method
    View {
        #[arg(short, long)]
        interface: PathBuf,
        method: String,
        params: Vec<String>,
    },
    /// Sign and submit a contract method
    Call {
        #[arg(short, long)]
        interface: PathBuf,
        method: String,
        params: Vec<String>,
        /// Wait for confirmation using this many attempts
        #[arg(long)]
        wait: Option<u32>,
    },
    /// Wait for a submitted transaction
    Wait {
        hash: String,
        #[arg(long)]
        max_attempts: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ClientConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    if let Commands::Keygen = cli.command {
        let key = PrivateKey::generate();
        print_json(&json!({
            "private_key": key.to_base64(),
            "public_key": signer::public_key(key.as_bytes())?,
        }))?;
        return Ok(());
    }

    let key_material = load_key_material(&cli, &config);
    let mut gateway_config = config.gateway.clone();
    if let Some(url) = cli
        .rpc_url
        .clone()
        .or_else(|| key_material.as_ref().ok().and_then(|m| m.rpc_url.clone()))
    {
        gateway_config.rpc_url = url;
    }

    let client = ContractClient::new(HttpGateway::new(&gateway_config)?);
    let interval = Duration::from_secs(config.polling.interval_secs);

    match cli.command {
        Commands::Keygen => {}
        Commands::Balance { address } => {
            let address = match address {
                Some(address) => address,
                None => key_material?.address.clone(),
            };
            let balance = client.fetch_balance(&address).await?;
            print_json(&json!({
                "address": address,
                "balance": balance.balance,
                "nonce": balance.nonce,
            }))?;
        }
        Commands::View {
            interface,
            method,
            params,
        } => {
            let account = key_material?.into_account()?;
            let spec = ContractInterface::from_file(&interface)?.prepare(&method, params)?;
            if spec.kind != CallKind::View {
                return Err(format!("'{}' is not a view method; use `call`", method).into());
            }
            let result = client
                .call_view(&spec.contract_address, &spec.method, &spec.params, account.address())
                .await?;
            print_json(&json!({ "method": method, "result": result }))?;
        }
        Commands::Call {
            interface,
            method,
            params,
            wait,
        } => {
            let account = key_material?.into_account()?;
            let spec = ContractInterface::from_file(&interface)?.prepare(&method, params)?;
            match client.invoke(&account, &spec).await? {
                CallOutcome::View(result) => {
                    print_json(&json!({ "method": method, "result": result }))?;
                }
                CallOutcome::Submitted(hash) => {
                    print_json(&json!({ "method": method, "tx_hash": hash }))?;
                    if let Some(max_attempts) = wait {
                        wait_and_print(&client, &hash, max_attempts, interval).await?;
                    }
                }
            }
        }
        Commands::Wait { hash, max_attempts } => {
            let max_attempts = max_attempts
                .or(config.polling.max_attempts)
                .ok_or(MISSING_BUDGET)?;
            wait_and_print(&client, &hash, max_attempts, interval).await?;
        }
    }

    Ok(())
}

fn load_key_material(cli: &Cli, config: &ClientConfig) -> Result<KeyMaterial, LedgerError> {
    let key_file = cli
        .key_file
        .clone()
        .or_else(|| config.wallet.key_file.as_ref().map(PathBuf::from));
    match key_file {
        Some(path) => KeyMaterial::from_file(&path),
        None => KeyMaterial::from_env(),
    }
}

async fn wait_and_print(
    client: &ContractClient<HttpGateway>,
    hash: &str,
    max_attempts: u32,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let poller = ConfirmationPoller::new(PollPolicy::new(max_attempts).with_interval(interval));
    let receipt = poller.wait(client.gateway(), hash).await;
    print_json(&serde_json::to_value(&receipt)?)
}

fn print_json(value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
