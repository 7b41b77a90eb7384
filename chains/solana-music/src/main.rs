use solana_music::config::MusicConfig;
use solana_music::pda;

use anyhow::Result;
use clap::{Parser, Subcommand};
use core_logic::{setup_logger, WalletManager};
use dotenv::dotenv;
use solana_music::task::TaskContext;
use solana_music::{RpcLedger, TransactionSequencer};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload the configured record, then buy it
    Run {
        #[arg(long)]
        resource_id: Option<u64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<u64>,
    },
    /// Print the derived addresses without sending anything
    Derive {
        #[arg(long)]
        resource_id: Option<u64>,
        /// Buyer key; defaults to the configured keypair
        #[arg(long)]
        buyer: Option<Pubkey>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_guard = setup_logger();
    dotenv().ok();

    let args = Args::parse();
    info!("Loading config from: {}", args.config);

    let mut config = match MusicConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            drop(log_guard);
            std::process::exit(2);
        }
    };

    let command = args.command.unwrap_or(Command::Run {
        resource_id: None,
        name: None,
        price: None,
    });

    match command {
        Command::Derive { resource_id, buyer } => {
            let program_id = config.program_id()?;
            let resource_id = resource_id.unwrap_or(config.music.resource_id);
            let buyer = match buyer {
                Some(key) => key,
                None => WalletManager::load_keypair(&config.wallet_source())?.pubkey(),
            };

            let music = pda::derive_music_address(&program_id, resource_id)?;
            let buyer_pda = pda::derive_buyer_address(&program_id, &buyer)?;
            info!("program:  {}", program_id);
            info!("music:    {} (bump {}, id {})", music.address, music.bump, resource_id);
            info!("buyer:    {} (bump {}, for {})", buyer_pda.address, buyer_pda.bump, buyer);
            Ok(())
        }
        Command::Run {
            resource_id,
            name,
            price,
        } => {
            config.apply_overrides(resource_id, name, price);
            if let Err(e) = config.validate() {
                error!("Invalid config: {}", e);
                drop(log_guard);
                std::process::exit(2);
            }

            let rpc = config.rpc_config();
            let keypair = WalletManager::load_keypair(&config.wallet_source())?;
            info!("Payer: {}", keypair.pubkey());

            let ledger = RpcLedger::new(
                rpc.rpc_url.clone(),
                rpc.timeout(),
                rpc.commitment_config()?,
                keypair,
            );
            info!("RPC endpoint: {}", ledger.url());

            let ctx = TaskContext::new(Arc::new(ledger), config.program_id()?, config.music.clone())
                .with_beneficiary(config.beneficiary()?);
            let sequencer = TransactionSequencer::new(ctx);

            let outcome = sequencer.run().await?;
            info!("Final state: {}", outcome.state);

            if !outcome.is_success() {
                drop(log_guard);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
