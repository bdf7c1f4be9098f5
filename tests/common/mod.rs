#![allow(dead_code)]

use std::io::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use toybank::application::bootstrap::{default_seeds, seed_bank};
use toybank::application::engine::BankEngine;
use toybank::application::shutdown::Shutdown;
use toybank::config::BankConfig;
use toybank::infrastructure::events::MemoryEventSink;
use toybank::infrastructure::in_memory::InMemoryBank;

/// Writes an accounts CSV with `clients` clients holding `accounts` accounts
/// each, every account starting at `balance`.
pub fn generate_accounts_csv(
    path: &Path,
    clients: u32,
    accounts: u32,
    balance: &str,
) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["client", "account", "balance"])?;

    for client in 1..=clients {
        for account in 1..=accounts {
            wtr.write_record([client.to_string().as_str(), account.to_string().as_str(), balance])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// A config with no artificial delays.
pub fn fast_config() -> BankConfig {
    BankConfig {
        processing_delay: Duration::ZERO,
        client_pacing: Duration::ZERO,
        ..BankConfig::default()
    }
}

pub struct Harness {
    pub bank: Arc<InMemoryBank>,
    pub sink: Arc<MemoryEventSink>,
    pub shutdown: Shutdown,
    pub engine: BankEngine,
}

/// Seeds a bank with the built-in list and starts an engine on it.
pub async fn start(config: &BankConfig) -> Harness {
    let bank = Arc::new(InMemoryBank::new(config.max_clients, config.max_accounts));
    seed_bank(&*bank, &default_seeds(config.max_clients, config.max_accounts)).await;
    let sink = Arc::new(MemoryEventSink::new());
    let shutdown = Shutdown::new();
    let engine = BankEngine::start(config, bank.clone(), sink.clone(), shutdown.clone())
        .expect("engine failed to start");
    Harness {
        bank,
        sink,
        shutdown,
        engine,
    }
}
