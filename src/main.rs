use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use toybank::application::bootstrap::{AccountSeed, default_seeds, seed_bank};
use toybank::application::engine::BankEngine;
use toybank::application::shutdown::{InterruptListener, Shutdown};
use toybank::config::{self, BankConfig};
use toybank::domain::ports::{BankStoreRef, EventSinkRef};
use toybank::infrastructure::events::TracingEventSink;
use toybank::infrastructure::in_memory::InMemoryBank;
use toybank::interfaces::csv::account_reader::AccountReader;
use toybank::interfaces::csv::balance_writer::BalanceWriter;
use toybank::interfaces::json::event_writer::JsonLinesEventSink;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Capacity of the client table
    #[arg(long, default_value_t = config::DEFAULT_MAX_CLIENTS)]
    max_clients: usize,

    /// Accounts each client may hold
    #[arg(long, default_value_t = config::DEFAULT_MAX_ACCOUNTS)]
    max_accounts: usize,

    /// Number of workers draining the queue
    #[arg(long, default_value_t = config::DEFAULT_WORKERS)]
    workers: usize,

    /// Transaction queue size (one slot always stays free)
    #[arg(long, default_value_t = config::DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Requests generated by each client
    #[arg(long, default_value_t = config::DEFAULT_TRANSACTIONS_PER_CLIENT)]
    transactions_per_client: usize,

    /// Simulated processing time per request, in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_PROCESSING_DELAY.as_millis() as u64)]
    processing_delay_ms: u64,

    /// Delay between two requests of the same client, in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_CLIENT_PACING.as_millis() as u64)]
    client_pacing_ms: u64,

    /// CSV file (client,account,balance) to seed the bank from instead of the built-in list
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Write transaction events as JSON lines to this file instead of the log
    #[arg(long)]
    events: Option<PathBuf>,

    /// Let workers empty the queue after the clients finish, before shutting down
    #[arg(long)]
    drain: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn bank_config(&self) -> BankConfig {
        BankConfig {
            max_clients: self.max_clients,
            max_accounts: self.max_accounts,
            workers: self.workers,
            queue_capacity: self.queue_capacity,
            transactions_per_client: self.transactions_per_client,
            processing_delay: Duration::from_millis(self.processing_delay_ms),
            client_pacing: Duration::from_millis(self.client_pacing_ms),
        }
    }

    fn seeds(&self, config: &BankConfig) -> Result<Vec<AccountSeed>> {
        match &self.accounts {
            Some(path) => {
                let file = File::open(path).into_diagnostic()?;
                AccountReader::new(file)
                    .seeds()
                    .collect::<toybank::error::Result<Vec<_>>>()
                    .into_diagnostic()
            }
            None => Ok(default_seeds(config.max_clients, config.max_accounts)),
        }
    }

    fn event_sink(&self) -> Result<EventSinkRef> {
        match &self.events {
            Some(path) => {
                let file = File::create(path).into_diagnostic()?;
                Ok(Arc::new(JsonLinesEventSink::new(file)))
            }
            None => Ok(Arc::new(TracingEventSink)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the balance report.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = cli.bank_config();
    config.validate().into_diagnostic()?;

    // Without interrupt handlers there is no clean way to stop the workers.
    let interrupts = InterruptListener::install().into_diagnostic()?;

    let bank: BankStoreRef = Arc::new(InMemoryBank::new(config.max_clients, config.max_accounts));
    let seeds = cli.seeds(&config)?;
    let client_ids = seed_bank(bank.as_ref(), &seeds).await;
    let sink = cli.event_sink()?;

    let shutdown = Shutdown::new();
    interrupts.spawn(shutdown.clone());
    tracing::info!("Press Ctrl+C to stop the bank.");

    let engine =
        BankEngine::start(&config, Arc::clone(&bank), sink, shutdown.clone()).into_diagnostic()?;
    let clients = engine.run_clients(&client_ids).await.into_diagnostic()?;
    let dropped: usize = clients.iter().map(|c| c.dropped).sum();
    if dropped > 0 {
        tracing::warn!(dropped, "Some transactions were dropped by a full queue");
    }

    if cli.drain {
        engine.wait_until_idle().await;
    }
    engine.shutdown().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer
        .write_clients(&bank.snapshot().await)
        .into_diagnostic()?;

    Ok(())
}
