use super::client::{ClientActor, ClientStats};
use super::queue::TransactionQueue;
use super::shutdown::Shutdown;
use super::worker::{WorkerContext, WorkerPool, WorkerStats};
use crate::config::BankConfig;
use crate::domain::account::{AccountId, ClientId};
use crate::domain::ports::{BankStoreRef, EventSinkRef};
use crate::domain::transaction::TransactionRequest;
use crate::error::Result;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::JoinSet;

/// How often `wait_until_idle` looks at the queue.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The running bank: a transaction queue and the worker pool draining it.
///
/// `BankEngine` owns the queue and the workers for the length of a run. The
/// store, the event sink and the shutdown flag are shared handles supplied by
/// the caller, so they outlive the engine.
pub struct BankEngine {
    config: BankConfig,
    queue: Arc<TransactionQueue>,
    shutdown: Shutdown,
    sink: EventSinkRef,
    workers: WorkerPool,
}

impl BankEngine {
    /// Validates `config`, creates the queue and spawns the workers.
    pub fn start(
        config: &BankConfig,
        bank: BankStoreRef,
        sink: EventSinkRef,
        shutdown: Shutdown,
    ) -> Result<Self> {
        config.validate()?;
        let queue = Arc::new(TransactionQueue::new(config.queue_capacity)?);

        let context = WorkerContext {
            queue: Arc::clone(&queue),
            bank,
            sink: Arc::clone(&sink),
            shutdown: shutdown.clone(),
            processing_delay: config.processing_delay,
        };
        let workers = WorkerPool::spawn(config.workers, context);
        tracing::info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "Bank engine started"
        );

        Ok(Self {
            config: config.clone(),
            queue,
            shutdown,
            sink,
            workers,
        })
    }

    pub fn queue(&self) -> Arc<TransactionQueue> {
        Arc::clone(&self.queue)
    }

    /// Enqueues a single request. Never blocks; see `TransactionQueue::enqueue`.
    pub fn submit(&self, request: TransactionRequest) -> Result<()> {
        self.queue.enqueue(request)
    }

    /// Runs one client actor per id and waits for all of them to finish.
    pub async fn run_clients(&self, client_ids: &[ClientId]) -> Result<Vec<ClientStats>> {
        let base_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let mut actors = JoinSet::new();
        for &client_id in client_ids {
            let actor = ClientActor::new(
                client_id,
                AccountId::try_from(self.config.max_accounts).unwrap_or(AccountId::MAX),
                self.config.transactions_per_client,
                self.config.client_pacing,
                base_seed.wrapping_add(u64::from(client_id)),
            );
            actors.spawn(actor.run(self.queue(), self.shutdown.clone()));
        }

        let mut stats = Vec::with_capacity(client_ids.len());
        while let Some(joined) = actors.join_next().await {
            stats.push(joined?);
        }
        stats.sort_by_key(|s| s.client_id);
        Ok(stats)
    }

    /// Waits until the queue is empty or shutdown is triggered.
    ///
    /// Requests already taken by a worker may still be in flight when this
    /// returns.
    pub async fn wait_until_idle(&self) {
        while !self.queue.is_empty() {
            tokio::select! {
                _ = self.shutdown.cancelled() => return,
                _ = tokio::time::sleep(IDLE_POLL_INTERVAL) => {}
            }
        }
    }

    /// Triggers shutdown, waits for every worker to terminate and flushes the
    /// event sink.
    pub async fn shutdown(self) -> Result<EngineReport> {
        let workers = self.workers.shutdown().await?;
        self.sink.flush()?;
        let report = EngineReport {
            workers,
            unprocessed: self.queue.len(),
        };
        tracing::info!(
            processed = report.processed(),
            unprocessed = report.unprocessed,
            "Bank engine stopped"
        );
        Ok(report)
    }
}

/// What the engine did before it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReport {
    pub workers: Vec<WorkerStats>,
    /// Requests still queued when the workers stopped.
    pub unprocessed: usize,
}

impl EngineReport {
    pub fn processed(&self) -> u64 {
        self.workers.iter().map(|w| w.processed).sum()
    }
}
