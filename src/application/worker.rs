//! Worker pool draining the transaction queue.

use super::queue::TransactionQueue;
use super::shutdown::Shutdown;
use crate::domain::ports::{BankStoreRef, EventSinkRef};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Everything a worker needs, shared by all workers of a pool.
#[derive(Clone)]
pub struct WorkerContext {
    pub queue: Arc<TransactionQueue>,
    pub bank: BankStoreRef,
    pub sink: EventSinkRef,
    pub shutdown: Shutdown,
    pub processing_delay: Duration,
}

/// Summary reported by a worker when it terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub worker_id: usize,
    pub processed: u64,
}

/// A fixed set of workers running the same dequeue/apply loop.
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerStats>>,
    shutdown: Shutdown,
}

impl WorkerPool {
    /// Spawns `workers` tasks on the current runtime.
    pub fn spawn(workers: usize, context: WorkerContext) -> Self {
        let shutdown = context.shutdown.clone();
        let handles = (0..workers)
            .map(|worker_id| {
                let context = context.clone();
                let span = tracing::info_span!("worker", id = worker_id);
                tokio::spawn(run_worker(worker_id, context).instrument(span))
            })
            .collect();
        Self { handles, shutdown }
    }

    /// Triggers shutdown and waits for every worker to terminate.
    ///
    /// A worker in the middle of a request finishes it (including its
    /// processing delay) before it stops.
    pub async fn shutdown(self) -> Result<Vec<WorkerStats>> {
        self.shutdown.trigger();
        self.join().await
    }

    /// Waits for every worker to terminate without triggering shutdown.
    pub async fn join(self) -> Result<Vec<WorkerStats>> {
        let mut stats = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            stats.push(handle.await?);
        }
        Ok(stats)
    }
}

async fn run_worker(worker_id: usize, context: WorkerContext) -> WorkerStats {
    tracing::debug!("Worker started");
    let mut processed = 0;

    while !context.shutdown.is_triggered() {
        let Some(request) = context.queue.dequeue(&context.shutdown).await else {
            break;
        };
        tracing::debug!(
            action = %request.action,
            client_id = request.source_client_id,
            account_id = request.source_account_id,
            "Dequeued transaction"
        );

        for event in context.bank.apply(&request).await {
            context.sink.publish(&event);
        }
        processed += 1;

        if !context.processing_delay.is_zero() {
            tokio::time::sleep(context.processing_delay).await;
        }
    }

    tracing::debug!(processed, "Worker terminated");
    WorkerStats {
        worker_id,
        processed,
    }
}
