//! Bounded transaction queue shared by client actors and workers.

use super::shutdown::Shutdown;
use crate::domain::transaction::TransactionRequest;
use crate::error::{BankError, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;

/// Fixed-capacity ring buffer of pending requests.
///
/// `enqueue` never waits: a full queue rejects the request. `dequeue` waits on
/// a counting semaphore that holds exactly one permit per stored request, so
/// each request is handed to exactly one consumer. The mutex only covers the
/// index bookkeeping and the slot move and is never held across an await.
pub struct TransactionQueue {
    ring: Mutex<Ring>,
    available: Semaphore,
    capacity: usize,
}

struct Ring {
    slots: Vec<Option<TransactionRequest>>,
    front: usize,
    rear: usize,
}

impl TransactionQueue {
    /// Creates an empty queue with `capacity` slots, of which `capacity - 1`
    /// can be occupied at once.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 2 {
            return Err(BankError::InvalidConfig(format!(
                "queue capacity must be at least 2, got {capacity}"
            )));
        }
        Ok(Self {
            ring: Mutex::new(Ring {
                slots: (0..capacity).map(|_| None).collect(),
                front: 0,
                rear: 0,
            }),
            available: Semaphore::new(0),
            capacity,
        })
    }

    /// Appends `request` at the tail.
    ///
    /// Returns `BankError::QueueFull` without blocking when the tail would
    /// run into the head; the request is dropped in that case.
    pub fn enqueue(&self, request: TransactionRequest) -> Result<()> {
        let mut ring = self.lock();
        let next = (ring.rear + 1) % self.capacity;
        if next == ring.front {
            return Err(BankError::QueueFull {
                capacity: self.capacity,
            });
        }
        let rear = ring.rear;
        ring.slots[rear] = Some(request);
        ring.rear = next;
        self.available.add_permits(1);
        Ok(())
    }

    /// Waits for the head request and removes it.
    ///
    /// Returns `None` once `shutdown` is triggered, whether it happened before
    /// the call or while waiting.
    pub async fn dequeue(&self, shutdown: &Shutdown) -> Option<TransactionRequest> {
        if shutdown.is_triggered() {
            return None;
        }

        let permit = tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            permit = self.available.acquire() => permit.ok(),
        };
        // The permit stands for the request we are about to take out.
        permit?.forget();

        let mut ring = self.lock();
        let front = ring.front;
        let request = ring.slots[front].take()?;
        ring.front = (front + 1) % self.capacity;
        Some(request)
    }

    /// Number of requests currently stored.
    pub fn len(&self) -> usize {
        let ring = self.lock();
        (ring.rear + self.capacity - ring.front) % self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Every critical section leaves the ring consistent, so a poisoned lock
    // still guards valid state.
    fn lock(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
