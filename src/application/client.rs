//! Client actors producing pseudo-random deposits and withdrawals.

use super::queue::TransactionQueue;
use super::shutdown::Shutdown;
use crate::domain::account::{AccountId, Amount, ClientId};
use crate::domain::transaction::{Action, TransactionRequest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Largest amount a generated request carries.
pub const MAX_GENERATED_AMOUNT: u32 = 1000;

/// Counters reported by a client actor when it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientStats {
    pub client_id: ClientId,
    pub submitted: usize,
    pub dropped: usize,
}

pub struct ClientActor {
    client_id: ClientId,
    max_account_id: AccountId,
    transactions: usize,
    pacing: Duration,
    rng: StdRng,
}

impl ClientActor {
    pub fn new(
        client_id: ClientId,
        max_account_id: AccountId,
        transactions: usize,
        pacing: Duration,
        seed: u64,
    ) -> Self {
        Self {
            client_id,
            max_account_id: max_account_id.max(1),
            transactions,
            pacing,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws the next request: deposit or withdraw, on account
    /// `1..=max_account_id`, for `1..=MAX_GENERATED_AMOUNT`.
    pub fn next_request(&mut self) -> TransactionRequest {
        let action = if self.rng.gen_bool(0.5) {
            Action::Deposit
        } else {
            Action::Withdraw
        };
        let account_id = self.rng.gen_range(1..=self.max_account_id);
        let units = self.rng.gen_range(1..=MAX_GENERATED_AMOUNT);
        let amount = Amount::from(NonZeroU32::new(units).unwrap_or(NonZeroU32::MIN));
        TransactionRequest::single(action, self.client_id, account_id, amount)
    }

    /// Submits up to `transactions` requests, pacing between them.
    ///
    /// Stops early once shutdown is triggered. Requests rejected by a full
    /// queue are dropped, never retried.
    pub async fn run(mut self, queue: Arc<TransactionQueue>, shutdown: Shutdown) -> ClientStats {
        let mut stats = ClientStats {
            client_id: self.client_id,
            ..ClientStats::default()
        };

        for _ in 0..self.transactions {
            if shutdown.is_triggered() {
                break;
            }

            let request = self.next_request();
            match queue.enqueue(request) {
                Ok(()) => stats.submitted += 1,
                Err(e) => {
                    tracing::warn!(client_id = self.client_id, error = %e, "Dropping transaction");
                    stats.dropped += 1;
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.pacing) => {}
            }
        }

        tracing::debug!(
            client_id = self.client_id,
            submitted = stats.submitted,
            dropped = stats.dropped,
            "Client finished"
        );
        stats
    }
}
