use super::account::{AccountId, Balance, Client, ClientId};
use super::event::TransactionEvent;
use super::transaction::TransactionRequest;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Shared client/account table guarded by a single exclusive lock.
#[async_trait]
pub trait BankStore: Send + Sync {
    async fn add_client(&self, client_id: ClientId) -> Result<()>;
    async fn add_account(
        &self,
        client_id: ClientId,
        account_id: AccountId,
        initial_balance: Balance,
    ) -> Result<()>;
    /// Applies one request atomically with respect to every other store call.
    async fn apply(&self, request: &TransactionRequest) -> Vec<TransactionEvent>;
    async fn balance(&self, client_id: ClientId, account_id: AccountId) -> Option<Balance>;
    async fn snapshot(&self) -> Vec<Client>;
}

/// Outbound consumer of transaction outcomes.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &TransactionEvent);

    /// Pushes buffered events to their destination. Called once the workers
    /// have stopped.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

pub type BankStoreRef = Arc<dyn BankStore>;
pub type EventSinkRef = Arc<dyn EventSink>;
