use crate::domain::account::{AccountId, Balance, Client, ClientId};
use crate::domain::event::TransactionEvent;
use crate::domain::ports::BankStore;
use crate::domain::processor;
use crate::domain::transaction::TransactionRequest;
use crate::error::{BankError, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// In-memory client table behind a single exclusive lock.
///
/// Every read and every mutation goes through the same `tokio::sync::Mutex`,
/// so each `apply` is linearizable with respect to all other calls. The lock
/// is only held for in-memory work and never across another await point.
pub struct InMemoryBank {
    clients: Mutex<Vec<Client>>,
    max_clients: usize,
    max_accounts: usize,
}

impl InMemoryBank {
    /// Creates an empty bank that accepts at most `max_clients` clients with
    /// `max_accounts` accounts each.
    pub fn new(max_clients: usize, max_accounts: usize) -> Self {
        Self {
            clients: Mutex::new(Vec::with_capacity(max_clients)),
            max_clients,
            max_accounts,
        }
    }
}

#[async_trait]
impl BankStore for InMemoryBank {
    async fn add_client(&self, client_id: ClientId) -> Result<()> {
        let mut clients = self.clients.lock().await;
        if clients.len() >= self.max_clients {
            return Err(BankError::ClientCapacity {
                max: self.max_clients,
            });
        }
        clients.push(Client::new(client_id, self.max_accounts));
        Ok(())
    }

    async fn add_account(
        &self,
        client_id: ClientId,
        account_id: AccountId,
        initial_balance: Balance,
    ) -> Result<()> {
        let mut clients = self.clients.lock().await;
        let mut outcome = Err(BankError::ClientNotFound(client_id));
        for client in clients.iter_mut().filter(|c| c.client_id == client_id) {
            let opened = client.open_account(account_id, initial_balance);
            // One successful append is enough for the call to succeed.
            if outcome.is_err() {
                outcome = opened;
            }
        }
        outcome
    }

    async fn apply(&self, request: &TransactionRequest) -> Vec<TransactionEvent> {
        let mut clients = self.clients.lock().await;
        processor::apply(&mut clients, request)
    }

    async fn balance(&self, client_id: ClientId, account_id: AccountId) -> Option<Balance> {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .filter(|c| c.client_id == client_id)
            .flat_map(|c| c.accounts.iter())
            .find(|a| a.account_id == account_id)
            .map(|a| a.balance)
    }

    async fn snapshot(&self) -> Vec<Client> {
        self.clients.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Amount;
    use crate::domain::event::Outcome;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_client_respects_capacity() {
        let bank = InMemoryBank::new(2, 3);
        bank.add_client(1).await.unwrap();
        bank.add_client(2).await.unwrap();

        let result = bank.add_client(3).await;
        assert!(matches!(result, Err(BankError::ClientCapacity { max: 2 })));
        assert_eq!(bank.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_add_client_is_not_idempotent() {
        let bank = InMemoryBank::new(5, 3);
        bank.add_client(1).await.unwrap();
        bank.add_client(1).await.unwrap();
        assert_eq!(bank.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_add_account() {
        let bank = InMemoryBank::new(5, 2);
        bank.add_client(1).await.unwrap();
        bank.add_account(1, 1, Balance::new(dec!(1000))).await.unwrap();
        bank.add_account(1, 2, Balance::new(dec!(2000))).await.unwrap();

        let full = bank.add_account(1, 3, Balance::new(dec!(3000))).await;
        assert!(matches!(full, Err(BankError::AccountCapacity { .. })));

        let missing = bank.add_account(9, 1, Balance::ZERO).await;
        assert!(matches!(missing, Err(BankError::ClientNotFound(9))));

        assert_eq!(bank.balance(1, 2).await, Some(Balance::new(dec!(2000))));
        assert_eq!(bank.balance(1, 3).await, None);
    }

    #[tokio::test]
    async fn test_add_account_to_duplicate_clients() {
        let bank = InMemoryBank::new(5, 3);
        bank.add_client(1).await.unwrap();
        bank.add_client(1).await.unwrap();
        bank.add_account(1, 1, Balance::new(dec!(10))).await.unwrap();

        let snapshot = bank.snapshot().await;
        assert!(snapshot.iter().all(|c| c.accounts.len() == 1));
    }

    #[tokio::test]
    async fn test_apply_scenarios() {
        let bank = InMemoryBank::new(5, 3);
        bank.add_client(1).await.unwrap();
        bank.add_account(1, 1, Balance::new(dec!(1000))).await.unwrap();

        let deposit = TransactionRequest::deposit(1, 1, Amount::new(dec!(500)).unwrap());
        assert_eq!(bank.apply(&deposit).await[0].status, Outcome::Deposited);
        assert_eq!(bank.balance(1, 1).await, Some(Balance::new(dec!(1500))));

        let withdraw = TransactionRequest::withdraw(1, 1, Amount::new(dec!(800)).unwrap());
        assert_eq!(bank.apply(&withdraw).await[0].status, Outcome::Withdrawn);
        assert_eq!(bank.balance(1, 1).await, Some(Balance::new(dec!(700))));

        let too_much = TransactionRequest::withdraw(1, 1, Amount::new(dec!(2000)).unwrap());
        assert_eq!(bank.apply(&too_much).await[0].status, Outcome::InsufficientFunds);
        assert_eq!(bank.balance(1, 1).await, Some(Balance::new(dec!(700))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_withdrawals_never_overdraw() {
        let bank = Arc::new(InMemoryBank::new(1, 1));
        bank.add_client(1).await.unwrap();
        bank.add_account(1, 1, Balance::new(dec!(1000))).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let bank = Arc::clone(&bank);
            handles.push(tokio::spawn(async move {
                let request = TransactionRequest::withdraw(1, 1, Amount::new(dec!(30)).unwrap());
                bank.apply(&request).await[0].status
            }));
        }

        let mut withdrawn = 0;
        for handle in handles {
            if handle.await.unwrap() == Outcome::Withdrawn {
                withdrawn += 1;
            }
        }

        // 1000 / 30 = 33 withdrawals fit.
        assert_eq!(withdrawn, 33);
        assert_eq!(bank.balance(1, 1).await, Some(Balance::new(dec!(10))));
    }
}
