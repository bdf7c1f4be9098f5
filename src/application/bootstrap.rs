//! Seeds the bank with its clients and accounts before any worker starts.

use crate::config::MAX_TABLE_SIZE;
use crate::domain::account::{AccountId, Balance, ClientId};
use crate::domain::ports::BankStore;
use rust_decimal::Decimal;
use serde::Deserialize;

/// One account to open at startup.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct AccountSeed {
    pub client: ClientId,
    pub account: AccountId,
    pub balance: Balance,
}

/// The static bootstrap list: clients `1..=max_clients`, each with accounts
/// `1..=max_accounts` holding `1000 * account_id`.
///
/// Ids are capped at `u32::MAX`; callers bound the table size through
/// `BankConfig::validate`.
pub fn default_seeds(max_clients: usize, max_accounts: usize) -> Vec<AccountSeed> {
    let clients = ClientId::try_from(max_clients).unwrap_or(ClientId::MAX);
    let accounts = AccountId::try_from(max_accounts).unwrap_or(AccountId::MAX);

    let mut seeds = Vec::with_capacity(max_clients.saturating_mul(max_accounts).min(MAX_TABLE_SIZE));
    for client in 1..=clients {
        for account in 1..=accounts {
            seeds.push(AccountSeed {
                client,
                account,
                balance: seed_balance(account),
            });
        }
    }
    seeds
}

/// Starting balance of a default account: `1000 * account_id`.
fn seed_balance(account: AccountId) -> Balance {
    Balance::new(Decimal::from(account) * Decimal::ONE_THOUSAND)
}

/// Opens every seeded account and returns the ids of the clients that were
/// created, in first-appearance order.
///
/// Capacity errors and unknown clients are logged and skipped.
pub async fn seed_bank(bank: &dyn BankStore, seeds: &[AccountSeed]) -> Vec<ClientId> {
    let mut clients: Vec<ClientId> = Vec::new();
    let mut rejected: Vec<ClientId> = Vec::new();

    for seed in seeds {
        if !clients.contains(&seed.client) && !rejected.contains(&seed.client) {
            match bank.add_client(seed.client).await {
                Ok(()) => clients.push(seed.client),
                Err(e) => {
                    tracing::warn!(client_id = seed.client, error = %e, "Client not created");
                    rejected.push(seed.client);
                }
            }
        }
        if rejected.contains(&seed.client) {
            continue;
        }

        if let Err(e) = bank.add_account(seed.client, seed.account, seed.balance).await {
            tracing::warn!(
                client_id = seed.client,
                account_id = seed.account,
                error = %e,
                "Account not opened"
            );
        }
    }

    tracing::info!(clients = clients.len(), "Bank seeded");
    clients
}
