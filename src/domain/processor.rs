//! Applies a single transaction request to the client table.
//!
//! Callers must hold the store's exclusive lock for the whole call; the
//! functions here never block.

use super::account::Client;
use super::event::{Outcome, TransactionEvent};
use super::transaction::{Action, TransactionRequest};

/// Applies `request` to `clients` and returns one event per matched account.
///
/// Matching is a linear scan over client ids, then account ids. Every match
/// is mutated, so duplicate account ids under one client each receive the
/// request. When nothing matches, or the action is not a mutation, a single
/// event describes the result.
pub fn apply(clients: &mut [Client], request: &TransactionRequest) -> Vec<TransactionEvent> {
    match request.action {
        Action::Deposit | Action::Withdraw => apply_to_matches(clients, request),
        Action::Transfer | Action::CheckBalance => {
            vec![untouched(request, Outcome::UnsupportedAction)]
        }
        Action::Unknown(_) => vec![untouched(request, Outcome::UnknownAction)],
    }
}

fn apply_to_matches(clients: &mut [Client], request: &TransactionRequest) -> Vec<TransactionEvent> {
    let mut events = Vec::new();

    let matching_accounts = clients
        .iter_mut()
        .filter(|client| client.client_id == request.source_client_id)
        .flat_map(|client| client.accounts.iter_mut())
        .filter(|account| account.account_id == request.source_account_id);

    for account in matching_accounts {
        let status = match request.action {
            Action::Deposit => match account.deposit(request.amount) {
                Ok(()) => Outcome::Deposited,
                Err(_) => Outcome::BalanceOverflow,
            },
            _ => match account.withdraw(request.amount) {
                Ok(()) => Outcome::Withdrawn,
                Err(_) => Outcome::InsufficientFunds,
            },
        };
        events.push(TransactionEvent {
            client_id: request.source_client_id,
            account_id: account.account_id,
            action: request.action,
            amount: request.amount,
            status,
            balance: Some(account.balance),
        });
    }

    if events.is_empty() {
        events.push(untouched(request, Outcome::NoMatchingAccount));
    }
    events
}

fn untouched(request: &TransactionRequest, status: Outcome) -> TransactionEvent {
    TransactionEvent {
        client_id: request.source_client_id,
        account_id: request.source_account_id,
        action: request.action,
        amount: request.amount,
        status,
        balance: None,
    }
}
