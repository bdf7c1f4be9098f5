use super::account::{AccountId, Amount, ClientId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of operation a request asks for.
///
/// Requests travel with a numeric action code. Codes outside the known range
/// are kept as `Unknown` so the processor can report them instead of the
/// request being lost at decode time.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Action {
    Deposit,
    Withdraw,
    Transfer,
    CheckBalance,
    Unknown(UnknownCode),
}

/// An action code with no known meaning, always 4 or above.
///
/// Only `Action::from(u8)` builds one, so a known code never ends up here.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct UnknownCode(u8);

impl UnknownCode {
    pub fn code(self) -> u8 {
        self.0
    }
}

impl From<u8> for Action {
    fn from(code: u8) -> Self {
        match code {
            0 => Action::Deposit,
            1 => Action::Withdraw,
            2 => Action::Transfer,
            3 => Action::CheckBalance,
            other => Action::Unknown(UnknownCode(other)),
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        match action {
            Action::Deposit => 0,
            Action::Withdraw => 1,
            Action::Transfer => 2,
            Action::CheckBalance => 3,
            Action::Unknown(unknown) => unknown.code(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Deposit => f.write_str("deposit"),
            Action::Withdraw => f.write_str("withdraw"),
            Action::Transfer => f.write_str("transfer"),
            Action::CheckBalance => f.write_str("check_balance"),
            Action::Unknown(unknown) => write!(f, "unknown({})", unknown.code()),
        }
    }
}

/// A pending request produced by a client actor and consumed by exactly one worker.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub action: Action,
    pub source_client_id: ClientId,
    pub source_account_id: AccountId,
    pub target_client_id: Option<ClientId>,
    pub target_account_id: Option<AccountId>,
    pub amount: Amount,
}

impl TransactionRequest {
    pub fn deposit(client_id: ClientId, account_id: AccountId, amount: Amount) -> Self {
        Self::single(Action::Deposit, client_id, account_id, amount)
    }

    pub fn withdraw(client_id: ClientId, account_id: AccountId, amount: Amount) -> Self {
        Self::single(Action::Withdraw, client_id, account_id, amount)
    }

    /// Builds a request that only names a source account.
    pub fn single(
        action: Action,
        client_id: ClientId,
        account_id: AccountId,
        amount: Amount,
    ) -> Self {
        Self {
            action,
            source_client_id: client_id,
            source_account_id: account_id,
            target_client_id: None,
            target_account_id: None,
            amount,
        }
    }
}
