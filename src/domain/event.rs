use super::account::{AccountId, Amount, Balance, ClientId};
use super::transaction::Action;
use serde::Serialize;
use std::fmt;

/// Non-fatal classification of applying a request to one account.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Deposited,
    Withdrawn,
    InsufficientFunds,
    BalanceOverflow,
    NoMatchingAccount,
    UnsupportedAction,
    UnknownAction,
}

impl Outcome {
    /// True when the account balance was changed.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Deposited | Outcome::Withdrawn)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Deposited => "deposited",
            Outcome::Withdrawn => "withdrawn",
            Outcome::InsufficientFunds => "insufficient funds",
            Outcome::BalanceOverflow => "balance overflow",
            Outcome::NoMatchingAccount => "no matching account",
            Outcome::UnsupportedAction => "unsupported action",
            Outcome::UnknownAction => "unknown action",
        };
        f.write_str(label)
    }
}

/// Structured record emitted for every account a request touched, or once
/// for a request that touched nothing.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct TransactionEvent {
    pub client_id: ClientId,
    pub account_id: AccountId,
    pub action: Action,
    pub amount: Amount,
    pub status: Outcome,
    /// Balance after the request, when a matching account was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_event_serialization() {
        let event = TransactionEvent {
            client_id: 1,
            account_id: 2,
            action: Action::Deposit,
            amount: Amount::new(dec!(500)).unwrap(),
            status: Outcome::Deposited,
            balance: Some(Balance::new(dec!(1500))),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["client_id"], 1);
        assert_eq!(json["action"], 0);
        assert_eq!(json["status"], "deposited");
        assert_eq!(json["amount"], "500");
        assert_eq!(json["balance"], "1500");
    }

    #[test]
    fn test_event_without_balance_omits_field() {
        let event = TransactionEvent {
            client_id: 1,
            account_id: 9,
            action: Action::Deposit,
            amount: Amount::new(dec!(1)).unwrap(),
            status: Outcome::NoMatchingAccount,
            balance: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "no_matching_account");
        assert!(json.get("balance").is_none());
    }

    #[test]
    fn test_outcome_success() {
        assert!(Outcome::Deposited.is_success());
        assert!(Outcome::Withdrawn.is_success());
        assert!(!Outcome::InsufficientFunds.is_success());
        assert!(!Outcome::UnknownAction.is_success());
    }
}
