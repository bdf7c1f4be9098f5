use crate::error::BankError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

pub type ClientId = u32;
pub type AccountId = u32;

/// Represents the monetary balance held by an account.
///
/// This is a wrapper around `rust_decimal::Decimal`. Balances produced by the
/// transaction processor are never negative, but the type itself does not
/// enforce it so bootstrap data can be validated separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

/// Represents a strictly positive amount carried by a transaction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, BankError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(BankError::ValidationError(format!(
                "Amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = BankError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonZeroU32> for Amount {
    fn from(units: NonZeroU32) -> Self {
        Self(Decimal::from(units.get()))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn checked_add(self, amount: Amount) -> Option<Self> {
        self.0.checked_add(amount.0).map(Self)
    }

    pub fn checked_sub(self, amount: Amount) -> Option<Self> {
        self.0.checked_sub(amount.0).map(Self)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A single account owned by a client.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub balance: Balance,
}

impl Account {
    pub fn new(account_id: AccountId, balance: Balance) -> Self {
        Self {
            account_id,
            balance,
        }
    }

    /// Deposits funds into the account.
    /// A deposit that would overflow the balance leaves it untouched.
    pub fn deposit(&mut self, amount: Amount) -> Result<(), BankError> {
        let account_id = self.account_id;
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            BankError::TransactionError(format!("Balance overflow on account {account_id}"))
        })?;
        Ok(())
    }

    /// Withdraws funds if the balance covers the whole amount.
    /// A rejected withdrawal leaves the balance untouched.
    pub fn withdraw(&mut self, amount: Amount) -> Result<(), BankError> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .filter(|remaining| !remaining.is_negative())
            .ok_or_else(|| BankError::TransactionError("Insufficient funds".to_string()))?;
        Ok(())
    }
}

/// A bank client and the accounts it owns.
///
/// The account list is append-only and bounded by `max_accounts`, which is
/// fixed when the client is created.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Client {
    pub client_id: ClientId,
    pub accounts: Vec<Account>,
    #[serde(skip)]
    max_accounts: usize,
}

impl Client {
    pub fn new(client_id: ClientId, max_accounts: usize) -> Self {
        Self {
            client_id,
            accounts: Vec::with_capacity(max_accounts),
            max_accounts,
        }
    }

    pub fn is_full(&self) -> bool {
        self.accounts.len() >= self.max_accounts
    }

    /// Appends an account unless the client already holds `max_accounts`.
    pub fn open_account(&mut self, account_id: AccountId, balance: Balance) -> Result<(), BankError> {
        if self.is_full() {
            return Err(BankError::AccountCapacity {
                client_id: self.client_id,
                account_id,
                max: self.max_accounts,
            });
        }
        self.accounts.push(Account::new(account_id, balance));
        Ok(())
    }
}
