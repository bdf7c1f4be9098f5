use crate::application::bootstrap::AccountSeed;
use crate::error::{BankError, Result};
use std::io::Read;

/// Reads bootstrap accounts from a CSV source with a
/// `client,account,balance` header.
///
/// Whitespace around fields is trimmed. Negative starting balances are
/// rejected, since the bank never lets a balance go below zero.
pub struct AccountReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> AccountReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates each row.
    pub fn seeds(self) -> impl Iterator<Item = Result<AccountSeed>> {
        self.reader.into_deserialize().map(|result| {
            let seed: AccountSeed = result?;
            if seed.balance.is_negative() {
                return Err(BankError::ValidationError(format!(
                    "negative starting balance for account {} of client {}",
                    seed.account, seed.client
                )));
            }
            Ok(seed)
        })
    }
}
