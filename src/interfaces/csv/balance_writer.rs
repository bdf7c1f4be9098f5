use crate::domain::account::{AccountId, Balance, Client, ClientId};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRow {
    client: ClientId,
    account: AccountId,
    balance: Balance,
}

/// Writes final account balances as CSV with a `client,account,balance`
/// header, one row per account in table order.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_clients(&mut self, clients: &[Client]) -> Result<()> {
        for client in clients {
            for account in &client.accounts {
                self.writer.serialize(BalanceRow {
                    client: client.client_id,
                    account: account.account_id,
                    balance: account.balance,
                })?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_clients() {
        let mut client = Client::new(1, 3);
        client.open_account(1, Balance::new(dec!(700))).unwrap();
        client.open_account(2, Balance::new(dec!(2000.25))).unwrap();

        let mut buffer = Vec::new();
        BalanceWriter::new(&mut buffer)
            .write_clients(&[client])
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "client,account,balance\n1,1,700\n1,2,2000.25\n");
    }
}
