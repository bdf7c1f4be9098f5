use crate::domain::account::{AccountId, ClientId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Transaction error: {0}")]
    TransactionError(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Client table is full ({max} clients)")]
    ClientCapacity { max: usize },
    #[error("Client {client_id} cannot hold more than {max} accounts (account {account_id} rejected)")]
    AccountCapacity {
        client_id: ClientId,
        account_id: AccountId,
        max: usize,
    },
    #[error("Client {0} not found")]
    ClientNotFound(ClientId),
    #[error("Transaction queue is full ({capacity} slots)")]
    QueueFull { capacity: usize },
    #[error("Failed to install interrupt handler: {0}")]
    Signal(#[source] std::io::Error),
    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BankError>;
