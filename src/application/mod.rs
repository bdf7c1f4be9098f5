//! Application layer: the concurrency machinery around the bank.
//!
//! `BankEngine` wires a bounded `TransactionQueue` to a `WorkerPool` that
//! applies requests to a `BankStore`. Client actors feed the queue, and a
//! shared `Shutdown` flag stops everything cooperatively.

pub mod bootstrap;
pub mod client;
pub mod engine;
pub mod queue;
pub mod shutdown;
pub mod worker;
