//! Domain model: accounts, requests, outcomes, and the ports the
//! application layer depends on.

pub mod account;
pub mod event;
pub mod ports;
pub mod processor;
pub mod transaction;
