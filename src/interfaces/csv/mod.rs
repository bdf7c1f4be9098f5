pub mod account_reader;
pub mod balance_writer;
