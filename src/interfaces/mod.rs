//! Adapters between the bank and the outside world: CSV bootstrap input,
//! CSV balance reports, and JSON-lines event output.

pub mod csv;
pub mod json;
