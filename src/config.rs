//! Bounding constants, loaded once at startup.

use crate::error::{BankError, Result};
use std::time::Duration;

pub const DEFAULT_MAX_CLIENTS: usize = 5;
pub const DEFAULT_MAX_ACCOUNTS: usize = 3;
pub const DEFAULT_WORKERS: usize = 3;
pub const DEFAULT_QUEUE_CAPACITY: usize = 20;
pub const DEFAULT_TRANSACTIONS_PER_CLIENT: usize = 5;
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_CLIENT_PACING: Duration = Duration::from_secs(1);

/// Upper bound on `max_clients * max_accounts`; the client table is
/// allocated up front and ids must fit in `u32`.
pub const MAX_TABLE_SIZE: usize = 1_000_000;

/// Complete bank configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BankConfig {
    /// Capacity of the client table.
    pub max_clients: usize,

    /// Accounts each client may hold.
    pub max_accounts: usize,

    /// Number of concurrent workers draining the queue.
    pub workers: usize,

    /// Ring buffer size. One slot is always kept free.
    pub queue_capacity: usize,

    /// Requests generated by each client actor.
    pub transactions_per_client: usize,

    /// Simulated latency after each processed request.
    pub processing_delay: Duration,

    /// Delay between two requests of the same client actor.
    pub client_pacing: Duration,
}

impl BankConfig {
    /// Checks the constraints every fixed-size container relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_clients == 0 {
            return Err(BankError::InvalidConfig(
                "max_clients must be at least 1".to_string(),
            ));
        }
        if self.max_accounts == 0 {
            return Err(BankError::InvalidConfig(
                "max_accounts must be at least 1".to_string(),
            ));
        }
        match self.max_clients.checked_mul(self.max_accounts) {
            Some(size) if size <= MAX_TABLE_SIZE => {}
            _ => {
                return Err(BankError::InvalidConfig(format!(
                    "table size must not exceed {MAX_TABLE_SIZE}, got {} * {}",
                    self.max_clients, self.max_accounts
                )));
            }
        }
        if self.workers == 0 {
            return Err(BankError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.queue_capacity < 2 {
            return Err(BankError::InvalidConfig(format!(
                "queue_capacity must be at least 2, got {}",
                self.queue_capacity
            )));
        }
        Ok(())
    }
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            max_clients: DEFAULT_MAX_CLIENTS,
            max_accounts: DEFAULT_MAX_ACCOUNTS,
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            transactions_per_client: DEFAULT_TRANSACTIONS_PER_CLIENT,
            processing_delay: DEFAULT_PROCESSING_DELAY,
            client_pacing: DEFAULT_CLIENT_PACING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BankConfig::default();
        assert_eq!(config.max_clients, 5);
        assert_eq!(config.max_accounts, 3);
        assert_eq!(config.workers, 3);
        assert_eq!(config.queue_capacity, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_queue() {
        let config = BankConfig {
            queue_capacity: 1,
            ..BankConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BankError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_table() {
        let config = BankConfig {
            max_clients: 1,
            max_accounts: 4_300_000,
            ..BankConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BankError::InvalidConfig(_))
        ));

        let config = BankConfig {
            max_clients: usize::MAX,
            max_accounts: 2,
            ..BankConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BankConfig {
            max_clients: 1000,
            max_accounts: 1000,
            ..BankConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_workers() {
        let config = BankConfig {
            workers: 0,
            ..BankConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
