use crate::domain::event::TransactionEvent;
use crate::domain::ports::EventSink;
use std::sync::{Mutex, PoisonError};

/// Publishes every event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: &TransactionEvent) {
        let balance = event.balance.map(|b| b.to_string());
        if event.status.is_success() {
            tracing::info!(
                client_id = event.client_id,
                account_id = event.account_id,
                action = %event.action,
                amount = %event.amount,
                balance = balance.as_deref(),
                "Client {}: {} {} on account {}",
                event.client_id,
                event.status,
                event.amount,
                event.account_id
            );
        } else {
            tracing::info!(
                client_id = event.client_id,
                account_id = event.account_id,
                action = %event.action,
                amount = %event.amount,
                status = %event.status,
                "Transaction rejected"
            );
        }
    }
}

/// Keeps every published event in memory, in publication order.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<TransactionEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TransactionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for MemoryEventSink {
    fn publish(&self, event: &TransactionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Amount;
    use crate::domain::event::Outcome;
    use crate::domain::transaction::Action;
    use rust_decimal_macros::dec;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemoryEventSink::new();
        for account_id in 1..=3 {
            sink.publish(&TransactionEvent {
                client_id: 1,
                account_id,
                action: Action::Deposit,
                amount: Amount::new(dec!(1)).unwrap(),
                status: Outcome::NoMatchingAccount,
                balance: None,
            });
        }
        let ids: Vec<_> = sink.events().iter().map(|e| e.account_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
