//! Change notifications for budget and list consumers.

use tokio::sync::broadcast;

/// Canonical name of the spend-affecting change signal.
pub const BUDGET_UPDATE: &str = "budgetUpdate";

const DEFAULT_CAPACITY: usize = 16;

/// Payload-free signal telling listeners to re-read the item store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetUpdate;

impl BudgetUpdate {
    pub fn name(&self) -> &'static str {
        BUDGET_UPDATE
    }
}

/// Broadcast channel owned by the composition root.
#[derive(Debug, Clone)]
pub struct BudgetEvents {
    sender: broadcast::Sender<BudgetUpdate>,
}

impl BudgetEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BudgetUpdate> {
        self.sender.subscribe()
    }

    pub fn publish(&self) {
        // No listeners is not an error.
        let _ = self.sender.send(BudgetUpdate);
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BudgetEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
