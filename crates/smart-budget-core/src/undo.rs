//! Single-slot undo with a timed expiry.

use std::{fmt, sync::Arc, time::Duration};

use smart_budget_domain::{ShoppingItem, Tier};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use uuid::Uuid;

use crate::{storage::ItemStore, CoreError, CoreResult};

/// Window used when none is configured.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(5);

/// Compensating description of the last mutation, with pre-mutation snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    Added { id: Uuid, name: String },
    Edited { before: ShoppingItem },
    Purchased { before: ShoppingItem },
    Deleted { before: ShoppingItem },
    Reordered { category: Tier, before: Vec<ShoppingItem> },
    Cleared { before: Vec<ShoppingItem> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    Add,
    Edit,
    Purchase,
    Delete,
    Reorder,
    Clear,
}

impl fmt::Display for UndoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UndoKind::Add => "add",
            UndoKind::Edit => "edit",
            UndoKind::Purchase => "purchase",
            UndoKind::Delete => "delete",
            UndoKind::Reorder => "reorder",
            UndoKind::Clear => "clear",
        };
        f.write_str(label)
    }
}

impl UndoAction {
    pub fn kind(&self) -> UndoKind {
        match self {
            UndoAction::Added { .. } => UndoKind::Add,
            UndoAction::Edited { .. } => UndoKind::Edit,
            UndoAction::Purchased { .. } => UndoKind::Purchase,
            UndoAction::Deleted { .. } => UndoKind::Delete,
            UndoAction::Reordered { .. } => UndoKind::Reorder,
            UndoAction::Cleared { .. } => UndoKind::Clear,
        }
    }

    /// Short label suitable for an "Undo ..." affordance.
    pub fn description(&self) -> String {
        match self {
            UndoAction::Added { name, .. } => format!("Added `{name}`"),
            UndoAction::Edited { before } => format!("Edited `{}`", before.name),
            UndoAction::Purchased { before } if before.purchased => {
                format!("Marked `{}` as not purchased", before.name)
            }
            UndoAction::Purchased { before } => format!("Purchased `{}`", before.name),
            UndoAction::Deleted { before } => format!("Deleted `{}`", before.name),
            UndoAction::Reordered { category, .. } => {
                format!("Reordered {}", category.title())
            }
            UndoAction::Cleared { before } => format!("Cleared {} item(s)", before.len()),
        }
    }

    /// Replays the inverse operation against `store`.
    pub async fn compensate(&self, store: &dyn ItemStore) -> CoreResult<()> {
        match self {
            UndoAction::Added { id, .. } => store.delete(*id).await,
            UndoAction::Deleted { before } => store.restore(before.clone()).await,
            UndoAction::Edited { before } | UndoAction::Purchased { before } => {
                Self::ensure_present(store, before).await?;
                store.restore(before.clone()).await
            }
            UndoAction::Reordered { before, .. } => {
                for item in before {
                    Self::ensure_present(store, item).await?;
                }
                for item in before {
                    store.restore(item.clone()).await?;
                }
                Ok(())
            }
            UndoAction::Cleared { before } => {
                for item in before {
                    store.restore(item.clone()).await?;
                }
                Ok(())
            }
        }
    }

    async fn ensure_present(store: &dyn ItemStore, item: &ShoppingItem) -> CoreResult<()> {
        if store.get(item.id).await?.is_none() {
            return Err(CoreError::UndoConflict(format!(
                "`{}` no longer exists",
                item.name
            )));
        }
        Ok(())
    }
}

/// Result of an [`UndoCoordinator::undo`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    NothingPending,
    Reverted(UndoKind),
}

/// Read-only view of the pending action.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUndo {
    pub kind: UndoKind,
    pub description: String,
    pub expires_in: Duration,
}

struct PendingSlot {
    action: UndoAction,
    expires_at: Instant,
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct UndoState {
    pending: Option<PendingSlot>,
    generation: u64,
}

impl UndoState {
    /// Empties the slot and cancels its timer.
    fn take(&mut self) -> Option<PendingSlot> {
        let slot = self.pending.take()?;
        slot.timer.abort();
        Some(slot)
    }
}

/// Remembers the last mutation for a fixed window and can revert it.
///
/// Idle until [`record`](Self::record) is called; a new record replaces the
/// pending one. Timers run on the ambient tokio runtime.
pub struct UndoCoordinator {
    store: Arc<dyn ItemStore>,
    window: Duration,
    state: Arc<Mutex<UndoState>>,
}

impl UndoCoordinator {
    pub fn new(store: Arc<dyn ItemStore>, window: Duration) -> Self {
        Self {
            store,
            window,
            state: Arc::new(Mutex::new(UndoState::default())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arms the undo window for `action`, replacing any pending action.
    pub async fn record(&self, action: UndoAction) {
        let mut state = self.state.lock().await;
        if let Some(replaced) = state.take() {
            tracing::debug!(kind = %replaced.action.kind(), "pending undo replaced");
        }
        state.generation += 1;
        let generation = state.generation;
        let expires_at = Instant::now() + self.window;
        let timer = tokio::spawn(expire_after(
            Arc::clone(&self.state),
            generation,
            expires_at,
        ));
        tracing::debug!(kind = %action.kind(), "undo armed");
        state.pending = Some(PendingSlot {
            action,
            expires_at,
            generation,
            timer,
        });
    }

    /// Reverts the pending action, if any.
    ///
    /// A failed compensation still clears the slot; the error is returned to the
    /// caller and nothing is retried.
    pub async fn undo(&self) -> CoreResult<UndoOutcome> {
        let slot = {
            let mut state = self.state.lock().await;
            match state.take() {
                Some(slot) if slot.expires_at > Instant::now() => slot,
                _ => return Ok(UndoOutcome::NothingPending),
            }
        };

        let kind = slot.action.kind();
        match slot.action.compensate(self.store.as_ref()).await {
            Ok(()) => {
                tracing::info!(%kind, "undo applied");
                Ok(UndoOutcome::Reverted(kind))
            }
            Err(err) => {
                tracing::warn!(%kind, error = %err, "undo discarded");
                Err(err)
            }
        }
    }

    /// Drops the pending action without side effects. Returns whether one existed.
    pub async fn dismiss(&self) -> bool {
        self.state.lock().await.take().is_some()
    }

    pub async fn pending(&self) -> Option<PendingUndo> {
        let state = self.state.lock().await;
        let slot = state.pending.as_ref()?;
        let now = Instant::now();
        if slot.expires_at <= now {
            return None;
        }
        Some(PendingUndo {
            kind: slot.action.kind(),
            description: slot.action.description(),
            expires_in: slot.expires_at - now,
        })
    }
}

async fn expire_after(state: Arc<Mutex<UndoState>>, generation: u64, expires_at: Instant) {
    sleep_until(expires_at).await;
    let mut state = state.lock().await;
    let current = state
        .pending
        .as_ref()
        .map(|slot| slot.generation == generation)
        .unwrap_or(false);
    if current {
        state.pending = None;
        tracing::debug!("undo window expired");
    }
}
