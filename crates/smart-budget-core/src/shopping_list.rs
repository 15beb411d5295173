//! Composition root tying the store, ordering, recommendations and undo together.

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use smart_budget_domain::{ItemPatch, NewItem, ShoppingItem};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    budget_service::{BudgetService, BudgetSummary, DEFAULT_WARNING_THRESHOLD_PERCENT},
    events::{BudgetEvents, BudgetUpdate},
    ordering::{OrderingPolicy, ReorderPlan, ReorderRejection, TierSection},
    recommendation::{BudgetRecommendation, RecommendationEngine},
    storage::ItemStore,
    undo::{PendingUndo, UndoAction, UndoCoordinator, UndoOutcome, DEFAULT_UNDO_WINDOW},
    CoreError, CoreResult,
};

/// Tunables for [`ShoppingList`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListSettings {
    pub undo_window: Duration,
    pub warning_threshold_percent: f64,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            undo_window: DEFAULT_UNDO_WINDOW,
            warning_threshold_percent: DEFAULT_WARNING_THRESHOLD_PERCENT,
        }
    }
}

/// Everything a front end needs to render the list, derived from one fresh read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    /// Unpurchased items, one section per tier in display order.
    pub sections: Vec<TierSection>,
    pub purchased: Vec<ShoppingItem>,
    pub recommendation: BudgetRecommendation,
    pub summary: BudgetSummary,
}

impl ListView {
    pub fn pending_count(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }

    /// Pending items in display order across all tiers.
    pub fn pending_items(&self) -> impl Iterator<Item = &ShoppingItem> {
        self.sections.iter().flat_map(|section| section.items.iter())
    }
}

/// What happened to a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Applied { renumbered: usize },
    Ignored(ReorderRejection),
}

/// Service used by front ends for every read and mutation.
///
/// Each successful mutation is recorded for undo and followed by a
/// [`BudgetUpdate`] broadcast.
pub struct ShoppingList {
    store: Arc<dyn ItemStore>,
    undo: UndoCoordinator,
    events: BudgetEvents,
    settings: ListSettings,
}

impl ShoppingList {
    pub fn new(store: Arc<dyn ItemStore>, settings: ListSettings) -> Self {
        let undo = UndoCoordinator::new(Arc::clone(&store), settings.undo_window);
        Self {
            store,
            undo,
            events: BudgetEvents::default(),
            settings,
        }
    }

    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    pub fn settings(&self) -> ListSettings {
        self.settings
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BudgetUpdate> {
        self.events.subscribe()
    }

    pub async fn add_item(&self, item: NewItem) -> CoreResult<Uuid> {
        let name = item.name.trim().to_string();
        let id = self.store.add(item).await?;
        tracing::info!(%id, "item added to list");
        self.committed(UndoAction::Added { id, name }).await;
        Ok(id)
    }

    /// Applies `patch`. Unknown ids are ignored.
    pub async fn edit_item(&self, id: Uuid, patch: ItemPatch) -> CoreResult<()> {
        patch.validate()?;
        let Some(before) = self.store.get(id).await? else {
            tracing::debug!(%id, "edit ignored for missing item");
            return Ok(());
        };
        if patch.is_empty() {
            return Ok(());
        }
        self.store.update(id, patch).await?;
        self.committed(UndoAction::Edited { before }).await;
        Ok(())
    }

    /// Sets the purchased flag. Unknown ids are ignored.
    pub async fn set_purchased(&self, id: Uuid, purchased: bool) -> CoreResult<()> {
        let Some(before) = self.store.get(id).await? else {
            tracing::debug!(%id, "purchase ignored for missing item");
            return Ok(());
        };
        self.store
            .update(id, ItemPatch::purchased(purchased))
            .await?;
        self.committed(UndoAction::Purchased { before }).await;
        Ok(())
    }

    /// Flips the purchased flag and returns the new value.
    pub async fn toggle_purchased(&self, id: Uuid) -> CoreResult<bool> {
        let item = self.store.get(id).await?.ok_or(CoreError::NotFound(id))?;
        let purchased = !item.purchased;
        self.set_purchased(id, purchased).await?;
        Ok(purchased)
    }

    /// Deletes the item. Unknown ids succeed without any change.
    pub async fn delete_item(&self, id: Uuid) -> CoreResult<()> {
        let Some(before) = self.store.get(id).await? else {
            return Ok(());
        };
        self.store.delete(id).await?;
        self.committed(UndoAction::Deleted { before }).await;
        Ok(())
    }

    pub async fn clear_items(&self) -> CoreResult<usize> {
        let before = self.store.list().await?;
        if before.is_empty() {
            return Ok(0);
        }
        let removed = self.store.clear().await?;
        self.committed(UndoAction::Cleared { before }).await;
        Ok(removed)
    }

    /// Moves `dragged` to the position held by `target` within their shared tier.
    pub async fn reorder(&self, dragged: Uuid, target: Uuid) -> CoreResult<ReorderOutcome> {
        let items = self.store.list().await?;
        let (category, assignments) = match OrderingPolicy::reorder(&items, dragged, target) {
            ReorderPlan::Apply {
                category,
                assignments,
            } => (category, assignments),
            ReorderPlan::Rejected(ReorderRejection::UnknownItem(id)) => {
                return Err(CoreError::NotFound(id));
            }
            ReorderPlan::Rejected(reason) => {
                tracing::debug!(?reason, "reorder ignored");
                return Ok(ReorderOutcome::Ignored(reason));
            }
        };

        let before: Vec<ShoppingItem> = items
            .into_iter()
            .filter(|item| item.category == category)
            .collect();
        self.store.set_manual_orders(&assignments).await?;
        self.committed(UndoAction::Reordered { category, before })
            .await;
        Ok(ReorderOutcome::Applied {
            renumbered: assignments.len(),
        })
    }

    /// Moves the item to zero-based `rank` in its tier's display order.
    ///
    /// Equivalent to dropping it onto the item currently shown at `rank`, so the
    /// whole tier is renumbered.
    pub async fn move_to_rank(&self, id: Uuid, rank: usize) -> CoreResult<ReorderOutcome> {
        let items = self.store.list().await?;
        let category = items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.category)
            .ok_or(CoreError::NotFound(id))?;
        let view = OrderingPolicy::category_view(&items, category);
        let Some(target) = view.get(rank) else {
            return Err(CoreError::Validation(format!(
                "rank {} is outside 1..={} for {}",
                rank + 1,
                view.len(),
                category.title()
            )));
        };
        self.reorder(id, target.id).await
    }

    /// Stores the monthly budget. Not undoable.
    pub async fn set_budget(&self, amount: f64) -> CoreResult<()> {
        self.store.set_budget(amount).await?;
        tracing::info!(amount, "monthly budget updated");
        self.events.publish();
        Ok(())
    }

    pub async fn undo(&self) -> CoreResult<UndoOutcome> {
        let outcome = self.undo.undo().await;
        if matches!(outcome, Ok(UndoOutcome::Reverted(_))) {
            self.events.publish();
        }
        outcome
    }

    pub async fn dismiss_undo(&self) -> bool {
        self.undo.dismiss().await
    }

    pub async fn pending_undo(&self) -> Option<PendingUndo> {
        self.undo.pending().await
    }

    /// Reads the store and derives ordering, recommendation and budget summary.
    pub async fn snapshot(&self) -> CoreResult<ListView> {
        let items = self.store.list().await?;
        let settings = self.store.get_budget().await?;
        let summary = BudgetService::summarize_with_threshold(
            settings.as_ref(),
            &items,
            self.settings.warning_threshold_percent,
        );
        let recommendation = RecommendationEngine::recommend(&items, summary.remaining);

        let (mut purchased, pending): (Vec<ShoppingItem>, Vec<ShoppingItem>) =
            items.into_iter().partition(|item| item.purchased);
        OrderingPolicy::sort(&mut purchased);
        purchased.sort_by_key(|item| item.category);

        Ok(ListView {
            sections: OrderingPolicy::group_by_tier(&pending),
            purchased,
            recommendation,
            summary,
        })
    }

    async fn committed(&self, action: UndoAction) {
        self.undo.record(action).await;
        self.events.publish();
    }
}
