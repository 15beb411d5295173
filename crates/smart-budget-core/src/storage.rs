//! Storage contract for shopping items and budget settings.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use smart_budget_domain::{BudgetSettings, ItemPatch, NewItem, ShoppingItem, Tier};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    ordering::ManualOrderAssignment,
    time::{Clock, SystemClock},
    CoreError, CoreResult,
};

/// Abstraction over persistence backends holding the item and settings collections.
///
/// Every operation is atomic for a single record. `update` and `delete` treat a
/// missing id as a no-op.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Validates and inserts a new item, returning its assigned id.
    async fn add(&self, item: NewItem) -> CoreResult<Uuid>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<ShoppingItem>>;

    /// Lists every item in creation order. Display ordering is up to the caller.
    async fn list(&self) -> CoreResult<Vec<ShoppingItem>>;

    /// Merges `patch` into the stored item and bumps `updated_at`.
    async fn update(&self, id: Uuid, patch: ItemPatch) -> CoreResult<()>;

    /// Writes a tier's explicit ranks as one batch: either every assignment is
    /// stored or none is. Fails with `NotFound` if any id is missing.
    async fn set_manual_orders(&self, assignments: &[ManualOrderAssignment]) -> CoreResult<usize>;

    async fn delete(&self, id: Uuid) -> CoreResult<()>;

    /// Removes every item and reports how many were dropped. Budget settings survive.
    async fn clear(&self) -> CoreResult<usize>;

    /// Writes an exact snapshot back, id and timestamps included.
    async fn restore(&self, item: ShoppingItem) -> CoreResult<()>;

    async fn get_budget(&self) -> CoreResult<Option<BudgetSettings>>;

    async fn set_budget(&self, amount: f64) -> CoreResult<()>;

    async fn list_by_category(&self, category: Tier) -> CoreResult<Vec<ShoppingItem>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|item| item.category == category)
            .collect())
    }

    async fn list_by_purchased(&self, purchased: bool) -> CoreResult<Vec<ShoppingItem>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|item| item.purchased == purchased)
            .collect())
    }
}

/// In-memory item and settings collections shared by the store implementations.
///
/// Operations are synchronous and take the timestamp to stamp from the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTable {
    items: BTreeMap<Uuid, ShoppingItem>,
    budget: Option<BudgetSettings>,
}

impl ItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        items: impl IntoIterator<Item = ShoppingItem>,
        budget: Option<BudgetSettings>,
    ) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
            budget,
        }
    }

    pub fn items(&self) -> &BTreeMap<Uuid, ShoppingItem> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Next insertion sequence number for `category`.
    pub fn next_order(&self, category: Tier) -> u32 {
        self.items
            .values()
            .filter(|item| item.category == category)
            .map(|item| item.order + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn insert(&mut self, item: NewItem, now: DateTime<Utc>) -> CoreResult<ShoppingItem> {
        item.validate()?;
        let order = self.next_order(item.category);
        let stored = ShoppingItem::from_new(item, Uuid::new_v4(), order, now);
        self.items.insert(stored.id, stored.clone());
        Ok(stored)
    }

    pub fn get(&self, id: Uuid) -> Option<&ShoppingItem> {
        self.items.get(&id)
    }

    pub fn list(&self) -> Vec<ShoppingItem> {
        let mut items: Vec<ShoppingItem> = self.items.values().cloned().collect();
        items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.category.cmp(&b.category))
                .then(a.order.cmp(&b.order))
                .then(a.id.cmp(&b.id))
        });
        items
    }

    /// Applies `patch` to the item. Returns `false` when the id is unknown.
    pub fn update(&mut self, id: Uuid, patch: ItemPatch, now: DateTime<Utc>) -> CoreResult<bool> {
        patch.validate()?;
        let target = patch.category;
        let next_order = target.map(|category| self.next_order(category));
        let Some(item) = self.items.get_mut(&id) else {
            return Ok(false);
        };
        let effect = item.merge(patch, now);
        if effect.category_changed {
            if let Some(order) = next_order {
                item.order = order;
            }
        }
        Ok(true)
    }

    /// Applies every rank or, when an id is unknown, none of them.
    pub fn assign_manual_orders(
        &mut self,
        assignments: &[ManualOrderAssignment],
        now: DateTime<Utc>,
    ) -> CoreResult<usize> {
        if let Some(missing) = assignments
            .iter()
            .find(|assignment| !self.items.contains_key(&assignment.id))
        {
            return Err(CoreError::NotFound(missing.id));
        }
        let mut changed = 0;
        for assignment in assignments {
            if let Some(item) = self.items.get_mut(&assignment.id) {
                if item.manual_order != Some(assignment.manual_order) {
                    item.manual_order = Some(assignment.manual_order);
                    item.touch(now);
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<ShoppingItem> {
        self.items.remove(&id)
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    pub fn restore(&mut self, item: ShoppingItem) {
        self.items.insert(item.id, item);
    }

    pub fn budget(&self) -> Option<&BudgetSettings> {
        self.budget.as_ref()
    }

    pub fn set_budget(&mut self, amount: f64, now: DateTime<Utc>) -> CoreResult<BudgetSettings> {
        let settings = BudgetSettings::new(amount, now)?;
        self.budget = Some(settings.clone());
        Ok(settings)
    }
}

/// Volatile [`ItemStore`] used by tests and embedders that bring their own persistence.
pub struct InMemoryItemStore {
    table: Mutex<ItemTable>,
    clock: Arc<dyn Clock>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Mutex::new(ItemTable::new()),
            clock,
        }
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn add(&self, item: NewItem) -> CoreResult<Uuid> {
        let now = self.clock.now();
        let stored = self.table.lock().await.insert(item, now)?;
        tracing::debug!(id = %stored.id, category = %stored.category, "item added");
        Ok(stored.id)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<ShoppingItem>> {
        Ok(self.table.lock().await.get(id).cloned())
    }

    async fn list(&self) -> CoreResult<Vec<ShoppingItem>> {
        Ok(self.table.lock().await.list())
    }

    async fn update(&self, id: Uuid, patch: ItemPatch) -> CoreResult<()> {
        let now = self.clock.now();
        if !self.table.lock().await.update(id, patch, now)? {
            tracing::debug!(%id, "update skipped for missing item");
        }
        Ok(())
    }

    async fn set_manual_orders(&self, assignments: &[ManualOrderAssignment]) -> CoreResult<usize> {
        let now = self.clock.now();
        self.table.lock().await.assign_manual_orders(assignments, now)
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        self.table.lock().await.remove(id);
        Ok(())
    }

    async fn clear(&self) -> CoreResult<usize> {
        Ok(self.table.lock().await.clear())
    }

    async fn restore(&self, item: ShoppingItem) -> CoreResult<()> {
        self.table.lock().await.restore(item);
        Ok(())
    }

    async fn get_budget(&self) -> CoreResult<Option<BudgetSettings>> {
        Ok(self.table.lock().await.budget().cloned())
    }

    async fn set_budget(&self, amount: f64) -> CoreResult<()> {
        let now = self.clock.now();
        self.table.lock().await.set_budget(amount, now)?;
        Ok(())
    }
}
