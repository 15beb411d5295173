//! Domain types representing shopping-list entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::tier::Tier;

/// A single entry on the shopping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub category: Tier,
    #[serde(default)]
    pub purchased: bool,
    /// Insertion sequence within the category.
    pub order: u32,
    /// Explicit rank within the category. `None` falls back to price ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_order: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingItem {
    /// Builds a persisted item from validated input.
    pub fn from_new(item: NewItem, id: Uuid, order: u32, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: item.name.trim().to_string(),
            price: item.price,
            category: item.category,
            purchased: item.purchased,
            order,
            manual_order: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_manually_ordered(&self) -> bool {
        self.manual_order.is_some()
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Merges the patch into the item and bumps `updated_at`.
    ///
    /// A price that differs from the stored one forfeits manual placement, and so
    /// does a move to another tier. The caller is responsible for assigning a new
    /// `order` when [`MergeEffect::category_changed`] is set.
    pub fn merge(&mut self, patch: ItemPatch, now: DateTime<Utc>) -> MergeEffect {
        let mut effect = MergeEffect::default();
        if patch.clear_manual_order {
            self.manual_order = None;
        }
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(purchased) = patch.purchased {
            self.purchased = purchased;
        }
        if let Some(price) = patch.price {
            if price != self.price {
                self.price = price;
                self.manual_order = None;
                effect.price_changed = true;
            }
        }
        if let Some(category) = patch.category {
            if category != self.category {
                self.category = category;
                self.manual_order = None;
                effect.category_changed = true;
            }
        }
        self.touch(now);
        effect
    }
}

impl Identifiable for ShoppingItem {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for ShoppingItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Amounted for ShoppingItem {
    fn amount(&self) -> f64 {
        self.price
    }
}

/// Side effects observed while merging an [`ItemPatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeEffect {
    pub price_changed: bool,
    pub category_changed: bool,
}

/// Item input before the store assigns id, order and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
    pub category: Tier,
    #[serde(default)]
    pub purchased: bool,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: f64, category: Tier) -> Self {
        Self {
            name: name.into(),
            price,
            category,
            purchased: false,
        }
    }

    pub fn purchased(mut self) -> Self {
        self.purchased = true;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_price(self.price)
    }
}

/// Partial update. `None` leaves a field untouched.
///
/// Explicit ranks are only assigned by reordering a whole tier, so a patch can
/// drop an item's rank but never set one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased: Option<bool>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub clear_manual_order: bool,
}

impl ItemPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn price(price: f64) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    pub fn category(category: Tier) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn purchased(purchased: bool) -> Self {
        Self {
            purchased: Some(purchased),
            ..Self::default()
        }
    }

    pub fn clear_manual_order() -> Self {
        Self {
            clear_manual_order: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, minute, 0).unwrap()
    }

    fn sample() -> ShoppingItem {
        let mut item = ShoppingItem::from_new(
            NewItem::new("  Milk ", 2.5, Tier::Need),
            Uuid::new_v4(),
            0,
            at(0),
        );
        item.manual_order = Some(3);
        item
    }

    #[test]
    fn from_new_trims_name_and_stamps_times() {
        let item = sample();
        assert_eq!(item.name, "Milk");
        assert_eq!(item.created_at, item.updated_at);
        assert!(!item.purchased);
    }

    #[test]
    fn price_change_clears_manual_order() {
        let mut item = sample();
        let effect = item.merge(ItemPatch::price(3.0), at(5));
        assert!(effect.price_changed);
        assert_eq!(item.manual_order, None);
        assert_eq!(item.updated_at, at(5));
    }

    #[test]
    fn unchanged_price_keeps_manual_order() {
        let mut item = sample();
        let effect = item.merge(ItemPatch::price(2.5), at(5));
        assert!(!effect.price_changed);
        assert_eq!(item.manual_order, Some(3));
    }

    #[test]
    fn clearing_rank_keeps_other_fields() {
        let mut item = sample();
        let effect = item.merge(ItemPatch::clear_manual_order(), at(1));
        assert_eq!(effect, MergeEffect::default());
        assert_eq!(item.manual_order, None);
        assert_eq!(item.price, 2.5);
    }

    #[test]
    fn new_items_never_carry_a_rank() {
        let json = r#"{"name":"Eggs","price":3.0,"category":"need","manual_order":4}"#;
        let new: NewItem = serde_json::from_str(json).unwrap();
        let item = ShoppingItem::from_new(new, Uuid::new_v4(), 0, at(0));
        assert_eq!(item.manual_order, None);
    }

    #[test]
    fn category_move_reports_effect() {
        let mut item = sample();
        let effect = item.merge(ItemPatch::category(Tier::Nice), at(2));
        assert!(effect.category_changed);
        assert_eq!(item.category, Tier::Nice);
        assert_eq!(item.manual_order, None);
    }

    #[test]
    fn validation_rejects_bad_input() {
        assert_eq!(
            NewItem::new("   ", 1.0, Tier::Good).validate(),
            Err(ValidationError::EmptyName)
        );
        assert!(NewItem::new("Bread", 0.0, Tier::Good).validate().is_err());
        assert!(NewItem::new("Bread", -1.0, Tier::Good).validate().is_err());
        assert!(NewItem::new("Bread", f64::NAN, Tier::Good).validate().is_err());
        assert!(ItemPatch::price(0.0).validate().is_err());
        assert!(ItemPatch::purchased(true).validate().is_ok());
    }

    #[test]
    fn item_round_trips_through_json() {
        let item = sample();
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"category\":\"need\""));
        let back: ShoppingItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
