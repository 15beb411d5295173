//! Display ordering of items inside a priority tier.

use std::cmp::Ordering;

use serde::Serialize;
use smart_budget_domain::{ShoppingItem, Tier};
use uuid::Uuid;

/// One tier's items in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSection {
    pub tier: Tier,
    pub items: Vec<ShoppingItem>,
}

/// New explicit rank for one item, produced by a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManualOrderAssignment {
    pub id: Uuid,
    pub manual_order: u32,
}

/// Why a reorder request was turned into a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderRejection {
    /// Dragged and target items live in different tiers.
    CrossCategory { from: Tier, to: Tier },
    /// The item was dropped onto itself.
    SameItem,
    UnknownItem(Uuid),
}

/// Result of planning a reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderPlan {
    /// Full renumbering of the affected tier, in new display order.
    Apply {
        category: Tier,
        assignments: Vec<ManualOrderAssignment>,
    },
    Rejected(ReorderRejection),
}

/// Stateless ordering rules: manual ranks first, then price ascending.
pub struct OrderingPolicy;

impl OrderingPolicy {
    /// Total order used for display within a tier.
    ///
    /// Manually ranked items come first by rank. The rest follow by price, then by
    /// insertion `order`, then by id.
    pub fn compare(a: &ShoppingItem, b: &ShoppingItem) -> Ordering {
        match (a.manual_order, b.manual_order) {
            (Some(left), Some(right)) => left
                .cmp(&right)
                .then(a.order.cmp(&b.order))
                .then(a.id.cmp(&b.id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a
                .price
                .total_cmp(&b.price)
                .then(a.order.cmp(&b.order))
                .then(a.id.cmp(&b.id)),
        }
    }

    pub fn sort(items: &mut [ShoppingItem]) {
        items.sort_by(Self::compare);
    }

    /// Items of `category` in display order.
    pub fn category_view(items: &[ShoppingItem], category: Tier) -> Vec<ShoppingItem> {
        let mut view: Vec<ShoppingItem> = items
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect();
        Self::sort(&mut view);
        view
    }

    /// One ordered section per tier, in tier order. Empty tiers are kept.
    pub fn group_by_tier(items: &[ShoppingItem]) -> Vec<TierSection> {
        Tier::ALL
            .iter()
            .map(|&tier| TierSection {
                tier,
                items: Self::category_view(items, tier),
            })
            .collect()
    }

    /// Plans moving `dragged` to the position currently held by `target`.
    ///
    /// `items` may span several tiers; only the dragged item's tier is renumbered,
    /// and every item of that tier receives a rank.
    pub fn reorder(items: &[ShoppingItem], dragged: Uuid, target: Uuid) -> ReorderPlan {
        let Some(moving) = items.iter().find(|item| item.id == dragged) else {
            return ReorderPlan::Rejected(ReorderRejection::UnknownItem(dragged));
        };
        let Some(anchor) = items.iter().find(|item| item.id == target) else {
            return ReorderPlan::Rejected(ReorderRejection::UnknownItem(target));
        };
        if moving.category != anchor.category {
            return ReorderPlan::Rejected(ReorderRejection::CrossCategory {
                from: moving.category,
                to: anchor.category,
            });
        }
        if dragged == target {
            return ReorderPlan::Rejected(ReorderRejection::SameItem);
        }

        let category = moving.category;
        let mut ids: Vec<Uuid> = Self::category_view(items, category)
            .iter()
            .map(|item| item.id)
            .collect();
        let from = ids.iter().position(|id| *id == dragged);
        let to = ids.iter().position(|id| *id == target);
        if let (Some(from), Some(to)) = (from, to) {
            let id = ids.remove(from);
            ids.insert(to, id);
        }

        let assignments = ids
            .into_iter()
            .enumerate()
            .map(|(index, id)| ManualOrderAssignment {
                id,
                manual_order: index as u32,
            })
            .collect();
        ReorderPlan::Apply {
            category,
            assignments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smart_budget_domain::NewItem;
    use std::collections::BTreeSet;

    fn item(name: &str, price: f64, category: Tier, order: u32) -> ShoppingItem {
        ShoppingItem::from_new(
            NewItem::new(name, price, category),
            Uuid::new_v4(),
            order,
            Utc::now(),
        )
    }

    fn names(items: &[ShoppingItem]) -> Vec<&str> {
        items.iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn unranked_items_sort_by_price_then_insertion() {
        let items = vec![
            item("Cheese", 7.0, Tier::Need, 0),
            item("Bread", 3.0, Tier::Need, 1),
            item("Eggs", 3.0, Tier::Need, 2),
            item("Candles", 1.0, Tier::Nice, 0),
        ];
        let view = OrderingPolicy::category_view(&items, Tier::Need);
        assert_eq!(names(&view), vec!["Bread", "Eggs", "Cheese"]);
    }

    #[test]
    fn manual_ranks_precede_price_order() {
        let mut pricey = item("Coffee", 12.0, Tier::Good, 0);
        pricey.manual_order = Some(0);
        let items = vec![item("Tea", 4.0, Tier::Good, 1), pricey];
        let view = OrderingPolicy::category_view(&items, Tier::Good);
        assert_eq!(names(&view), vec!["Coffee", "Tea"]);
    }

    #[test]
    fn group_by_tier_keeps_every_tier() {
        let items = vec![item("Lamp", 20.0, Tier::Nice, 0)];
        let sections = OrderingPolicy::group_by_tier(&items);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].tier, Tier::Need);
        assert!(sections[0].items.is_empty());
        assert_eq!(names(&sections[2].items), vec!["Lamp"]);
    }

    #[test]
    fn reorder_renumbers_whole_category() {
        let a = item("A", 1.0, Tier::Need, 0);
        let b = item("B", 2.0, Tier::Need, 1);
        let c = item("C", 3.0, Tier::Need, 2);
        let other = item("X", 1.0, Tier::Good, 0);
        let items = vec![a.clone(), b.clone(), c.clone(), other.clone()];

        let ReorderPlan::Apply {
            category,
            assignments,
        } = OrderingPolicy::reorder(&items, c.id, a.id)
        else {
            panic!("expected an applicable plan");
        };

        assert_eq!(category, Tier::Need);
        let order: Vec<Uuid> = assignments.iter().map(|entry| entry.id).collect();
        assert_eq!(order, vec![c.id, a.id, b.id]);
        let ranks: BTreeSet<u32> = assignments.iter().map(|entry| entry.manual_order).collect();
        assert_eq!(ranks, (0..3).collect::<BTreeSet<u32>>());
        assert!(assignments.iter().all(|entry| entry.id != other.id));
    }

    #[test]
    fn dragging_down_takes_target_position() {
        let a = item("A", 1.0, Tier::Nice, 0);
        let b = item("B", 2.0, Tier::Nice, 1);
        let c = item("C", 3.0, Tier::Nice, 2);
        let items = vec![a.clone(), b.clone(), c.clone()];

        let ReorderPlan::Apply { assignments, .. } = OrderingPolicy::reorder(&items, a.id, c.id)
        else {
            panic!("expected an applicable plan");
        };
        let order: Vec<Uuid> = assignments.iter().map(|entry| entry.id).collect();
        assert_eq!(order, vec![b.id, c.id, a.id]);
    }

    #[test]
    fn cross_category_reorder_is_rejected() {
        let a = item("A", 1.0, Tier::Need, 0);
        let b = item("B", 2.0, Tier::Good, 0);
        let plan = OrderingPolicy::reorder(&[a.clone(), b.clone()], a.id, b.id);
        assert_eq!(
            plan,
            ReorderPlan::Rejected(ReorderRejection::CrossCategory {
                from: Tier::Need,
                to: Tier::Good,
            })
        );
    }

    #[test]
    fn dropping_onto_itself_is_rejected() {
        let a = item("A", 1.0, Tier::Need, 0);
        let plan = OrderingPolicy::reorder(&[a.clone()], a.id, a.id);
        assert_eq!(plan, ReorderPlan::Rejected(ReorderRejection::SameItem));
    }
}
