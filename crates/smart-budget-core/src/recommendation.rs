//! Splits pending items into what fits the remaining budget and what has to wait.

use serde::Serialize;
use smart_budget_domain::{total_amount, ShoppingItem};
use uuid::Uuid;

/// Partition of unpurchased items against a remaining budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetRecommendation {
    /// Items that fit, in the order they were visited.
    pub affordable_items: Vec<ShoppingItem>,
    /// Items skipped by the pass, in the order they were visited.
    pub unaffordable_items: Vec<ShoppingItem>,
    pub suggested_total: f64,
}

impl BudgetRecommendation {
    pub fn is_affordable(&self, id: Uuid) -> bool {
        self.affordable_items.iter().any(|item| item.id == id)
    }

    pub fn considered(&self) -> usize {
        self.affordable_items.len() + self.unaffordable_items.len()
    }

    /// Combined price of the deferred items.
    pub fn deferred_total(&self) -> f64 {
        total_amount(&self.unaffordable_items)
    }
}

/// First-fit greedy allocation over tier and price order.
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Partitions the unpurchased entries of `items` against `remaining_budget`.
    ///
    /// Candidates are visited by tier rank, then price, with ties in input order.
    /// Each candidate is accepted when it still fits; a skipped item is never
    /// reconsidered, so a later cheaper item may be accepted after it.
    pub fn recommend(items: &[ShoppingItem], remaining_budget: f64) -> BudgetRecommendation {
        let mut candidates: Vec<&ShoppingItem> =
            items.iter().filter(|item| !item.purchased).collect();
        candidates.sort_by(|a, b| {
            a.category
                .rank()
                .cmp(&b.category.rank())
                .then(a.price.total_cmp(&b.price))
        });

        let mut recommendation = BudgetRecommendation::default();
        if remaining_budget <= 0.0 {
            recommendation.unaffordable_items = candidates.into_iter().cloned().collect();
            return recommendation;
        }

        let mut running_total = 0.0;
        for item in candidates {
            if running_total + item.price <= remaining_budget {
                running_total += item.price;
                recommendation.affordable_items.push(item.clone());
            } else {
                recommendation.unaffordable_items.push(item.clone());
            }
        }
        recommendation.suggested_total = running_total;
        recommendation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smart_budget_domain::{NewItem, Tier};

    fn item(name: &str, price: f64, category: Tier) -> ShoppingItem {
        ShoppingItem::from_new(
            NewItem::new(name, price, category),
            Uuid::new_v4(),
            0,
            Utc::now(),
        )
    }

    fn names(items: &[ShoppingItem]) -> Vec<&str> {
        items.iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn walks_tiers_in_priority_order() {
        let items = vec![
            item("C", 5.0, Tier::Good),
            item("B", 30.0, Tier::Need),
            item("A", 10.0, Tier::Need),
        ];
        let rec = RecommendationEngine::recommend(&items, 20.0);
        assert_eq!(names(&rec.affordable_items), vec!["A", "C"]);
        assert_eq!(names(&rec.unaffordable_items), vec!["B"]);
        assert_eq!(rec.suggested_total, 15.0);
    }

    #[test]
    fn zero_budget_defers_everything() {
        let items = vec![item("A", 1.0, Tier::Need), item("B", 2.0, Tier::Nice)];
        let rec = RecommendationEngine::recommend(&items, 0.0);
        assert!(rec.affordable_items.is_empty());
        assert_eq!(rec.unaffordable_items.len(), 2);
        assert_eq!(rec.suggested_total, 0.0);
    }

    #[test]
    fn negative_budget_defers_everything() {
        let items = vec![item("A", 1.0, Tier::Need)];
        let rec = RecommendationEngine::recommend(&items, -12.5);
        assert!(rec.affordable_items.is_empty());
        assert_eq!(rec.suggested_total, 0.0);
    }

    #[test]
    fn ample_budget_accepts_everything() {
        let items = vec![
            item("A", 4.0, Tier::Nice),
            item("B", 6.0, Tier::Good),
            item("C", 2.0, Tier::Need),
        ];
        let rec = RecommendationEngine::recommend(&items, 12.0);
        assert_eq!(names(&rec.affordable_items), vec!["C", "B", "A"]);
        assert!(rec.unaffordable_items.is_empty());
        assert_eq!(rec.suggested_total, 12.0);
    }

    #[test]
    fn skipped_items_are_not_revisited() {
        // Greedy takes the cheap need first, which leaves no room for the 9.0 need
        // even though 9.0 alone would have fit.
        let items = vec![
            item("Cheap", 2.0, Tier::Need),
            item("Big", 9.0, Tier::Need),
            item("Tiny", 1.0, Tier::Nice),
        ];
        let rec = RecommendationEngine::recommend(&items, 10.0);
        assert_eq!(names(&rec.affordable_items), vec!["Cheap", "Tiny"]);
        assert_eq!(names(&rec.unaffordable_items), vec!["Big"]);
    }

    #[test]
    fn purchased_items_are_ignored() {
        let mut bought = item("Bought", 3.0, Tier::Need);
        bought.purchased = true;
        let items = vec![bought, item("Pending", 3.0, Tier::Need)];
        let rec = RecommendationEngine::recommend(&items, 100.0);
        assert_eq!(rec.considered(), 1);
        assert_eq!(names(&rec.affordable_items), vec!["Pending"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let items = vec![
            item("First", 5.0, Tier::Good),
            item("Second", 5.0, Tier::Good),
            item("Third", 5.0, Tier::Good),
        ];
        let rec = RecommendationEngine::recommend(&items, 10.0);
        assert_eq!(names(&rec.affordable_items), vec!["First", "Second"]);
        assert_eq!(names(&rec.unaffordable_items), vec!["Third"]);
        assert_eq!(rec, RecommendationEngine::recommend(&items, 10.0));
    }

    #[test]
    fn conservation_and_budget_bound_hold() {
        let prices = [3.5, 12.0, 0.99, 7.25, 40.0, 2.0, 18.4];
        let tiers = [Tier::Need, Tier::Good, Tier::Nice];
        let items: Vec<ShoppingItem> = prices
            .iter()
            .enumerate()
            .map(|(index, price)| item(&format!("item-{index}"), *price, tiers[index % 3]))
            .collect();

        for budget in [-5.0, 0.0, 1.0, 10.0, 25.0, 60.0, 500.0] {
            let rec = RecommendationEngine::recommend(&items, budget);
            assert_eq!(rec.considered(), items.len());
            let sum: f64 = rec.affordable_items.iter().map(|item| item.price).sum();
            assert_eq!(sum, rec.suggested_total);
            if budget >= 0.0 {
                assert!(rec.suggested_total <= budget);
            } else {
                assert!(rec.affordable_items.is_empty());
            }
        }
    }
}
