use smart_budget_config::Config;
use smart_budget_core::{BudgetRecommendation, BudgetStatus, BudgetSummary, ListView};
use smart_budget_domain::ShoppingItem;
use uuid::Uuid;

use super::io as cli_io;
use super::output;
use super::selectors::short_id;

const NAME_WIDTH: usize = 24;

pub fn money(amount: f64, config: &Config) -> String {
    format!("{:.2} {}", amount, config.currency)
}

/// One-line budget header plus a status line once the warning threshold is crossed.
pub fn print_budget_header(summary: &BudgetSummary, config: &Config) {
    if summary.monthly_budget <= 0.0 && summary.spent <= 0.0 {
        cli_io::print_info("Budget: not set (use `budget <amount>`)");
        return;
    }
    cli_io::print_info(format!(
        "Budget: {} | Spent: {} | Remaining: {} | {:.1}% used",
        money(summary.monthly_budget, config),
        money(summary.spent, config),
        money(summary.remaining, config),
        summary.percent_used
    ));
    match summary.status {
        BudgetStatus::OnTrack => {}
        BudgetStatus::Warning => cli_io::print_warning(format!(
            "Approaching budget limit ({:.0}% threshold).",
            config.warning_threshold_percent
        )),
        BudgetStatus::OverBudget => cli_io::print_error(format!(
            "Over budget by {}.",
            money(-summary.remaining, config)
        )),
    }
}

/// Prints the full list and returns the ids in the order they were numbered.
pub fn print_list(view: &ListView, config: &Config) -> Vec<Uuid> {
    let mut listing = Vec::new();
    print_budget_header(&view.summary, config);

    for section in &view.sections {
        output::section(section.tier.title());
        if section.items.is_empty() {
            cli_io::print_info("  (empty)");
            continue;
        }
        for item in &section.items {
            listing.push(item.id);
            let marker = if view.recommendation.is_affordable(item.id) {
                "fits"
            } else {
                "defer"
            };
            cli_io::print_info(format!(
                "{}  [{}]",
                item_line(listing.len(), item, config),
                marker
            ));
        }
    }

    if !view.purchased.is_empty() {
        output::section("Purchased");
        for item in &view.purchased {
            listing.push(item.id);
            cli_io::print_info(format!(
                "{}  ({})",
                item_line(listing.len(), item, config),
                item.category.key()
            ));
        }
    }

    if view.pending_count() > 0 {
        print_recommendation(&view.recommendation, config);
    }
    listing
}

fn item_line(index: usize, item: &ShoppingItem, config: &Config) -> String {
    let rank = item
        .manual_order
        .map(|rank| format!(" #{}", rank + 1))
        .unwrap_or_default();
    format!(
        "  {:>2}. {:<width$} {:>12}{}  {}",
        index,
        item.name,
        money(item.price, config),
        rank,
        short_id(item.id),
        width = NAME_WIDTH
    )
}

pub fn print_recommendation(recommendation: &BudgetRecommendation, config: &Config) {
    cli_io::print_info(format!(
        "Suggested total: {} ({} of {} pending items fit)",
        money(recommendation.suggested_total, config),
        recommendation.affordable_items.len(),
        recommendation.considered()
    ));
    if !recommendation.unaffordable_items.is_empty() {
        let deferred: Vec<&str> = recommendation
            .unaffordable_items
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        cli_io::print_info(format!(
            "Deferred: {} ({})",
            deferred.join(", "),
            money(recommendation.deferred_total(), config)
        ));
    }
}

pub fn print_summary(view: &ListView, config: &Config) {
    output::section("Budget summary");
    let summary = &view.summary;
    let rows = [
        ("Monthly budget", money(summary.monthly_budget, config)),
        ("Spent", money(summary.spent, config)),
        ("Remaining", money(summary.remaining, config)),
        ("Used", format!("{:.1}%", summary.percent_used)),
        ("Status", summary.status.to_string()),
        (
            "Items",
            format!(
                "{} total, {} purchased, {} pending",
                summary.item_count,
                summary.purchased_count,
                summary.pending_count()
            ),
        ),
    ];
    for (label, value) in rows {
        cli_io::print_info(format!("  {:<16}{}", label, value));
    }
    print_recommendation(&view.recommendation, config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smart_budget_domain::{NewItem, Tier};

    #[test]
    fn money_uses_configured_currency() {
        let mut config = Config::default();
        config.currency = "EUR".into();
        assert_eq!(money(3.5, &config), "3.50 EUR");
    }

    #[test]
    fn item_line_shows_manual_rank() {
        let config = Config::default();
        let mut item = ShoppingItem::from_new(
            NewItem::new("Rice", 4.0, Tier::Need),
            Uuid::new_v4(),
            0,
            Utc::now(),
        );
        item.manual_order = Some(0);
        let line = item_line(1, &item, &config);
        assert!(line.contains("Rice"));
        assert!(line.contains("4.00 USD #1"));
    }
}
