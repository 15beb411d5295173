//! Resolution of user-typed item references.
//!
//! A reference is tried, in order, as a 1-based number from the last listing,
//! a case-insensitive item name, and finally an id prefix of at least four
//! hex digits.

use std::fmt;

use smart_budget_domain::ShoppingItem;
use uuid::Uuid;

const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    StaleIndex(usize),
    IndexOutOfRange { index: usize, listed: usize },
    Ambiguous(String),
    NoMatch(String),
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::Empty => f.write_str("an item reference is required"),
            SelectorError::StaleIndex(index) => write!(
                f,
                "item #{index} no longer exists; run `list` to refresh numbers"
            ),
            SelectorError::IndexOutOfRange { index, listed: 0 } => write!(
                f,
                "no listing to pick #{index} from; run `list` first"
            ),
            SelectorError::IndexOutOfRange { index, listed } => {
                write!(f, "item #{index} is out of range (1-{listed})")
            }
            SelectorError::Ambiguous(reference) => write!(
                f,
                "`{reference}` matches several items; use its number from `list`"
            ),
            SelectorError::NoMatch(reference) => write!(f, "no item matches `{reference}`"),
        }
    }
}

impl std::error::Error for SelectorError {}

/// Resolves `reference` against the current `items`, using `listing` for numbers.
pub fn resolve(
    reference: &str,
    listing: &[Uuid],
    items: &[ShoppingItem],
) -> Result<Uuid, SelectorError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(SelectorError::Empty);
    }

    let index = reference.trim_start_matches('#').parse::<usize>().ok();
    if let Some(index) = index.filter(|index| (1..=listing.len()).contains(index)) {
        let id = listing[index - 1];
        return if items.iter().any(|item| item.id == id) {
            Ok(id)
        } else {
            Err(SelectorError::StaleIndex(index))
        };
    }

    let by_name: Vec<Uuid> = items
        .iter()
        .filter(|item| item.name.eq_ignore_ascii_case(reference))
        .map(|item| item.id)
        .collect();
    match by_name.as_slice() {
        [id] => return Ok(*id),
        [] => {}
        _ => return Err(SelectorError::Ambiguous(reference.to_string())),
    }

    let needle: String = reference
        .chars()
        .filter(|ch| *ch != '-')
        .collect::<String>()
        .to_ascii_lowercase();
    if needle.len() >= MIN_ID_PREFIX && needle.chars().all(|ch| ch.is_ascii_hexdigit()) {
        let by_id: Vec<Uuid> = items
            .iter()
            .filter(|item| item.id.simple().to_string().starts_with(&needle))
            .map(|item| item.id)
            .collect();
        match by_id.as_slice() {
            [id] => return Ok(*id),
            [] => {}
            _ => return Err(SelectorError::Ambiguous(reference.to_string())),
        }
    }

    match index {
        Some(index) => Err(SelectorError::IndexOutOfRange {
            index,
            listed: listing.len(),
        }),
        None => Err(SelectorError::NoMatch(reference.to_string())),
    }
}

/// First eight hex digits of an id, enough to address it from the shell.
pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use smart_budget_domain::{NewItem, Tier};

    fn item(name: &str) -> ShoppingItem {
        ShoppingItem::from_new(NewItem::new(name, 1.0, Tier::Need), Uuid::new_v4(), 0, Utc::now())
    }

    #[test]
    fn numbers_follow_last_listing() {
        let items = vec![item("Milk"), item("Eggs")];
        let listing = vec![items[1].id, items[0].id];
        assert_eq!(resolve("1", &listing, &items), Ok(items[1].id));
        assert_eq!(resolve("#2", &listing, &items), Ok(items[0].id));
        assert_eq!(
            resolve("3", &listing, &items),
            Err(SelectorError::IndexOutOfRange { index: 3, listed: 2 })
        );
    }

    #[test]
    fn removed_items_make_numbers_stale() {
        let items = vec![item("Milk")];
        let listing = vec![Uuid::new_v4(), items[0].id];
        assert_eq!(
            resolve("1", &listing, &items),
            Err(SelectorError::StaleIndex(1))
        );
    }

    #[test]
    fn names_match_case_insensitively() {
        let items = vec![item("Olive oil"), item("Soap")];
        assert_eq!(resolve("olive OIL", &[], &items), Ok(items[0].id));
        assert_eq!(
            resolve("bread", &[], &items),
            Err(SelectorError::NoMatch("bread".into()))
        );
    }

    #[test]
    fn duplicate_names_are_ambiguous() {
        let items = vec![item("Soap"), item("soap")];
        assert_eq!(
            resolve("Soap", &[], &items),
            Err(SelectorError::Ambiguous("Soap".into()))
        );
    }

    #[test]
    fn id_prefix_resolves() {
        let items = vec![item("Milk"), item("Eggs")];
        let prefix = short_id(items[1].id);
        assert_eq!(resolve(&prefix, &[], &items), Ok(items[1].id));
        assert_eq!(
            resolve(&items[0].id.to_string(), &[], &items),
            Ok(items[0].id)
        );
    }

    #[test]
    fn numeric_names_win_over_missing_listing() {
        let items = vec![item("7")];
        assert_eq!(resolve("7", &[], &items), Ok(items[0].id));
    }
}
