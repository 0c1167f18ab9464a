//! Search/Filter Engine
//!
//! Two-tier ranking over the item catalog:
//! 1. Name matches: localized display name contains the term
//! 2. Material matches: any recycle-yield material's formatted name contains the term
//!
//! Both tiers keep catalog order and an item lands in at most one tier.
//! The category filter runs strictly after ranking. Results are returned
//! as catalog positions so callers can hold them alongside the catalog
//! without borrowing it.

use crate::categories::CategorySet;
use crate::types::{Item, ItemCategory, LocalizedText};
use crate::utils::naming::display_label;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Reserved identifier of the synthetic "no results" row.
pub const NO_RESULTS_ID: &str = "no-results";

/// True when the term would actually narrow the catalog.
pub fn is_active_search(term: &str) -> bool {
    !term.trim().is_empty()
}

/// Rank catalog positions for a search term.
///
/// A blank term is a pass-through: every position, in catalog order.
pub fn rank_indices(items: &[Item], term: &str, language: &str) -> Vec<usize> {
    if !is_active_search(term) {
        return (0..items.len()).collect();
    }

    let needle = term.to_lowercase();
    let mut name_matches = Vec::new();
    let mut material_matches = Vec::new();

    for (index, item) in items.iter().enumerate() {
        if item.display_name(language).to_lowercase().contains(&needle) {
            name_matches.push(index);
            continue;
        }

        let material_hit = item.recycles_into.as_ref().map_or(false, |yields| {
            yields
                .keys()
                .any(|material| display_label(material).to_lowercase().contains(&needle))
        });
        if material_hit {
            material_matches.push(index);
        }
    }

    name_matches.extend(material_matches);
    name_matches
}

/// Ranked items for a search term (name matches, then material matches).
pub fn filter_items_by_search<'a>(items: &'a [Item], term: &str, language: &str) -> Vec<&'a Item> {
    rank_indices(items, term, language)
        .into_iter()
        .map(|index| &items[index])
        .collect()
}

/// Keep only positions whose item category is included, preserving order.
pub fn filter_by_categories(
    items: &[Item],
    ranked: Vec<usize>,
    included: &CategorySet,
) -> Vec<usize> {
    ranked
        .into_iter()
        .filter(|&index| included.contains(&items[index].category))
        .collect()
}

/// Identifier -> position in the ranked result. Empty when no search is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchRelevanceIndex {
    positions: FxHashMap<String, usize>,
}

impl SearchRelevanceIndex {
    pub fn build(items: &[Item], ranked: &[usize]) -> Self {
        let positions = ranked
            .iter()
            .enumerate()
            .map(|(position, &index)| (items[index].id.clone(), position))
            .collect();
        Self { positions }
    }

    pub fn is_active(&self) -> bool {
        !self.positions.is_empty()
    }

    pub fn position(&self, item_id: &str) -> Option<usize> {
        self.positions.get(item_id).copied()
    }
}

/// Outcome of search + category filter over one catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    /// Catalog positions in display order
    pub indices: Vec<usize>,
    pub relevance: SearchRelevanceIndex,
    pub total_count: usize,
}

impl FilterResult {
    pub fn counts(&self) -> ItemCounts {
        ItemCounts {
            filtered: self.indices.len(),
            total: self.total_count,
        }
    }
}

/// Search, then category filter.
pub fn filter(items: &[Item], term: &str, included: &CategorySet, language: &str) -> FilterResult {
    let ranked = rank_indices(items, term, language);
    let indices = filter_by_categories(items, ranked, included);

    let relevance = if is_active_search(term) {
        SearchRelevanceIndex::build(items, &indices)
    } else {
        SearchRelevanceIndex::default()
    };

    tracing::debug!(
        "Filter '{}' matched {} of {} items",
        term,
        indices.len(),
        items.len()
    );

    FilterResult {
        indices,
        relevance,
        total_count: items.len(),
    }
}

/// (filtered, total) pair reported alongside the table. Never counts the placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemCounts {
    pub filtered: usize,
    pub total: usize,
}

/// Placeholder row shown instead of an empty table.
pub fn create_no_results_item(term: &str) -> Item {
    Item::new(
        NO_RESULTS_ID,
        LocalizedText::english(format!("No items found matching \"{}\"", term)),
        ItemCategory::Misc,
    )
}

pub fn is_no_results_item(item_id: &str) -> bool {
    item_id == NO_RESULTS_ID
}

/// Rows handed to the table: real matches or the single placeholder.
#[derive(Debug, Clone)]
pub enum TableRows<'a> {
    Matches(Vec<&'a Item>),
    NoResults(Item),
}

impl<'a> TableRows<'a> {
    pub fn from_filter(items: &'a [Item], result: &FilterResult, term: &str) -> Self {
        if result.indices.is_empty() {
            return TableRows::NoResults(create_no_results_item(term));
        }
        TableRows::Matches(result.indices.iter().map(|&index| &items[index]).collect())
    }

    pub fn rows(&self) -> Vec<&Item> {
        match self {
            TableRows::Matches(items) => items.clone(),
            TableRows::NoResults(placeholder) => vec![placeholder],
        }
    }

    /// Real rows only.
    pub fn filtered_count(&self) -> usize {
        match self {
            TableRows::Matches(items) => items
                .iter()
                .filter(|i| !is_no_results_item(&i.id))
                .count(),
            TableRows::NoResults(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::default_category_set;

    fn item(id: &str, name: &str, category: ItemCategory) -> Item {
        Item::new(id, LocalizedText::english(name), category)
    }

    fn ids(items: &[Item], indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| items[i].id.clone()).collect()
    }

    #[test]
    fn test_name_matches_rank_before_material_matches() {
        let items = vec![
            item("wood", "Wood", ItemCategory::Recyclable).with_recycles_into([("steel_scrap", 1)]),
            item("steel_plate", "Steel Plate", ItemCategory::BasicMaterial),
        ];

        let ranked = filter_items_by_search(&items, "steel", "en");
        let names: Vec<&str> = ranked.iter().map(|i| i.name.en.as_str()).collect();
        assert_eq!(names, vec!["Steel Plate", "Wood"]);
    }

    #[test]
    fn test_blank_term_is_pass_through() {
        let items = vec![
            item("b", "Bravo", ItemCategory::Misc),
            item("a", "Alpha", ItemCategory::Misc),
        ];
        assert_eq!(rank_indices(&items, "   ", "en"), vec![0, 1]);
        assert_eq!(rank_indices(&items, "", "en"), vec![0, 1]);
    }

    #[test]
    fn test_item_in_at_most_one_tier() {
        let items = vec![item("steel_box", "Steel Box", ItemCategory::Misc)
            .with_recycles_into([("steel_scrap", 2)])];
        assert_eq!(rank_indices(&items, "STEEL", "en"), vec![0]);
    }

    #[test]
    fn test_category_filter_after_ranking() {
        let items = vec![
            item("rusty_key", "Rusty Key", ItemCategory::Key),
            item("rusty_gear", "Rusty Gear", ItemCategory::Recyclable),
            item("pipe", "Pipe", ItemCategory::Recyclable).with_recycles_into([("rusty_bolt", 1)]),
        ];

        let result = filter(&items, "rusty", &default_category_set(), "en");
        assert_eq!(ids(&items, &result.indices), vec!["rusty_gear", "pipe"]);
        assert_eq!(result.relevance.position("rusty_gear"), Some(0));
        assert_eq!(result.relevance.position("pipe"), Some(1));
        assert_eq!(result.relevance.position("rusty_key"), None);
        assert_eq!(result.counts(), ItemCounts { filtered: 2, total: 3 });
    }

    #[test]
    fn test_relevance_inactive_without_search() {
        let items = vec![item("a", "Alpha", ItemCategory::Misc)];
        let result = filter(&items, " ", &default_category_set(), "en");
        assert!(!result.relevance.is_active());
        assert_eq!(result.indices, vec![0]);
    }

    #[test]
    fn test_no_results_placeholder() {
        let items = vec![item("a", "Alpha", ItemCategory::Misc)];
        let result = filter(&items, "zzz", &default_category_set(), "en");
        let rows = TableRows::from_filter(&items, &result, "zzz");

        let table = rows.rows();
        assert_eq!(table.len(), 1);
        assert!(is_no_results_item(&table[0].id));
        assert_eq!(table[0].name.en, "No items found matching \"zzz\"");
        assert_eq!(table[0].value, 0);
        assert_eq!(table[0].category, ItemCategory::Misc);
        assert_eq!(rows.filtered_count(), 0);
    }

    #[test]
    fn test_localized_name_search() {
        let mut wires = item("wires", "Wires", ItemCategory::BasicMaterial);
        wires.name.translations.insert("de".into(), "Drähte".into());

        let items = vec![wires, item("battery", "Battery", ItemCategory::BasicMaterial)];
        assert_eq!(rank_indices(&items, "dräh", "de"), vec![0]);
        // Missing translation falls back to English
        assert_eq!(rank_indices(&items, "batt", "de"), vec![1]);
    }
}
