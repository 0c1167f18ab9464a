//! Column sorting over precomputed sort keys
//!
//! Every comparison is a lookup into `SortKeyCache` (or the search
//! relevance index), never a per-row format. Sorts are stable.

use crate::search::SearchRelevanceIndex;
use crate::table_cache::SortKeyCache;
use crate::types::Item;
use crate::utils::compare::compare_strings;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    /// Name, or search relevance while a search is active
    #[default]
    Item,
    /// Joined bench label; rows without one always sort last
    CraftingStation,
    /// Total requirement quantity
    NeededFor,
    Value,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort column '{0}'")]
pub struct UnknownSortColumn(pub String);

impl FromStr for SortColumn {
    type Err = UnknownSortColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "item" | "name" => Ok(SortColumn::Item),
            "craftingstation" | "craftbench" | "bench" => Ok(SortColumn::CraftingStation),
            "neededfor" | "requirements" => Ok(SortColumn::NeededFor),
            "value" => Ok(SortColumn::Value),
            _ => Err(UnknownSortColumn(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub descending: bool,
}

impl SortState {
    pub fn new(column: SortColumn, descending: bool) -> Self {
        Self { column, descending }
    }
}

fn directed(ordering: Ordering, descending: bool) -> Ordering {
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Compare two rows under `state`.
pub fn compare_rows(
    a: &Item,
    b: &Item,
    state: SortState,
    keys: &SortKeyCache,
    relevance: &SearchRelevanceIndex,
) -> Ordering {
    match state.column {
        SortColumn::Item if relevance.is_active() => {
            let rank_a = relevance.position(&a.id).unwrap_or(usize::MAX);
            let rank_b = relevance.position(&b.id).unwrap_or(usize::MAX);
            directed(rank_a.cmp(&rank_b), state.descending)
        }
        SortColumn::Item => directed(
            compare_strings(keys.name_key(&a.id), keys.name_key(&b.id)),
            state.descending,
        ),
        SortColumn::CraftingStation => {
            let bench_a = keys.bench_key(&a.id);
            let bench_b = keys.bench_key(&b.id);
            match (bench_a.is_empty(), bench_b.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => directed(compare_strings(bench_a, bench_b), state.descending),
            }
        }
        SortColumn::NeededFor => directed(
            keys.requirement_total(&a.id).cmp(&keys.requirement_total(&b.id)),
            state.descending,
        ),
        SortColumn::Value => directed(a.value.cmp(&b.value), state.descending),
    }
}

/// Stable in-place sort of table rows.
pub fn sort_rows(
    rows: &mut [&Item],
    state: SortState,
    keys: &SortKeyCache,
    relevance: &SearchRelevanceIndex,
) {
    rows.sort_by(|a, b| compare_rows(a, b, state, keys, relevance));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::ItemRequirementLookup;
    use crate::table_cache::BenchNameLookup;
    use crate::types::{CraftBench, ItemCategory, LocalizedText};

    fn catalog() -> Vec<Item> {
        vec![
            Item::new("wires", LocalizedText::english("Wires"), ItemCategory::BasicMaterial)
                .with_value(50),
            Item::new("bandage", LocalizedText::english("bandage"), ItemCategory::QuickUse)
                .with_value(250)
                .with_craft_bench(CraftBench::Single("workbench".into())),
            Item::new(
                "arc_alloy",
                LocalizedText::english("ARC Alloy"),
                ItemCategory::TopsideMaterial,
            )
            .with_value(200),
            Item::new("shield", LocalizedText::english("Light Shield"), ItemCategory::Shield)
                .with_value(250)
                .with_craft_bench(CraftBench::Single("in_raid".into())),
        ]
    }

    fn keys(items: &[Item]) -> SortKeyCache {
        let benches = BenchNameLookup::build(&[], "en");
        SortKeyCache::build(items, &benches, &ItemRequirementLookup::default(), "en")
    }

    fn sorted_ids(
        items: &[Item],
        state: SortState,
        relevance: &SearchRelevanceIndex,
    ) -> Vec<String> {
        let keys = keys(items);
        let mut rows: Vec<&Item> = items.iter().collect();
        sort_rows(&mut rows, state, &keys, relevance);
        rows.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let items = catalog();
        let ids = sorted_ids(&items, SortState::default(), &SearchRelevanceIndex::default());
        assert_eq!(ids, vec!["arc_alloy", "bandage", "shield", "wires"]);
    }

    #[test]
    fn test_empty_bench_sorts_last_in_both_directions() {
        let items = catalog();
        let none = SearchRelevanceIndex::default();

        let asc = sorted_ids(&items, SortState::new(SortColumn::CraftingStation, false), &none);
        assert_eq!(asc, vec!["shield", "bandage", "wires", "arc_alloy"]);

        let desc = sorted_ids(&items, SortState::new(SortColumn::CraftingStation, true), &none);
        assert_eq!(desc, vec!["bandage", "shield", "wires", "arc_alloy"]);
    }

    #[test]
    fn test_value_sort_is_stable() {
        let items = catalog();
        let desc = sorted_ids(
            &items,
            SortState::new(SortColumn::Value, true),
            &SearchRelevanceIndex::default(),
        );
        // bandage and shield tie at 250 and keep catalog order
        assert_eq!(desc, vec!["bandage", "shield", "arc_alloy", "wires"]);
    }

    #[test]
    fn test_relevance_overrides_name_while_searching() {
        let items = catalog();
        let relevance = SearchRelevanceIndex::build(&items, &[3, 0]);
        let ids = sorted_ids(&items, SortState::default(), &relevance);
        assert_eq!(&ids[..2], &["shield".to_string(), "wires".to_string()]);
    }

    #[test]
    fn test_parse_sort_column() {
        assert_eq!("neededFor".parse::<SortColumn>(), Ok(SortColumn::NeededFor));
        assert_eq!("crafting_station".parse::<SortColumn>(), Ok(SortColumn::CraftingStation));
        assert_eq!("VALUE".parse::<SortColumn>(), Ok(SortColumn::Value));
        assert_eq!(
            "weight".parse::<SortColumn>(),
            Err(UnknownSortColumn("weight".to_string()))
        );
    }
}
