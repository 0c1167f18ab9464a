//! Catalog - one loaded dataset plus its memoized derived artifacts
//!
//! Every source collection carries a generation number that changes
//! whenever the collection is replaced. Each derived artifact is keyed
//! on the generations it reads:
//!
//! | Artifact | Depends on |
//! |---|---|
//! | requirement lookup | benches, quests, projects |
//! | bench names | benches |
//! | sorted materials | items |
//! | sort keys | items, benches, quests, projects |
//! | filter result | items, search term, category set |
//!
//! Artifacts are handed out as `Arc` snapshots; a reload swaps the
//! dataset wholesale and the next access rebuilds.

use crate::categories::{filter_blacklisted_items, CategorySet};
use crate::loader::{DataSource, Dataset, LoadError};
use crate::memo::Memo;
use crate::profit::{calculate_crafting_profit, index_items, profitable_items, CraftingProfit};
use crate::requirements::{get_item_requirements, ItemRequirementLookup, ItemRequirements};
use crate::search::{filter, FilterResult, ItemCounts, TableRows};
use crate::sorting::{sort_rows, SortState};
use crate::table_cache::{
    BenchNameLookup, CachedMaterial, ImageResolver, MaterialRole, NoImages, SortKeyCache,
    SortedMaterialsCache,
};
use crate::types::{HideoutBench, Item, Project, Quest, DEFAULT_LANGUAGE};
use crate::utils::naming::wiki_url;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Generations {
    items: u64,
    quests: u64,
    benches: u64,
    projects: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct FilterKey {
    items: u64,
    term: String,
    categories: CategorySet,
}

/// Number of times each artifact has been built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildCounts {
    pub requirements: u64,
    pub bench_names: u64,
    pub sorted_materials: u64,
    pub sort_keys: u64,
    pub filter: u64,
}

/// Table request: search term, category inclusion set, sort order
#[derive(Debug, Clone)]
pub struct TableQuery {
    pub search: String,
    pub categories: CategorySet,
    pub sort: SortState,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            categories: crate::categories::default_category_set(),
            sort: SortState::default(),
        }
    }
}

/// One rendered table row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub item: Item,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    pub recycles_into: Vec<CachedMaterial>,
    pub crafting_materials: Vec<CachedMaterial>,
    pub crafting_station: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needed_for: Option<ItemRequirements>,
    pub is_placeholder: bool,
}

impl TableRow {
    /// The "no results" row: message only, every other column blank.
    fn placeholder(item: &Item) -> Self {
        Self {
            item: item.clone(),
            display_name: item.name.en.clone(),
            image: None,
            wiki_url: None,
            recycles_into: Vec::new(),
            crafting_materials: Vec::new(),
            crafting_station: String::new(),
            needed_for: None,
            is_placeholder: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub rows: Vec<TableRow>,
    pub counts: ItemCounts,
}

pub struct Catalog {
    dataset: Dataset,
    positions: FxHashMap<String, usize>,
    generations: Generations,
    next_generation: u64,
    language: String,
    images: Arc<dyn ImageResolver>,

    requirements: Memo<(u64, u64, u64), ItemRequirementLookup>,
    bench_names: Memo<u64, BenchNameLookup>,
    sorted_materials: Memo<u64, SortedMaterialsCache>,
    sort_keys: Memo<Generations, SortKeyCache>,
    filter: Memo<FilterKey, FilterResult>,
}

impl Catalog {
    /// Wrap a loaded dataset. Blacklisted items are dropped here.
    pub fn new(dataset: Dataset) -> Self {
        let mut catalog = Self {
            dataset: Dataset::default(),
            positions: FxHashMap::default(),
            generations: Generations::default(),
            next_generation: 0,
            language: DEFAULT_LANGUAGE.to_string(),
            images: Arc::new(NoImages),
            requirements: Memo::new(),
            bench_names: Memo::new(),
            sorted_materials: Memo::new(),
            sort_keys: Memo::new(),
            filter: Memo::new(),
        };
        catalog.replace_dataset(dataset);
        catalog
    }

    /// Load from a source; fails as a whole, never with partial data.
    pub fn load(source: &dyn DataSource) -> Result<Self, LoadError> {
        Ok(Self::new(source.load()?))
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.set_language(language);
        self
    }

    pub fn with_images(mut self, images: Arc<dyn ImageResolver>) -> Self {
        self.set_images(images);
        self
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
        self.invalidate_all();
        self.bump();
    }

    pub fn set_images(&mut self, images: Arc<dyn ImageResolver>) {
        self.images = images;
        self.sorted_materials.invalidate();
        self.bump();
    }

    /// Changes on every replacement or setting change; anything derived
    /// from the catalog outside it should be keyed on this.
    pub fn revision(&self) -> u64 {
        self.next_generation
    }

    fn bump(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    fn invalidate_all(&mut self) {
        self.requirements.invalidate();
        self.bench_names.invalidate();
        self.sorted_materials.invalidate();
        self.sort_keys.invalidate();
        self.filter.invalidate();
    }

    // ========================================================================
    // Source collections
    // ========================================================================

    pub fn items(&self) -> &[Item] {
        &self.dataset.items
    }

    pub fn quests(&self) -> &[Quest] {
        &self.dataset.quests
    }

    pub fn hideout_benches(&self) -> &[HideoutBench] {
        &self.dataset.hideout_benches
    }

    pub fn projects(&self) -> &[Project] {
        &self.dataset.projects
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.positions.get(item_id).map(|&index| &self.dataset.items[index])
    }

    pub fn replace_items(&mut self, items: Vec<Item>) {
        self.dataset.items = filter_blacklisted_items(items);
        self.positions = self
            .dataset
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id.clone(), index))
            .collect();
        self.generations.items = self.bump();
    }

    pub fn replace_quests(&mut self, quests: Vec<Quest>) {
        self.dataset.quests = quests;
        self.generations.quests = self.bump();
    }

    pub fn replace_hideout_benches(&mut self, benches: Vec<HideoutBench>) {
        self.dataset.hideout_benches = benches;
        self.generations.benches = self.bump();
    }

    pub fn replace_projects(&mut self, projects: Vec<Project>) {
        self.dataset.projects = projects;
        self.generations.projects = self.bump();
    }

    /// Swap every collection at once.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        let Dataset {
            items,
            quests,
            hideout_benches,
            projects,
        } = dataset;
        self.replace_items(items);
        self.replace_quests(quests);
        self.replace_hideout_benches(hideout_benches);
        self.replace_projects(projects);
    }

    /// Refetch from `source`. On failure the current dataset is kept.
    pub fn reload(&mut self, source: &dyn DataSource) -> Result<(), LoadError> {
        let dataset = source.refresh()?;
        self.replace_dataset(dataset);
        tracing::info!("Catalog reloaded: {} items", self.dataset.items.len());
        Ok(())
    }

    // ========================================================================
    // Derived artifacts
    // ========================================================================

    pub fn requirements(&mut self) -> Arc<ItemRequirementLookup> {
        let g = self.generations;
        let dataset = &self.dataset;
        self.requirements.get_or_rebuild((g.benches, g.quests, g.projects), || {
            get_item_requirements(&dataset.hideout_benches, &dataset.quests, &dataset.projects)
        })
    }

    pub fn bench_names(&mut self) -> Arc<BenchNameLookup> {
        let benches = &self.dataset.hideout_benches;
        let language = &self.language;
        self.bench_names.get_or_rebuild(self.generations.benches, || {
            BenchNameLookup::build(benches, language)
        })
    }

    pub fn sorted_materials(&mut self) -> Arc<SortedMaterialsCache> {
        let items = &self.dataset.items;
        let images = Arc::clone(&self.images);
        self.sorted_materials.get_or_rebuild(self.generations.items, || {
            SortedMaterialsCache::build(items, images.as_ref())
        })
    }

    pub fn sort_keys(&mut self) -> Arc<SortKeyCache> {
        let bench_names = self.bench_names();
        let requirements = self.requirements();
        let items = &self.dataset.items;
        let language = &self.language;
        self.sort_keys.get_or_rebuild(self.generations, || {
            SortKeyCache::build(items, &bench_names, &requirements, language)
        })
    }

    /// Search + category filter, memoized on (items, term, categories).
    pub fn filtered(&mut self, term: &str, categories: &CategorySet) -> Arc<FilterResult> {
        let key = FilterKey {
            items: self.generations.items,
            term: term.to_string(),
            categories: categories.clone(),
        };
        let items = &self.dataset.items;
        let language = &self.language;
        self.filter
            .get_or_rebuild(key, || filter(items, term, categories, language))
    }

    pub fn rebuild_counts(&self) -> RebuildCounts {
        RebuildCounts {
            requirements: self.requirements.rebuild_count(),
            bench_names: self.bench_names.rebuild_count(),
            sorted_materials: self.sorted_materials.rebuild_count(),
            sort_keys: self.sort_keys.rebuild_count(),
            filter: self.filter.rebuild_count(),
        }
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Filtered, sorted rows with every display field resolved from the caches.
    pub fn table_view(&mut self, query: &TableQuery) -> TableView {
        let result = self.filtered(&query.search, &query.categories);
        let keys = self.sort_keys();
        let materials = self.sorted_materials();
        let bench_names = self.bench_names();
        let requirements = self.requirements();

        let table = TableRows::from_filter(&self.dataset.items, &result, &query.search);
        let is_placeholder = matches!(table, TableRows::NoResults(_));
        let mut rows = table.rows();
        if !is_placeholder {
            sort_rows(&mut rows, query.sort, &keys, &result.relevance);
        }

        let rows = rows
            .into_iter()
            .map(|item| {
                if is_placeholder {
                    return TableRow::placeholder(item);
                }
                TableRow {
                    item: item.clone(),
                    display_name: item.display_name(&self.language).to_string(),
                    image: self.images.item_image(item),
                    wiki_url: wiki_url(&item.id),
                    recycles_into: materials
                        .get(MaterialRole::Recycle, &item.id)
                        .map(<[CachedMaterial]>::to_vec)
                        .unwrap_or_default(),
                    crafting_materials: materials
                        .get(MaterialRole::Recipe, &item.id)
                        .map(<[CachedMaterial]>::to_vec)
                        .unwrap_or_default(),
                    crafting_station: bench_names.bench_label(item),
                    needed_for: requirements.get(&item.id).cloned(),
                    is_placeholder: false,
                }
            })
            .collect();

        TableView {
            rows,
            counts: ItemCounts {
                filtered: table.filtered_count(),
                total: self.dataset.items.len(),
            },
        }
    }

    /// Profit breakdown for one item, `None` when it cannot be priced.
    pub fn crafting_profit(&self, item_id: &str) -> Option<CraftingProfit<'_>> {
        let item = self.item(item_id)?;
        let index = index_items(&self.dataset.items);
        calculate_crafting_profit(item, &index)
    }

    /// Items with positive crafting profit, highest first.
    pub fn profitable_items(&self) -> Vec<CraftingProfit<'_>> {
        let index = index_items(&self.dataset.items);
        profitable_items(&self.dataset.items, &index)
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("items", &self.dataset.items.len())
            .field("quests", &self.dataset.quests.len())
            .field("hideout_benches", &self.dataset.hideout_benches.len())
            .field("projects", &self.dataset.projects.len())
            .field("language", &self.language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::default_category_set;
    use crate::loader::StaticSource;
    use crate::sorting::SortColumn;
    use crate::types::{CraftBench, HideoutLevel, ItemCategory, ItemRequirement, LocalizedText};

    fn dataset() -> Dataset {
        Dataset {
            items: vec![
                Item::new("wires", LocalizedText::english("Wires"), ItemCategory::BasicMaterial)
                    .with_value(50),
                Item::new("battery", LocalizedText::english("Battery"), ItemCategory::BasicMaterial)
                    .with_value(100),
                Item::new("radio", LocalizedText::english("Broken Radio"), ItemCategory::Recyclable)
                    .with_value(400)
                    .with_recycles_into([("wires", 3), ("battery", 1)]),
                Item::new("shocker", LocalizedText::english("Shocker"), ItemCategory::QuickUse)
                    .with_value(500)
                    .with_recipe([("battery", 2), ("wires", 1)])
                    .with_craft_bench(CraftBench::Single("workbench".into())),
                Item::new("banana", LocalizedText::english("Banana"), ItemCategory::Nature),
            ],
            quests: Vec::new(),
            hideout_benches: vec![HideoutBench {
                id: "workbench".into(),
                name: LocalizedText::english("Workbench"),
                max_level: 1,
                levels: vec![HideoutLevel {
                    level: 1,
                    requirement_item_ids: vec![ItemRequirement::new("wires", 10)],
                }],
            }],
            projects: Vec::new(),
        }
    }

    #[test]
    fn test_blacklisted_items_dropped_on_load() {
        let catalog = Catalog::load(&StaticSource::new(dataset())).unwrap();
        assert_eq!(catalog.items().len(), 4);
        assert!(catalog.item("banana").is_none());
        assert!(catalog.item("radio").is_some());
    }

    #[test]
    fn test_artifacts_memoized_until_dependency_changes() {
        let mut catalog = Catalog::new(dataset());

        let first = catalog.sort_keys();
        let second = catalog.sort_keys();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.rebuild_counts().requirements, 1);
        assert_eq!(catalog.rebuild_counts().sort_keys, 1);

        // Quests feed requirements and sort keys but not bench names
        catalog.replace_quests(Vec::new());
        catalog.sort_keys();
        let counts = catalog.rebuild_counts();
        assert_eq!(counts.requirements, 2);
        assert_eq!(counts.sort_keys, 2);
        assert_eq!(counts.bench_names, 1);
    }

    #[test]
    fn test_filter_memoized_per_term() {
        let mut catalog = Catalog::new(dataset());
        let categories = default_category_set();

        catalog.filtered("wire", &categories);
        catalog.filtered("wire", &categories);
        assert_eq!(catalog.rebuild_counts().filter, 1);

        let result = catalog.filtered("batt", &categories);
        assert_eq!(catalog.rebuild_counts().filter, 2);

        // "Battery" by name, "Broken Radio" through its recycled battery
        let ids: Vec<&str> = result
            .indices
            .iter()
            .map(|&i| catalog.items()[i].id.as_str())
            .collect();
        assert_eq!(ids, vec!["battery", "radio"]);
    }

    #[test]
    fn test_table_view_rows_and_counts() {
        let mut catalog = Catalog::new(dataset());
        let query = TableQuery {
            sort: SortState::new(SortColumn::Value, true),
            ..TableQuery::default()
        };

        let view = catalog.table_view(&query);
        assert_eq!(view.counts, ItemCounts { filtered: 4, total: 4 });

        let ids: Vec<&str> = view.rows.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(ids, vec!["shocker", "radio", "battery", "wires"]);

        let radio = &view.rows[1];
        let names: Vec<&str> = radio.recycles_into.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Battery", "Wires"]);

        let shocker = &view.rows[0];
        assert_eq!(shocker.crafting_station, "Workbench");

        let wires = &view.rows[3];
        assert_eq!(wires.needed_for.as_ref().map(|r| r.total_quantity), Some(10));
        assert_eq!(wires.wiki_url.as_deref(), Some("https://arcraiders.wiki/wiki/Wires"));
    }

    #[test]
    fn test_table_view_placeholder() {
        let mut catalog = Catalog::new(dataset());
        let query = TableQuery {
            search: "plutonium".into(),
            ..TableQuery::default()
        };

        let view = catalog.table_view(&query);
        assert_eq!(view.rows.len(), 1);
        assert!(view.rows[0].is_placeholder);
        assert_eq!(view.counts, ItemCounts { filtered: 0, total: 4 });
    }

    #[test]
    fn test_profitable_items() {
        let catalog = Catalog::new(dataset());
        let profitable = catalog.profitable_items();
        assert_eq!(profitable.len(), 1);
        assert_eq!(profitable[0].item.id, "shocker");
        // 500 - (2 * 100 + 50)
        assert_eq!(profitable[0].profit, 250);
        assert!(catalog.crafting_profit("wires").is_none());
    }

    #[test]
    fn test_revision_tracks_every_change() {
        let mut catalog = Catalog::new(dataset());
        let loaded = catalog.revision();

        catalog.table_view(&TableQuery::default());
        assert_eq!(catalog.revision(), loaded);

        catalog.replace_dataset(dataset());
        let reloaded = catalog.revision();
        assert!(reloaded > loaded);

        catalog.set_language("de");
        assert!(catalog.revision() > reloaded);
    }

    #[test]
    fn test_reload_keeps_data_on_failure() {
        struct Failing;
        impl DataSource for Failing {
            fn load(&self) -> Result<Dataset, LoadError> {
                Err(LoadError::MissingCollection {
                    collection: "items",
                    path: "nowhere".into(),
                })
            }
        }

        let mut catalog = Catalog::new(dataset());
        assert!(catalog.reload(&Failing).is_err());
        assert_eq!(catalog.items().len(), 4);

        catalog.reload(&StaticSource::new(Dataset::default())).unwrap();
        assert!(catalog.items().is_empty());
    }
}
