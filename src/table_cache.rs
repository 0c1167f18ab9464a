//! Table Cache - precomputed display and sort data for the item table
//!
//! Hoists all per-row formatting out of the sort path. Built once per
//! dataset load; any change to items, benches or requirements means a
//! full rebuild (see `memo`).
//!
//! Artifacts:
//! - `BenchNameLookup`: bench id -> display name, with the field-crafting override
//! - `SortedMaterialsCache`: per item, recycle/recipe materials sorted by display name
//! - `SortKeyCache`: per item, lowercase name, joined bench label, requirement total

use crate::requirements::ItemRequirementLookup;
use crate::types::{HideoutBench, Item};
use crate::utils::compare::compare_strings;
use crate::utils::naming::display_label;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Craft-bench id for crafting in the field (during a mission).
pub const FIELD_CRAFTING_ID: &str = "in_raid";
pub const FIELD_CRAFTING_LABEL: &str = "Field Crafting";

// ============================================================================
// Image resolution
// ============================================================================

/// Identifier -> image reference. Total: absence is `None`, never an error.
pub trait ImageResolver: Send + Sync {
    fn material_image(&self, material_id: &str) -> Option<String>;

    fn item_image(&self, item: &Item) -> Option<String> {
        self.material_image(&item.id)
    }
}

/// Resolves images against a raw-content base URL (`<base>/images/items/<file>`).
#[derive(Debug, Clone)]
pub struct UrlImageResolver {
    base_url: String,
}

impl UrlImageResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn image_url(&self, file_name: &str) -> String {
        format!("{}/images/items/{}", self.base_url, file_name)
    }
}

impl ImageResolver for UrlImageResolver {
    fn material_image(&self, material_id: &str) -> Option<String> {
        if material_id.is_empty() {
            return None;
        }
        Some(self.image_url(&format!("{}.png", material_id)))
    }

    /// Prefers the file name at the end of `imageFilename`, else `<id>.png`.
    fn item_image(&self, item: &Item) -> Option<String> {
        match item.image_filename.rsplit('/').next() {
            Some(file_name) if !file_name.is_empty() => Some(self.image_url(file_name)),
            _ => self.material_image(&item.id),
        }
    }
}

/// Resolver that never produces an image.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn material_image(&self, _material_id: &str) -> Option<String> {
        None
    }
}

// ============================================================================
// Bench names
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct BenchNameLookup {
    names: FxHashMap<String, String>,
}

impl BenchNameLookup {
    /// Bench records first, then the field-crafting override (which always wins).
    pub fn build(benches: &[HideoutBench], language: &str) -> Self {
        let mut names: FxHashMap<String, String> = benches
            .iter()
            .map(|bench| {
                let name = bench.name.get(language);
                let name = if name.is_empty() { bench.id.as_str() } else { name };
                (bench.id.clone(), name.to_string())
            })
            .collect();

        names.insert(FIELD_CRAFTING_ID.to_string(), FIELD_CRAFTING_LABEL.to_string());

        Self { names }
    }

    pub fn get(&self, bench_id: &str) -> Option<&str> {
        self.names.get(bench_id).map(String::as_str)
    }

    /// Display name, falling back to the raw id for unknown benches.
    pub fn label<'a>(&'a self, bench_id: &'a str) -> &'a str {
        self.get(bench_id).unwrap_or(bench_id)
    }

    /// All of an item's benches joined with `", "`; empty when not craftable.
    pub fn bench_label(&self, item: &Item) -> String {
        item.craft_stations()
            .iter()
            .map(|id| self.label(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// Sorted materials
// ============================================================================

/// Material line ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedMaterial {
    pub material: String,
    pub quantity: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Which material list of an item a cache entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRole {
    Recycle,
    Recipe,
}

impl MaterialRole {
    pub fn prefix(self) -> &'static str {
        match self {
            MaterialRole::Recycle => "recycle",
            MaterialRole::Recipe => "recipe",
        }
    }

    /// Composite cache key, e.g. `recycle_battery`
    pub fn cache_key(self, item_id: &str) -> String {
        format!("{}_{}", self.prefix(), item_id)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SortedMaterialsCache {
    entries: FxHashMap<String, Vec<CachedMaterial>>,
}

impl SortedMaterialsCache {
    pub fn build(items: &[Item], images: &dyn ImageResolver) -> Self {
        let start = std::time::Instant::now();
        let mut entries = FxHashMap::default();

        for item in items {
            let roles = [
                (MaterialRole::Recycle, item.recycles_into.as_ref()),
                (MaterialRole::Recipe, item.recipe.as_ref()),
            ];

            for (role, materials) in roles {
                let Some(materials) = materials.filter(|m| !m.is_empty()) else {
                    continue;
                };

                let mut cached: Vec<CachedMaterial> = materials
                    .iter()
                    .map(|(material, &quantity)| CachedMaterial {
                        material: material.clone(),
                        quantity,
                        name: display_label(material),
                        image: images.material_image(material),
                    })
                    .collect();
                cached.sort_by(|a, b| compare_strings(&a.name, &b.name));

                entries.insert(role.cache_key(&item.id), cached);
            }
        }

        tracing::debug!(
            "Built sorted materials cache: {} entries in {:?}",
            entries.len(),
            start.elapsed()
        );
        Self { entries }
    }

    pub fn get(&self, role: MaterialRole, item_id: &str) -> Option<&[CachedMaterial]> {
        self.entries.get(&role.cache_key(item_id)).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Sort keys
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKeyCache {
    pub name_sort_keys: FxHashMap<String, String>,
    pub bench_sort_keys: FxHashMap<String, String>,
    pub requirement_totals: FxHashMap<String, u64>,
}

impl SortKeyCache {
    pub fn build(
        items: &[Item],
        bench_names: &BenchNameLookup,
        requirements: &ItemRequirementLookup,
        language: &str,
    ) -> Self {
        let start = std::time::Instant::now();
        let mut cache = Self {
            name_sort_keys: FxHashMap::with_capacity_and_hasher(items.len(), Default::default()),
            bench_sort_keys: FxHashMap::with_capacity_and_hasher(
                items.len(),
                Default::default(),
            ),
            requirement_totals: FxHashMap::with_capacity_and_hasher(
                items.len(),
                Default::default(),
            ),
        };

        for item in items {
            cache
                .name_sort_keys
                .insert(item.id.clone(), item.display_name(language).to_lowercase());
            cache
                .bench_sort_keys
                .insert(item.id.clone(), bench_names.bench_label(item));
            cache
                .requirement_totals
                .insert(item.id.clone(), requirements.total_for(&item.id));
        }

        tracing::debug!("Built sort keys for {} items in {:?}", items.len(), start.elapsed());
        cache
    }

    pub fn name_key(&self, item_id: &str) -> &str {
        self.name_sort_keys.get(item_id).map_or("", String::as_str)
    }

    pub fn bench_key(&self, item_id: &str) -> &str {
        self.bench_sort_keys.get(item_id).map_or("", String::as_str)
    }

    pub fn requirement_total(&self, item_id: &str) -> u64 {
        self.requirement_totals.get(item_id).copied().unwrap_or(0)
    }
}
