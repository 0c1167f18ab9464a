//! Source record shapes
//!
//! JSON shapes of the four upstream collections (items, quests, hideout
//! benches, projects). Field names and optionality match the upstream data
//! repository exactly; every optional list defaults to empty so a missing
//! field degrades to "no contribution" instead of failing the load.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language used for source labels and as the localization fallback.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Localized string table. `en` is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    #[serde(flatten)]
    pub translations: IndexMap<String, String>,
}

impl LocalizedText {
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            en: text.into(),
            translations: IndexMap::new(),
        }
    }

    /// Text in `language`, falling back to `en` when missing or blank.
    pub fn get(&self, language: &str) -> &str {
        if language == DEFAULT_LANGUAGE {
            return &self.en;
        }
        match self.translations.get(language) {
            Some(text) if !text.is_empty() => text,
            _ => &self.en,
        }
    }
}

/// Material identifier -> quantity, in source order.
pub type MaterialCosts = IndexMap<String, u32>;

/// Consumable effect: localized label plus a display value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub value: String,
    #[serde(flatten)]
    pub label: LocalizedText,
}

/// Item category. Unknown strings are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemCategory {
    Ammunition,
    AssaultRifle,
    Augment,
    BackpackCharm,
    BasicMaterial,
    BattleRifle,
    Blueprint,
    Cosmetic,
    HandCannon,
    Key,
    Lmg,
    Misc,
    Modification,
    Nature,
    Outfit,
    Pistol,
    QuickUse,
    Recyclable,
    RefinedMaterial,
    Smg,
    Shield,
    Shotgun,
    SniperRifle,
    Special,
    TopsideMaterial,
    Trinket,
    Other(String),
}

impl ItemCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ItemCategory::Ammunition => "Ammunition",
            ItemCategory::AssaultRifle => "Assault Rifle",
            ItemCategory::Augment => "Augment",
            ItemCategory::BackpackCharm => "Backpack Charm",
            ItemCategory::BasicMaterial => "Basic Material",
            ItemCategory::BattleRifle => "Battle Rifle",
            ItemCategory::Blueprint => "Blueprint",
            ItemCategory::Cosmetic => "Cosmetic",
            ItemCategory::HandCannon => "Hand Cannon",
            ItemCategory::Key => "Key",
            ItemCategory::Lmg => "LMG",
            ItemCategory::Misc => "Misc",
            ItemCategory::Modification => "Modification",
            ItemCategory::Nature => "Nature",
            ItemCategory::Outfit => "Outfit",
            ItemCategory::Pistol => "Pistol",
            ItemCategory::QuickUse => "Quick Use",
            ItemCategory::Recyclable => "Recyclable",
            ItemCategory::RefinedMaterial => "Refined Material",
            ItemCategory::Smg => "SMG",
            ItemCategory::Shield => "Shield",
            ItemCategory::Shotgun => "Shotgun",
            ItemCategory::SniperRifle => "Sniper Rifle",
            ItemCategory::Special => "Special",
            ItemCategory::TopsideMaterial => "Topside Material",
            ItemCategory::Trinket => "Trinket",
            ItemCategory::Other(name) => name,
        }
    }
}

impl From<String> for ItemCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Ammunition" => ItemCategory::Ammunition,
            "Assault Rifle" => ItemCategory::AssaultRifle,
            "Augment" => ItemCategory::Augment,
            "Backpack Charm" => ItemCategory::BackpackCharm,
            "Basic Material" => ItemCategory::BasicMaterial,
            "Battle Rifle" => ItemCategory::BattleRifle,
            "Blueprint" => ItemCategory::Blueprint,
            "Cosmetic" => ItemCategory::Cosmetic,
            "Hand Cannon" => ItemCategory::HandCannon,
            "Key" => ItemCategory::Key,
            "LMG" => ItemCategory::Lmg,
            "Misc" => ItemCategory::Misc,
            "Modification" => ItemCategory::Modification,
            "Nature" => ItemCategory::Nature,
            "Outfit" => ItemCategory::Outfit,
            "Pistol" => ItemCategory::Pistol,
            "Quick Use" => ItemCategory::QuickUse,
            "Recyclable" => ItemCategory::Recyclable,
            "Refined Material" => ItemCategory::RefinedMaterial,
            "SMG" => ItemCategory::Smg,
            "Shield" => ItemCategory::Shield,
            "Shotgun" => ItemCategory::Shotgun,
            "Sniper Rifle" => ItemCategory::SniperRifle,
            "Special" => ItemCategory::Special,
            "Topside Material" => ItemCategory::TopsideMaterial,
            "Trinket" => ItemCategory::Trinket,
            _ => ItemCategory::Other(value),
        }
    }
}

impl From<ItemCategory> for String {
    fn from(value: ItemCategory) -> Self {
        match value {
            ItemCategory::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Craft-station reference: one bench id or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CraftBench {
    Single(String),
    Multiple(Vec<String>),
}

impl CraftBench {
    /// Uniform ordered view over the referenced bench ids.
    pub fn ids(&self) -> &[String] {
        match self {
            CraftBench::Single(id) => std::slice::from_ref(id),
            CraftBench::Multiple(ids) => ids,
        }
    }
}

/// Inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(rename = "type")]
    pub category: ItemCategory,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub value: u64,
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub stack_size: u32,
    #[serde(default)]
    pub image_filename: String,
    #[serde(default)]
    pub updated_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recycles_into: Option<MaterialCosts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salvages_into: Option<MaterialCosts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<MaterialCosts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub craft_bench: Option<CraftBench>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub craft_quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<IndexMap<String, Effect>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_in: Option<String>,
}

impl Item {
    /// Bare item with every optional field unset.
    pub fn new(id: impl Into<String>, name: LocalizedText, category: ItemCategory) -> Self {
        Self {
            id: id.into(),
            name,
            description: LocalizedText::default(),
            category,
            rarity: String::new(),
            value: 0,
            weight_kg: 0.0,
            stack_size: 0,
            image_filename: String::new(),
            updated_at: String::new(),
            recycles_into: None,
            salvages_into: None,
            recipe: None,
            craft_bench: None,
            craft_quantity: None,
            effects: None,
            found_in: None,
        }
    }

    pub fn with_value(mut self, value: u64) -> Self {
        self.value = value;
        self
    }

    pub fn with_recipe<'a>(mut self, recipe: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        self.recipe = Some(to_costs(recipe));
        self
    }

    pub fn with_recycles_into<'a>(
        mut self,
        yields: impl IntoIterator<Item = (&'a str, u32)>,
    ) -> Self {
        self.recycles_into = Some(to_costs(yields));
        self
    }

    pub fn with_craft_bench(mut self, bench: CraftBench) -> Self {
        self.craft_bench = Some(bench);
        self
    }

    pub fn with_craft_quantity(mut self, quantity: u32) -> Self {
        self.craft_quantity = Some(quantity);
        self
    }

    /// Display name in `language` (falls back to `en`).
    pub fn display_name(&self, language: &str) -> &str {
        self.name.get(language)
    }

    /// Bench ids this item is crafted at, empty when not craftable.
    pub fn craft_stations(&self) -> &[String] {
        self.craft_bench.as_ref().map(CraftBench::ids).unwrap_or(&[])
    }

    /// Units produced per craft (1 when unspecified).
    pub fn output_quantity(&self) -> u32 {
        self.craft_quantity.unwrap_or(1)
    }
}

fn to_costs<'a>(entries: impl IntoIterator<Item = (&'a str, u32)>) -> MaterialCosts {
    entries
        .into_iter()
        .map(|(id, quantity)| (id.to_string(), quantity))
        .collect()
}

/// (item id, quantity) consumed by a bench level, quest, or project phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequirement {
    pub item_id: String,
    pub quantity: u32,
}

impl ItemRequirement {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HideoutLevel {
    pub level: u32,
    #[serde(default)]
    pub requirement_item_ids: Vec<ItemRequirement>,
}

/// Hideout upgrade bench
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HideoutBench {
    pub id: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub max_level: u32,
    #[serde(default)]
    pub levels: Vec<HideoutLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub trader: String,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub objectives: Vec<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_item_ids: Option<Vec<ItemRequirement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_item_ids: Option<Vec<ItemRequirement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_item_ids: Option<Vec<ItemRequirement>>,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub previous_quest_ids: Vec<String>,
    #[serde(default)]
    pub next_quest_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPhase {
    pub phase: u32,
    pub name: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,
    #[serde(default)]
    pub requirement_item_ids: Vec<ItemRequirement>,
}

/// Multi-phase project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub phases: Vec<ProjectPhase>,
}
