//! Item Requirements - reverse index of everything that consumes an item
//!
//! Folds three heterogeneous consumer collections into one lookup
//! keyed by item identifier:
//! - Hideout benches: one entry per level, labelled `"<Bench> Lvl <N>"`
//! - Quests: labelled `"Quest: <Quest>"`; quests without requirements add nothing
//! - Projects: labelled `"<Project> - <Phase>"`; "Season 1" projects are skipped
//!
//! `used_in` order is bench -> quest -> project, each in source order.
//! Requirement identifiers are not validated against the item catalog.

use crate::types::{HideoutBench, ItemRequirement, Project, Quest, DEFAULT_LANGUAGE};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Projects whose English name contains this marker are excluded.
pub const EXCLUDED_PROJECT_MARKER: &str = "Season 1";

/// One consumer of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUsage {
    /// e.g. "Gunsmith Lvl 2", "Quest: Doctor's Orders", "Expedition - Foundation"
    pub source: String,
    pub quantity: u32,
}

/// Aggregate demand for a single item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequirements {
    /// Always equals the sum of `used_in[].quantity`
    pub total_quantity: u64,
    pub used_in: Vec<ItemUsage>,
}

impl ItemRequirements {
    fn record(&mut self, source: String, quantity: u32) {
        self.total_quantity += u64::from(quantity);
        self.used_in.push(ItemUsage { source, quantity });
    }

    fn absorb(&mut self, other: ItemRequirements) {
        self.total_quantity += other.total_quantity;
        self.used_in.extend(other.used_in);
    }
}

/// Item identifier -> aggregate requirements, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemRequirementLookup {
    entries: IndexMap<String, ItemRequirements>,
}

impl ItemRequirementLookup {
    pub fn get(&self, item_id: &str) -> Option<&ItemRequirements> {
        self.entries.get(item_id)
    }

    /// Total demand for an item, 0 when nothing requires it.
    pub fn total_for(&self, item_id: &str) -> u64 {
        self.entries.get(item_id).map_or(0, |r| r.total_quantity)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.entries.contains_key(item_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemRequirements)> {
        self.entries.iter().map(|(id, req)| (id.as_str(), req))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record_all(&mut self, requirements: &[ItemRequirement], source: &str) {
        for requirement in requirements {
            self.entries
                .entry(requirement.item_id.clone())
                .or_default()
                .record(source.to_string(), requirement.quantity);
        }
    }
}

/// Build lookup from hideout bench upgrade levels
pub fn build_hideout_lookup(benches: &[HideoutBench]) -> ItemRequirementLookup {
    let mut lookup = ItemRequirementLookup::default();

    for bench in benches {
        let bench_name = bench.name.get(DEFAULT_LANGUAGE);
        for level in &bench.levels {
            let source = format!("{} Lvl {}", bench_name, level.level);
            lookup.record_all(&level.requirement_item_ids, &source);
        }
    }

    lookup
}

/// Build lookup from quest item requirements
pub fn build_quest_lookup(quests: &[Quest]) -> ItemRequirementLookup {
    let mut lookup = ItemRequirementLookup::default();

    for quest in quests {
        let Some(required) = quest.required_item_ids.as_deref() else {
            continue;
        };
        let source = format!("Quest: {}", quest.name.get(DEFAULT_LANGUAGE));
        lookup.record_all(required, &source);
    }

    lookup
}

/// Build lookup from project phases, skipping "Season 1" projects
pub fn build_project_lookup(projects: &[Project]) -> ItemRequirementLookup {
    let mut lookup = ItemRequirementLookup::default();

    for project in projects {
        let project_name = project.name.get(DEFAULT_LANGUAGE);
        if project_name.contains(EXCLUDED_PROJECT_MARKER) {
            tracing::debug!("Skipping excluded project '{}'", project_name);
            continue;
        }

        for phase in &project.phases {
            let source = format!("{} - {}", project_name, phase.name.get(DEFAULT_LANGUAGE));
            lookup.record_all(&phase.requirement_item_ids, &source);
        }
    }

    lookup
}

/// Merge lookups in order: `used_in` lists concatenate, totals add.
pub fn merge_lookups<I>(lookups: I) -> ItemRequirementLookup
where
    I: IntoIterator<Item = ItemRequirementLookup>,
{
    let mut merged = ItemRequirementLookup::default();

    for lookup in lookups {
        for (item_id, requirements) in lookup.entries {
            merged.entries.entry(item_id).or_default().absorb(requirements);
        }
    }

    merged
}

/// Complete requirement lookup: hideout upgrades, then quests, then projects.
pub fn get_item_requirements(
    benches: &[HideoutBench],
    quests: &[Quest],
    projects: &[Project],
) -> ItemRequirementLookup {
    let start = std::time::Instant::now();

    let lookup = merge_lookups([
        build_hideout_lookup(benches),
        build_quest_lookup(quests),
        build_project_lookup(projects),
    ]);

    tracing::debug!(
        "Aggregated requirements for {} items in {:?}",
        lookup.len(),
        start.elapsed()
    );
    lookup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HideoutLevel, LocalizedText, ProjectPhase};

    fn bench(name: &str, levels: Vec<(u32, Vec<ItemRequirement>)>) -> HideoutBench {
        HideoutBench {
            id: name.to_lowercase(),
            name: LocalizedText::english(name),
            max_level: levels.len() as u32,
            levels: levels
                .into_iter()
                .map(|(level, reqs)| HideoutLevel {
                    level,
                    requirement_item_ids: reqs,
                })
                .collect(),
        }
    }

    fn quest(name: &str, required: Option<Vec<ItemRequirement>>) -> Quest {
        Quest {
            id: name.to_lowercase(),
            name: LocalizedText::english(name),
            updated_at: String::new(),
            trader: "Shani".to_string(),
            description: LocalizedText::default(),
            objectives: Vec::new(),
            required_item_ids: required,
            granted_item_ids: None,
            reward_item_ids: None,
            xp: 0,
            previous_quest_ids: Vec::new(),
            next_quest_ids: Vec::new(),
        }
    }

    fn project(name: &str, phases: Vec<(&str, Vec<ItemRequirement>)>) -> Project {
        Project {
            id: name.to_lowercase(),
            name: LocalizedText::english(name),
            description: LocalizedText::default(),
            phases: phases
                .into_iter()
                .enumerate()
                .map(|(i, (phase_name, reqs))| ProjectPhase {
                    phase: i as u32 + 1,
                    name: LocalizedText::english(phase_name),
                    description: None,
                    requirement_item_ids: reqs,
                })
                .collect(),
        }
    }

    fn req(id: &str, quantity: u32) -> ItemRequirement {
        ItemRequirement::new(id, quantity)
    }

    fn assert_totals_consistent(lookup: &ItemRequirementLookup) {
        for (id, entry) in lookup.iter() {
            let sum: u64 = entry.used_in.iter().map(|u| u64::from(u.quantity)).sum();
            assert_eq!(entry.total_quantity, sum, "total mismatch for {}", id);
        }
    }

    #[test]
    fn test_empty_inputs_give_empty_lookup() {
        let lookup = get_item_requirements(&[], &[], &[]);
        assert!(lookup.is_empty());
        assert_eq!(serde_json::to_string(&lookup).unwrap(), "{}");
    }

    #[test]
    fn test_used_in_order_is_bench_quest_project() {
        let benches = vec![bench(
            "Gunsmith",
            vec![(1, vec![req("metal_parts", 20)]), (2, vec![req("metal_parts", 30)])],
        )];
        let quests = vec![quest("Trash Into Treasure", Some(vec![req("metal_parts", 5)]))];
        let projects = vec![project(
            "Expedition",
            vec![("Foundation", vec![req("metal_parts", 150)])],
        )];

        let lookup = get_item_requirements(&benches, &quests, &projects);
        let entry = lookup.get("metal_parts").unwrap();

        let sources: Vec<&str> = entry.used_in.iter().map(|u| u.source.as_str()).collect();
        assert_eq!(
            sources,
            vec![
                "Gunsmith Lvl 1",
                "Gunsmith Lvl 2",
                "Quest: Trash Into Treasure",
                "Expedition - Foundation",
            ]
        );
        assert_eq!(entry.total_quantity, 205);
        assert_totals_consistent(&lookup);
    }

    #[test]
    fn test_season_one_project_excluded() {
        let projects = vec![
            project("Foo Season 1 Bar", vec![("Phase A", vec![req("wires", 10)])]),
            project("Weather Monitor", vec![("Phase B", vec![req("battery", 3)])]),
        ];

        let lookup = build_project_lookup(&projects);
        assert!(!lookup.contains("wires"));
        assert_eq!(lookup.total_for("battery"), 3);
    }

    #[test]
    fn test_quest_without_requirements_contributes_nothing() {
        let quests = vec![
            quest("Picking Up The Pieces", None),
            quest("Empty List", Some(Vec::new())),
        ];
        assert!(build_quest_lookup(&quests).is_empty());
    }

    #[test]
    fn test_unknown_item_ids_are_retained() {
        let quests = vec![quest("Mystery", Some(vec![req("does_not_exist", 1)]))];
        let lookup = build_quest_lookup(&quests);
        assert_eq!(lookup.total_for("does_not_exist"), 1);
        assert_eq!(lookup.total_for("never_mentioned"), 0);
    }

    #[test]
    fn test_merge_sums_across_sources_and_keys() {
        let benches = vec![
            bench("Refiner", vec![(1, vec![req("wires", 5), req("battery", 2)])]),
            bench("Scrappy", vec![(2, vec![req("wires", 1)])]),
        ];
        let quests = vec![quest("Power Out", Some(vec![req("battery", 4)]))];

        let lookup = get_item_requirements(&benches, &quests, &[]);
        assert_eq!(lookup.total_for("wires"), 6);
        assert_eq!(lookup.total_for("battery"), 6);
        assert_eq!(lookup.get("wires").unwrap().used_in.len(), 2);
        assert_totals_consistent(&lookup);
    }

    #[test]
    fn test_serialized_shape() {
        let quests = vec![quest("Power Out", Some(vec![req("battery", 4)]))];
        let json = serde_json::to_value(build_quest_lookup(&quests)).unwrap();
        assert_eq!(json["battery"]["totalQuantity"], 4);
        assert_eq!(json["battery"]["usedIn"][0]["source"], "Quest: Power Out");
        assert_eq!(json["battery"]["usedIn"][0]["quantity"], 4);
    }
}
