//! Item category constants and catalog blacklists
//!
//! - `ITEM_CATEGORIES`: every known category, alphabetical
//! - `BLACKLISTED_ITEM_CATEGORIES`: hidden from the category filter
//! - `BLACKLISTED_ITEMS`: identifiers dropped from the catalog on load

use crate::types::{Item, ItemCategory};
use rustc_hash::FxHashSet;

/// Set of categories a table view includes.
pub type CategorySet = FxHashSet<ItemCategory>;

pub const ITEM_CATEGORIES: [ItemCategory; 26] = [
    ItemCategory::Ammunition,
    ItemCategory::AssaultRifle,
    ItemCategory::Augment,
    ItemCategory::BackpackCharm,
    ItemCategory::BasicMaterial,
    ItemCategory::BattleRifle,
    ItemCategory::Blueprint,
    ItemCategory::Cosmetic,
    ItemCategory::HandCannon,
    ItemCategory::Key,
    ItemCategory::Lmg,
    ItemCategory::Misc,
    ItemCategory::Modification,
    ItemCategory::Nature,
    ItemCategory::Outfit,
    ItemCategory::Pistol,
    ItemCategory::QuickUse,
    ItemCategory::Recyclable,
    ItemCategory::RefinedMaterial,
    ItemCategory::Smg,
    ItemCategory::Shield,
    ItemCategory::Shotgun,
    ItemCategory::SniperRifle,
    ItemCategory::Special,
    ItemCategory::TopsideMaterial,
    ItemCategory::Trinket,
];

/// Categories that are not relevant to recycling and never offered as filters.
pub const BLACKLISTED_ITEM_CATEGORIES: [ItemCategory; 5] = [
    ItemCategory::Key,
    ItemCategory::Blueprint,
    ItemCategory::Cosmetic,
    ItemCategory::BackpackCharm,
    ItemCategory::Outfit,
];

pub static BLACKLISTED_ITEMS: &[&str] = &[
    "backpack_black_hiker_color",
    "cans_backpack_attachment",
    "banana",
    "blue_radio_renegade_color",
    "blue_gate_cellar_key",
    "blue_gate_communication_tower_key",
    "blue_gate_confiscation_room_key",
    "blue_gate_village_key",
    "buried_city_residential_master_key",
    "buried_city_town_hall_key",
    "buried_city_hospital_key",
    "dam_control_tower_key",
    "dam_staff_room_key",
    "dam_surveillance_key",
    "dam_testing_annex_key",
    "dam_utility_key",
    "flushing_terminal_key",
    "patrol_car_key",
    "raider_hatch_key",
    "spaceport_container_storage_key",
    "spaceport_control_tower_key",
    "spaceport_trench_tower_key",
    "spaceport_warehouse_key",
    "stella_montis_archives_key",
    "stella_montis_assembly_admin_key",
    "stella_montis_medical_storage_key",
    "stella_montis_security_checkpoint_key",
    "angled_grip_ii_blueprint",
    "angled_grip_iii_blueprint",
    "anvil_blueprint",
    "aphelion_blueprint",
    "barricade_kit_blueprint",
    "bettina_blueprint",
    "blaze_grenade_blueprint",
    "blue_light_stick_blueprint",
    "bobcat_blueprint",
    "burletta_blueprint",
    "combat_mk3_aggressive_blueprint",
    "combat_mk3_flanking_blueprint",
    "compensator_ii_blueprint",
    "compensator_iii_blueprint",
    "complex_gun_parts_blueprint",
    "deadline_blueprint",
    "defibrillator_blueprint",
    "equalizer_blueprint",
    "explosive_mine_blueprint",
    "extended_barrel_blueprint",
    "extended_light_mag_ii_blueprint",
    "extended_light_mag_iii_blueprint",
    "extended_medium_mag_ii_blueprint",
    "extended_medium_mag_iii_blueprint",
    "extended_shotgun_mag_ii_blueprint",
    "extended_shotgun_mag_iii_blueprint",
    "fireworks_box_blueprint",
    "gas_mine_blueprint",
    "green_light_stick_blueprint",
    "heavy_gun_parts_blueprint",
    "horizontal_grip_blueprint",
    "hullcracker_blueprint",
    "il_toro_blueprint",
    "jolt_mine_blueprint",
    "jupiter_blueprint",
    "light_gun_parts_blueprint",
    "lightweight_stock_blueprint",
    "looting_mk3_survivor_blueprint",
    "lure_grenade_blueprint",
    "medium_gun_parts_blueprint",
    "muzzle_brake_ii_blueprint",
    "muzzle_brake_iii_blueprint",
    "osprey_blueprint",
    "padded_stock_blueprint",
    "pulse_mine_blueprint",
    "red_light_stick_blueprint",
    "remote_raider_flare_blueprint",
    "seeker_grenade_blueprint",
    "shotgun_choke_ii_blueprint",
    "shotgun_choke_iii_blueprint",
    "shotgun_silencer_blueprint",
    "showstopper_blueprint",
    "silencer_i_blueprint",
    "silencer_ii_blueprint",
    "smoke_grenade_blueprint",
    "snap_hook_blueprint",
    "stable_stock_ii_blueprint",
    "stable_stock_iii_blueprint",
    "tactical_mk3_defensive_blueprint",
    "tactical_mk3_healing_blueprint",
    "tagging_grenade_blueprint",
    "tempest_blueprint",
    "torrente_blueprint",
    "trailblazer_blueprint",
    "trigger_nade_blueprint",
    "venator_blueprint",
    "vertical_grip_ii_blueprint",
    "vertical_grip_iii_blueprint",
    "vita_shot_blueprint",
    "vita_spray_blueprint",
    "vulcano_blueprint",
    "wolfpack_blueprint",
    "yellow_light_stick_blueprint",
    "cheer",
    "junior_outfit",
    "burgerboy",
    "celeste_journal",
    "esr_analyzer",
    "experimental_seed_sample",
    "first_wave_compass",
    "first_wave_rations",
    "first_wave_tape",
    "lidar_scanner",
    "major_aivas_patch",
    "radio_renegade",
];

/// Categories offered in the filter UI: all known minus the blacklist.
pub fn filterable_categories() -> Vec<ItemCategory> {
    ITEM_CATEGORIES
        .iter()
        .filter(|c| !BLACKLISTED_ITEM_CATEGORIES.contains(c))
        .cloned()
        .collect()
}

/// Default inclusion set for a fresh table view.
pub fn default_category_set() -> CategorySet {
    filterable_categories().into_iter().collect()
}

/// Parse a comma-separated list of category names ("Pistol,Quick Use").
///
/// Blank entries are skipped; unknown names are kept as `Other`.
pub fn parse_category_list(raw: &str) -> CategorySet {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| ItemCategory::from(s.to_string()))
        .collect()
}

pub fn is_blacklisted_item(item_id: &str) -> bool {
    BLACKLISTED_ITEMS.contains(&item_id)
}

/// Drop blacklisted identifiers, preserving catalog order.
pub fn filter_blacklisted_items(items: Vec<Item>) -> Vec<Item> {
    let before = items.len();
    let kept: Vec<Item> = items
        .into_iter()
        .filter(|item| !is_blacklisted_item(&item.id))
        .collect();

    tracing::debug!("Blacklist removed {} of {} items", before - kept.len(), before);
    kept
}
