//! Crafting profitability
//!
//! For each item with a recipe: output value (value x craft quantity)
//! against input cost (sum of material value x quantity).
//!
//! A recipe material missing from the catalog makes the whole item
//! unpriceable; it is reported with `tracing::warn!` and skipped, never
//! estimated. Margin is `profit / cost * 100` with no guard, so a
//! zero-cost recipe yields an infinite (or NaN) margin.
//!
//! Values whose products or difference leave the `u64`/`i64` range are
//! treated as unpriceable as well.

use crate::types::Item;
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

/// Catalog index: item id -> item
pub type ItemIndex<'a> = FxHashMap<&'a str, &'a Item>;

pub fn index_items(items: &[Item]) -> ItemIndex<'_> {
    items.iter().map(|item| (item.id.as_str(), item)).collect()
}

/// One recipe line priced against the catalog
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient<'a> {
    pub item: &'a Item,
    pub quantity: u32,
    pub total_value: u64,
}

/// Profit breakdown for crafting one batch of an item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftingProfit<'a> {
    pub item: &'a Item,
    pub craft_quantity: u32,
    pub total_output_value: u64,
    /// Ingredients in recipe order
    pub recipe: Vec<RecipeIngredient<'a>>,
    pub total_input_cost: u64,
    pub profit: i64,
    /// Percentage; non-finite for zero-cost recipes (serialized as null)
    #[serde(serialize_with = "finite_or_null")]
    pub profit_margin: f64,
}

/// Price one item's recipe. `None` when there is no recipe, a material
/// cannot be resolved, or the totals overflow.
pub fn calculate_crafting_profit<'a>(
    item: &'a Item,
    catalog: &ItemIndex<'a>,
) -> Option<CraftingProfit<'a>> {
    // A craft bench alone is not enough; the recipe is what gets priced
    let recipe = item.recipe.as_ref()?;

    let craft_quantity = item.output_quantity();
    let Some(total_output_value) = item.value.checked_mul(u64::from(craft_quantity)) else {
        tracing::warn!("Output value of {} out of range", item.id);
        return None;
    };

    let mut total_input_cost = 0u64;
    let mut ingredients = Vec::with_capacity(recipe.len());

    for (material_id, &quantity) in recipe {
        let Some(&material) = catalog.get(material_id.as_str()) else {
            tracing::warn!("Material {} not found for recipe of {}", material_id, item.id);
            return None;
        };

        let Some(total_value) = material.value.checked_mul(u64::from(quantity)) else {
            tracing::warn!("Input cost of {} out of range", item.id);
            return None;
        };
        let Some(running) = total_input_cost.checked_add(total_value) else {
            tracing::warn!("Input cost of {} out of range", item.id);
            return None;
        };
        total_input_cost = running;
        ingredients.push(RecipeIngredient {
            item: material,
            quantity,
            total_value,
        });
    }

    let profit = match (i64::try_from(total_output_value), i64::try_from(total_input_cost)) {
        (Ok(output), Ok(cost)) => output - cost,
        _ => {
            tracing::warn!("Profit of {} out of range", item.id);
            return None;
        }
    };
    let profit_margin = profit as f64 / total_input_cost as f64 * 100.0;

    Some(CraftingProfit {
        item,
        craft_quantity,
        total_output_value,
        recipe: ingredients,
        total_input_cost,
        profit,
        profit_margin,
    })
}

/// Items worth crafting: strictly positive profit, highest profit first.
///
/// Ties keep catalog order.
pub fn profitable_items<'a>(items: &'a [Item], catalog: &ItemIndex<'a>) -> Vec<CraftingProfit<'a>> {
    let mut profitable: Vec<CraftingProfit<'a>> = items
        .iter()
        .filter_map(|item| calculate_crafting_profit(item, catalog))
        .filter(|p| p.profit > 0)
        .collect();

    profitable.sort_by(|a, b| b.profit.cmp(&a.profit));

    tracing::debug!("{} profitable crafting recipes", profitable.len());
    profitable
}

fn finite_or_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}
