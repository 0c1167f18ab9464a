//! Recycle Tools
//!
//! Requirement aggregation and table engine for an extraction-shooter item
//! catalog. Loads items, quests, hideout benches and projects, then derives:
//! - `requirements`: reverse index of everything that consumes each item
//! - `profit`: crafting profitability, ranked by absolute profit
//! - `table_cache`: presorted material lists and column sort keys
//! - `search`: two-tier name/material search with category filtering
//!
//! `catalog::Catalog` ties these together with per-dependency memoization.
//! The optional `api` feature serves the catalog as JSON over axum.

pub mod types;
pub mod categories;
pub mod utils;
pub mod requirements;
pub mod profit;
pub mod table_cache;
pub mod search;
pub mod sorting;
pub mod memo;
pub mod session_cache;
pub mod loader;
pub mod catalog;
pub mod config;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use types::{
    CraftBench, HideoutBench, Item, ItemCategory, ItemRequirement, LocalizedText, Project, Quest,
};
pub use requirements::{get_item_requirements, ItemRequirementLookup, ItemRequirements, ItemUsage};
pub use profit::{calculate_crafting_profit, profitable_items, CraftingProfit};
pub use table_cache::{
    BenchNameLookup, ImageResolver, SortKeyCache, SortedMaterialsCache, UrlImageResolver,
};
pub use search::{filter_items_by_search, FilterResult, ItemCounts};
pub use sorting::{SortColumn, SortState};
pub use session_cache::SessionCache;
pub use loader::{DataSource, Dataset, DirectorySource, LoadError};
pub use catalog::{Catalog, TableQuery, TableView};
pub use config::EngineConfig;

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
