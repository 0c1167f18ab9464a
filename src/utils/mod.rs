//! Shared string utilities
//!
//! - Naming: display labels, wiki keys and links for raw identifiers
//! - Compare: case-insensitive ordering used by every sorted view

pub mod naming;
pub mod compare;

// Re-export commonly used functions
pub use naming::{canonical_key, display_label, wiki_url};
pub use compare::compare_strings;
