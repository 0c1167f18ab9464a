//! Environment-driven configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `DATA_DIR` | `data` |
//! | `CACHE_TTL_SECS` | `1800` |
//! | `IMAGE_BASE_URL` | upstream raw-content URL |
//! | `LANGUAGE` | `en` |
//! | `PORT` | `3000` |

use crate::session_cache::DEFAULT_TTL;
use crate::types::DEFAULT_LANGUAGE;
use std::path::PathBuf;
use std::time::Duration;

/// Raw-content root of the upstream data repository.
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/SquaredCub/arcraiders-data/main";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub cache_ttl: Duration,
    pub image_base_url: String,
    pub language: String,
    pub port: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cache_ttl: DEFAULT_TTL,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; unparseable numbers keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_ttl = lookup("CACHE_TTL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        let port = lookup("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        Self {
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            cache_ttl,
            image_base_url: lookup("IMAGE_BASE_URL").unwrap_or(defaults.image_base_url),
            language: lookup("LANGUAGE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.language),
            port,
        }
    }
}
