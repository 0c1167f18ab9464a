//! Bulk loader for the four source collections
//!
//! `DataSource` is the seam the catalog loads through. The bundled
//! `DirectorySource` reads a checkout of the upstream data repository:
//!
//! ```text
//! <root>/items/*.json     one item per file
//! <root>/quests/*.json    one quest per file
//! <root>/hideout/*.json   one bench per file
//! <root>/projects.json    array of projects
//! ```
//!
//! Files are read in file-name order so catalog order is reproducible.
//! A load either yields all four collections or fails as a whole.

use crate::session_cache::{
    SessionCache, ALL_ITEMS_KEY, ALL_QUESTS_KEY, HIDEOUT_BENCHES_KEY, PROJECTS_KEY,
};
use crate::types::{HideoutBench, Item, Project, Quest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing {collection} collection at {}", path.display())]
    MissingCollection {
        collection: &'static str,
        path: PathBuf,
    },
}

/// The four source collections, each in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub items: Vec<Item>,
    pub quests: Vec<Quest>,
    pub hideout_benches: Vec<HideoutBench>,
    pub projects: Vec<Project>,
}

pub trait DataSource: Send + Sync {
    /// Load all collections (may be served from a cache).
    fn load(&self) -> Result<Dataset, LoadError>;

    /// Load bypassing any cache.
    fn refresh(&self) -> Result<Dataset, LoadError> {
        self.load()
    }
}

/// In-memory source, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl DataSource for StaticSource {
    fn load(&self) -> Result<Dataset, LoadError> {
        Ok(self.dataset.clone())
    }
}

#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    cache: Option<SessionCache>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: None,
        }
    }

    /// Serve collections from `cache` until they expire.
    pub fn with_cache(mut self, cache: SessionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn cached<T, F>(&self, key: &str, fetch: F) -> Result<T, LoadError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, LoadError>,
    {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get::<T>(key)) {
            return Ok(hit);
        }

        let fresh = fetch()?;
        if let Some(cache) = &self.cache {
            cache.set(key, &fresh);
        }
        Ok(fresh)
    }
}

impl DataSource for DirectorySource {
    fn load(&self) -> Result<Dataset, LoadError> {
        let start = std::time::Instant::now();

        let items: Vec<Item> = self.cached(ALL_ITEMS_KEY, || {
            read_directory(&self.root.join("items"), "items")
        })?;
        let quests: Vec<Quest> = self.cached(ALL_QUESTS_KEY, || {
            read_directory(&self.root.join("quests"), "quests")
        })?;
        let hideout_benches: Vec<HideoutBench> = self.cached(HIDEOUT_BENCHES_KEY, || {
            read_directory(&self.root.join("hideout"), "hideout")
        })?;
        let projects: Vec<Project> = self.cached(PROJECTS_KEY, || {
            read_json_file(&self.root.join("projects.json"), "projects")
        })?;

        tracing::info!(
            "Loaded {} items, {} quests, {} benches, {} projects from {} in {:?}",
            items.len(),
            quests.len(),
            hideout_benches.len(),
            projects.len(),
            self.root.display(),
            start.elapsed()
        );

        Ok(Dataset {
            items,
            quests,
            hideout_benches,
            projects,
        })
    }

    fn refresh(&self) -> Result<Dataset, LoadError> {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
        self.load()
    }
}

/// Parse every `*.json` file in `dir`, one record per file.
fn read_directory<T: DeserializeOwned>(
    dir: &Path,
    collection: &'static str,
) -> Result<Vec<T>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingCollection {
            collection,
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            paths.push(path);
        } else {
            tracing::debug!("Skipping non-JSON entry {}", path.display());
        }
    }
    paths.sort();

    paths.iter().map(|path| parse_file(path)).collect()
}

fn read_json_file<T: DeserializeOwned>(
    path: &Path,
    collection: &'static str,
) -> Result<T, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingCollection {
            collection,
            path: path.to_path_buf(),
        });
    }
    parse_file(path)
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, contents: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(
            root,
            "items/wires.json",
            r#"{"id":"wires","name":{"en":"Wires"},"type":"Basic Material","value":50}"#,
        );
        write(
            root,
            "items/battery.json",
            r#"{"id":"battery","name":{"en":"Battery"},"type":"Basic Material","value":100}"#,
        );
        write(root, "items/README.md", "not data");
        write(
            root,
            "quests/q1.json",
            r#"{"id":"q1","name":{"en":"Power Out"},"requiredItemIds":[{"itemId":"battery","quantity":2}]}"#,
        );
        write(
            root,
            "hideout/workbench.json",
            r#"{"id":"workbench","name":{"en":"Workbench"},"maxLevel":1,"levels":[]}"#,
        );
        write(root, "projects.json", "[]");
        tmp
    }

    #[test]
    fn test_directory_source_reads_sorted_files() {
        let tmp = fixture();
        let dataset = DirectorySource::new(tmp.path()).load().unwrap();

        let ids: Vec<&str> = dataset.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["battery", "wires"]);
        assert_eq!(dataset.quests.len(), 1);
        assert_eq!(dataset.hideout_benches.len(), 1);
        assert!(dataset.projects.is_empty());
    }

    #[test]
    fn test_missing_collection_fails_whole_load() {
        let tmp = fixture();
        fs::remove_file(tmp.path().join("projects.json")).unwrap();

        let err = DirectorySource::new(tmp.path()).load().unwrap_err();
        assert!(matches!(err, LoadError::MissingCollection { collection: "projects", .. }));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let tmp = fixture();
        write(tmp.path(), "items/broken.json", "{ not json");

        let err = DirectorySource::new(tmp.path()).load().unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_cache_serves_until_refresh() {
        let tmp = fixture();
        let source = DirectorySource::new(tmp.path())
            .with_cache(SessionCache::new(Duration::from_secs(60)));

        assert_eq!(source.load().unwrap().items.len(), 2);

        write(
            tmp.path(),
            "items/zinc.json",
            r#"{"id":"zinc","name":{"en":"Zinc"},"type":"Basic Material"}"#,
        );
        assert_eq!(source.load().unwrap().items.len(), 2);
        assert_eq!(source.refresh().unwrap().items.len(), 3);
    }
}
