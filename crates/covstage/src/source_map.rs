//! Visited-file maps and their rewrite into source-map cache entries.

use crate::options::absolute_path;
use crate::result::{CovError, CovResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Path fragment marking third-party dependency code
pub const DEPENDENCY_DIR_MARKER: &str = "/node_modules/";

/// Raw per-file instrumentation map as produced by the instrumentation layer
///
/// Only `sources` is interpreted; every other key is carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCoverageMap {
    /// Original source paths, possibly absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    /// Everything else in the map
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl RawCoverageMap {
    /// Create a map with the given sources and no other keys
    #[must_use]
    pub fn with_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: Some(sources.into_iter().map(Into::into).collect()),
            rest: serde_json::Map::new(),
        }
    }
}

/// Files visited during a run, keyed by absolute path
pub type VisitedFileMap = HashMap<PathBuf, RawCoverageMap>;

/// Load a visited-file map from a JSON object keyed by path
pub fn load_visited_files(path: &Path) -> CovResult<VisitedFileMap> {
    let content = std::fs::read_to_string(path).map_err(|e| CovError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// A coverage map registered with the engine, as `{ "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMapData {
    /// Map with `sources` rewritten to file URLs
    pub data: RawCoverageMap,
}

/// One source-map cache registration
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMapCacheEntry {
    /// Canonical `file://` URL of the visited file
    pub url: String,
    /// Rewritten coverage map
    pub data: RawCoverageMap,
}

impl SourceMapCacheEntry {
    /// Split into the cache key and the value the engine stores
    #[must_use]
    pub fn into_parts(self) -> (String, SourceMapData) {
        (self.url, SourceMapData { data: self.data })
    }
}

/// Whether `path` lies inside a dependency directory
#[must_use]
pub fn is_dependency_path(path: &Path) -> bool {
    path.to_string_lossy().contains(DEPENDENCY_DIR_MARKER)
}

/// Canonical `file://` URL for `path`
///
/// Relative paths are joined onto `base`; `.` and `..` segments are
/// collapsed so the same file always maps to the same URL.
pub fn file_url(path: &Path, base: &Path) -> CovResult<Url> {
    let absolute = absolute_path(base, path);
    Url::from_file_path(&absolute).map_err(|()| CovError::InvalidPath { path: absolute })
}

/// Rewrite `map` into a cache entry for `file`
///
/// Each source becomes a file URL. An absent or empty source list falls back
/// to the file's own URL, which loses attribution for generated files with
/// several original sources.
pub fn cache_entry(
    file: &Path,
    map: &RawCoverageMap,
    base: &Path,
) -> CovResult<SourceMapCacheEntry> {
    let url = file_url(file, base)?.to_string();

    let sources = match map.sources.as_deref() {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(|source| file_url(Path::new(source), base).map(String::from))
            .collect::<CovResult<Vec<_>>>()?,
        _ => vec![url.clone()],
    };

    Ok(SourceMapCacheEntry {
        data: RawCoverageMap {
            sources: Some(sources),
            rest: map.rest.clone(),
        },
        url,
    })
}
