//! Manifest registry
//!
//! In-memory view of the local manifest cache (`~/.bkp/manifests/*.json`).
//! The registry is never updated piecemeal: it is cleared and rebuilt from
//! the cache directory as a whole.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BkpError, BkpResult};
use crate::models::Manifest;

use super::file_io::read_json;

/// Manifests loaded from the cache directory, ordered by file name
#[derive(Debug)]
pub struct ManifestRegistry {
    cache_dir: PathBuf,
    manifests: Vec<Manifest>,
}

impl ManifestRegistry {
    /// Create an empty registry backed by `cache_dir`
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            manifests: Vec::new(),
        }
    }

    /// The cache directory this registry reads from
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Parse every cached manifest and replace the in-memory set
    ///
    /// A single malformed file fails the whole load and leaves the current
    /// set untouched.
    pub fn load(&mut self) -> BkpResult<()> {
        let mut loaded = Vec::new();

        for path in cached_manifest_files(&self.cache_dir)? {
            let manifest: Manifest = read_json(&path)?;
            loaded.push(manifest);
        }

        tracing::debug!(count = loaded.len(), dir = %self.cache_dir.display(), "loaded manifests");
        self.manifests = loaded;
        Ok(())
    }

    /// Drop every loaded manifest
    pub fn clear(&mut self) {
        self.manifests.clear();
    }

    /// Clear, then load from the cache directory
    pub fn reload(&mut self) -> BkpResult<()> {
        self.clear();
        self.load()
    }

    /// All loaded manifests
    pub fn all(&self) -> &[Manifest] {
        &self.manifests
    }

    /// Look a manifest up by its list position
    pub fn get(&self, index: usize) -> Option<&Manifest> {
        self.manifests.get(index)
    }

    /// Look a manifest up by its derived name
    pub fn find_by_name(&self, name: &str) -> Option<&Manifest> {
        self.manifests.iter().find(|m| m.name() == name)
    }

    /// Resolve a list position or a name
    pub fn resolve(&self, identifier: &str) -> BkpResult<&Manifest> {
        let by_index = identifier
            .parse::<usize>()
            .ok()
            .and_then(|index| self.get(index));

        by_index
            .or_else(|| self.find_by_name(identifier))
            .ok_or_else(|| BkpError::backup_not_found(identifier))
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

/// Cached `*.json` manifest files, sorted by name
pub fn cached_manifest_files(dir: &Path) -> BkpResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .map_err(|e| BkpError::Io(format!("Failed to read manifest cache: {}", e)))?
    {
        let entry =
            entry.map_err(|e| BkpError::Io(format!("Failed to read directory entry: {}", e)))?;
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::manifest::tests::draft;
    use crate::storage::write_json_atomic;
    use tempfile::TempDir;

    fn cache(dir: &Path, summary: &str, date: &str) -> Manifest {
        let manifest = Manifest::try_from(draft(summary, date)).unwrap();
        write_json_atomic(dir.join(format!("{}.json", manifest.name())), &manifest).unwrap();
        manifest
    }

    #[test]
    fn test_load_sorted_by_name() {
        let temp = TempDir::new().unwrap();
        cache(temp.path(), "Second", "2024-03-06");
        cache(temp.path(), "First", "2024-03-05");
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = ManifestRegistry::new(temp.path().to_path_buf());
        registry.load().unwrap();

        let names: Vec<_> = registry.all().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["2024-03-05-first", "2024-03-06-second"]);
    }

    #[test]
    fn test_reload_replaces_contents() {
        let temp = TempDir::new().unwrap();
        let first = cache(temp.path(), "First", "2024-03-05");

        let mut registry = ManifestRegistry::new(temp.path().to_path_buf());
        registry.load().unwrap();
        registry.load().unwrap();
        assert_eq!(registry.len(), 1);

        fs::remove_file(temp.path().join(format!("{}.json", first.name()))).unwrap();
        cache(temp.path(), "Other", "2024-04-01");
        cache(temp.path(), "Another", "2024-04-02");

        registry.reload().unwrap();
        let names: Vec<_> = registry.all().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["2024-04-01-other", "2024-04-02-another"]);
    }

    #[test]
    fn test_malformed_file_fails_reload() {
        let temp = TempDir::new().unwrap();
        cache(temp.path(), "First", "2024-03-05");
        fs::write(temp.path().join("broken.json"), "{ nope").unwrap();

        let mut registry = ManifestRegistry::new(temp.path().to_path_buf());
        assert!(registry.reload().is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_accepts_zone_named_dates() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("2024-03-05-nightly.json"),
            r#"{"summary":"Nightly","background":"b","directory":".","date":"2024-03-05 10:11:12 UTC","owner":"alex","ticket":"t","bucket":"b","path":"p","name":"2024-03-05-nightly"}"#,
        )
        .unwrap();

        let mut registry = ManifestRegistry::new(temp.path().to_path_buf());
        registry.load().unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0).unwrap().name(), "2024-03-05-nightly");
    }

    #[test]
    fn test_missing_cache_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let mut registry = ManifestRegistry::new(temp.path().join("manifests"));
        registry.reload().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_by_index_or_name() {
        let temp = TempDir::new().unwrap();
        cache(temp.path(), "First", "2024-03-05");
        cache(temp.path(), "Second", "2024-03-06");

        let mut registry = ManifestRegistry::new(temp.path().to_path_buf());
        registry.load().unwrap();

        assert_eq!(registry.resolve("1").unwrap().name(), "2024-03-06-second");
        assert_eq!(
            registry.resolve("2024-03-05-first").unwrap().summary,
            "First"
        );
        assert!(registry.resolve("9").unwrap_err().is_not_found());
    }
}
