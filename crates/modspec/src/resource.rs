//! Resource loaders attached to concrete module specifications

use crate::filter::PathFilter;
use rustc_hash::FxHashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Supplies bytes for the resources and classes belonging to a module
pub trait ResourceLoader: fmt::Debug + Send + Sync {
    /// Human-readable name of the root this loader serves
    fn root_name(&self) -> &str;

    /// Read a resource by `/`-separated path
    fn get_resource(&self, path: &str) -> Option<Vec<u8>>;

    /// All resource paths this loader can serve
    fn paths(&self) -> Vec<String>;
}

/// A resource loader together with the filter applied to its paths
#[derive(Debug, Clone)]
pub struct ResourceLoaderSpec {
    loader: Arc<dyn ResourceLoader>,
    filter: PathFilter,
}

impl ResourceLoaderSpec {
    /// Wrap a loader, exposing every path it serves
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self::with_filter(loader, PathFilter::accept_all())
    }

    pub fn with_filter(loader: Arc<dyn ResourceLoader>, filter: PathFilter) -> Self {
        Self { loader, filter }
    }

    pub fn loader(&self) -> &Arc<dyn ResourceLoader> {
        &self.loader
    }

    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    /// Read a resource if the filter admits its path
    pub fn get_resource(&self, path: &str) -> Option<Vec<u8>> {
        if !self.filter.accept(path) {
            return None;
        }
        self.loader.get_resource(path)
    }
}

/// In-memory resource loader
#[derive(Debug, Default)]
pub struct MemoryResourceLoader {
    name: String,
    entries: FxHashMap<String, Vec<u8>>,
}

impl MemoryResourceLoader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: FxHashMap::default(),
        }
    }

    pub fn with_resource(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries
            .insert(path.trim_matches('/').to_string(), bytes.into());
        self
    }
}

impl ResourceLoader for MemoryResourceLoader {
    fn root_name(&self) -> &str {
        &self.name
    }

    fn get_resource(&self, path: &str) -> Option<Vec<u8>> {
        self.entries.get(path.trim_matches('/')).cloned()
    }

    fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.entries.keys().cloned().collect();
        paths.sort();
        paths
    }
}

/// Serves files beneath a directory
#[derive(Debug)]
pub struct DirectoryResourceLoader {
    name: String,
    root: PathBuf,
}

impl DirectoryResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: root.display().to_string(),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn collect_files(dir: &Path, prefix: &str, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        match entry.file_type() {
            Ok(t) if t.is_dir() => collect_files(&entry.path(), &path, out),
            Ok(t) if t.is_file() => out.push(path),
            _ => {}
        }
    }
}

impl ResourceLoader for DirectoryResourceLoader {
    fn root_name(&self) -> &str {
        &self.name
    }

    fn get_resource(&self, path: &str) -> Option<Vec<u8>> {
        let relative = path.trim_matches('/');
        if relative.split('/').any(|segment| segment == "..") {
            return None;
        }
        fs::read(self.root.join(relative)).ok()
    }

    fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_files(&self.root, "", &mut paths);
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_loader() {
        let loader = MemoryResourceLoader::new("mem")
            .with_resource("com/acme/A.class", b"A".to_vec())
            .with_resource("/META-INF/info", b"info".to_vec());

        assert_eq!(loader.root_name(), "mem");
        assert_eq!(loader.get_resource("com/acme/A.class"), Some(b"A".to_vec()));
        assert_eq!(loader.get_resource("META-INF/info"), Some(b"info".to_vec()));
        assert_eq!(loader.paths(), vec!["META-INF/info", "com/acme/A.class"]);
    }

    #[test]
    fn test_spec_filter_hides_paths() {
        let loader = Arc::new(
            MemoryResourceLoader::new("mem")
                .with_resource("public/a", b"a".to_vec())
                .with_resource("private/b", b"b".to_vec()),
        );
        let spec = ResourceLoaderSpec::with_filter(loader, PathFilter::is_child_of("public"));

        assert!(spec.get_resource("public/a").is_some());
        assert!(spec.get_resource("private/b").is_none());
    }

    #[test]
    fn test_directory_loader() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("com/acme")).unwrap();
        fs::write(temp.path().join("com/acme/A.class"), b"bytes").unwrap();
        fs::write(temp.path().join("top.txt"), b"top").unwrap();

        let loader = DirectoryResourceLoader::new(temp.path());
        assert_eq!(loader.get_resource("com/acme/A.class"), Some(b"bytes".to_vec()));
        assert_eq!(loader.get_resource("../escape"), None);
        assert_eq!(loader.paths(), vec!["com/acme/A.class", "top.txt"]);
    }
}
