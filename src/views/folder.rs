//! View folders: where template sources live.
//!
//! Locations are `/`-separated paths relative to the folder, such as
//! `home/index.html` or `Shared/Application.html`. A location containing a
//! `.` or `..` segment never names a template.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Access to template sources by location.
pub trait ViewFolder: Send + Sync {
    /// File names directly inside `scope`, in a stable order.
    ///
    /// A scope that does not exist yields an empty list.
    fn list_views(&self, scope: &str) -> io::Result<Vec<String>>;

    /// Whether a template exists at `location`.
    fn has_view(&self, location: &str) -> bool;

    /// Read the template source at `location`.
    fn read_source(&self, location: &str) -> io::Result<String>;

    /// When the template at `location` last changed, if it exists.
    fn last_modified(&self, location: &str) -> Option<DateTime<Utc>>;

    /// Size in bytes of the template at `location`, if it exists.
    fn source_size(&self, location: &str) -> Option<u64>;
}

/// Templates stored under one or more root directories.
///
/// Roots are searched in order; the first root containing a location wins.
#[derive(Debug, Clone)]
pub struct FileSystemFolder {
    roots: Vec<PathBuf>,
}

impl FileSystemFolder {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Join `location` onto `root`, or `None` if any segment would leave it.
    fn path_in(root: &Path, location: &str) -> Option<PathBuf> {
        location
            .split('/')
            .filter(|part| !part.is_empty())
            .try_fold(root.to_path_buf(), |path, part| {
                let mut components = Path::new(part).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(name)), None) if name == part => {
                        Some(path.join(part))
                    }
                    _ => None,
                }
            })
    }

    fn locate(&self, location: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .filter_map(|root| Self::path_in(root, location))
            .find(|path| path.is_file())
    }
}

impl ViewFolder for FileSystemFolder {
    fn list_views(&self, scope: &str) -> io::Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();

        for root in &self.roots {
            let Some(dir) = Self::path_in(root, scope) else {
                continue;
            };
            if !dir.is_dir() {
                continue;
            }

            let mut found = Vec::new();
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    if let Some(name) = entry.file_name().to_str() {
                        found.push(name.to_string());
                    }
                }
            }
            found.sort();

            // Earlier roots shadow later ones
            for name in found {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        Ok(names)
    }

    fn has_view(&self, location: &str) -> bool {
        self.locate(location).is_some()
    }

    fn read_source(&self, location: &str) -> io::Result<String> {
        match self.locate(location) {
            Some(path) => fs::read_to_string(path),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("template not found: {}", location),
            )),
        }
    }

    fn last_modified(&self, location: &str) -> Option<DateTime<Utc>> {
        self.locate(location)
            .and_then(|path| fs::metadata(path).ok())
            .and_then(|m| m.modified().ok())
            .map(DateTime::from)
    }

    fn source_size(&self, location: &str) -> Option<u64> {
        self.locate(location)
            .and_then(|path| fs::metadata(path).ok())
            .map(|m| m.len())
    }
}

#[derive(Debug, Clone)]
struct StoredView {
    source: String,
    modified: DateTime<Utc>,
}

/// Thread-safe in-memory templates, for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryFolder {
    views: RwLock<BTreeMap<String, StoredView>>,
}

impl InMemoryFolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template.
    pub fn add(&self, location: impl Into<String>, source: impl Into<String>) {
        self.views.write().insert(
            location.into(),
            StoredView {
                source: source.into(),
                modified: Utc::now(),
            },
        );
    }

    /// Builder-style [`add`](Self::add).
    pub fn with_view(self, location: impl Into<String>, source: impl Into<String>) -> Self {
        self.add(location, source);
        self
    }

    /// Remove a template, returning whether it existed.
    pub fn remove(&self, location: &str) -> bool {
        self.views.write().remove(location).is_some()
    }
}

impl ViewFolder for InMemoryFolder {
    fn list_views(&self, scope: &str) -> io::Result<Vec<String>> {
        let scope = scope.trim_matches('/');
        Ok(self
            .views
            .read()
            .keys()
            .filter_map(|location| match location.rsplit_once('/') {
                Some((dir, name)) if dir == scope => Some(name.to_string()),
                None if scope.is_empty() => Some(location.clone()),
                _ => None,
            })
            .collect())
    }

    fn has_view(&self, location: &str) -> bool {
        self.views.read().contains_key(location)
    }

    fn read_source(&self, location: &str) -> io::Result<String> {
        self.views
            .read()
            .get(location)
            .map(|view| view.source.clone())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("template not found: {}", location),
                )
            })
    }

    fn last_modified(&self, location: &str) -> Option<DateTime<Utc>> {
        self.views.read().get(location).map(|view| view.modified)
    }

    fn source_size(&self, location: &str) -> Option<u64> {
        self.views
            .read()
            .get(location)
            .map(|view| view.source.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, location: &str, content: &str) {
        let path = FileSystemFolder::path_in(root, location).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn filesystem_finds_views_in_roots() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "home/index.html", "<p>index</p>");

        let folder = FileSystemFolder::new(vec![temp.path().to_path_buf()]);
        assert!(folder.has_view("home/index.html"));
        assert!(!folder.has_view("home/missing.html"));
        assert_eq!(folder.read_source("home/index.html").unwrap(), "<p>index</p>");
        assert!(folder.last_modified("home/index.html").is_some());
        assert!(folder.last_modified("home/missing.html").is_none());
    }

    #[test]
    fn filesystem_first_root_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write(first.path(), "home/index.html", "first");
        write(second.path(), "home/index.html", "second");
        write(second.path(), "home/list.html", "list");

        let folder = FileSystemFolder::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(folder.read_source("home/index.html").unwrap(), "first");
        assert_eq!(folder.read_source("home/list.html").unwrap(), "list");
    }

    #[test]
    fn filesystem_lists_files_across_roots_without_duplicates() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write(first.path(), "home/list.html", "");
        write(first.path(), "home/index.html", "");
        write(second.path(), "home/index.html", "");
        write(second.path(), "home/detail.html", "");
        fs::create_dir_all(first.path().join("home").join("partials")).unwrap();

        let folder = FileSystemFolder::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let names = folder.list_views("home").unwrap();
        assert_eq!(names, vec!["index.html", "list.html", "detail.html"]);
    }

    #[test]
    fn filesystem_missing_scope_is_empty() {
        let temp = TempDir::new().unwrap();
        let folder = FileSystemFolder::new(vec![temp.path().to_path_buf()]);
        assert!(folder.list_views("nowhere").unwrap().is_empty());
    }

    #[test]
    fn filesystem_read_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let folder = FileSystemFolder::new(vec![temp.path().to_path_buf()]);
        let err = folder.read_source("home/index.html").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn filesystem_reports_source_size() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "home/index.html", "12345");

        let folder = FileSystemFolder::new(vec![temp.path().to_path_buf()]);
        assert_eq!(folder.source_size("home/index.html"), Some(5));
        assert_eq!(folder.source_size("home/missing.html"), None);
    }

    #[test]
    fn filesystem_locations_cannot_leave_roots() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("views");
        write(&root, "home/index.html", "index");
        fs::write(temp.path().join("secret.html"), "secret").unwrap();

        let folder = FileSystemFolder::new(vec![root]);
        for location in [
            "home/../../secret.html",
            "../secret.html",
            "./home/index.html",
            "home/./index.html",
        ] {
            assert!(!folder.has_view(location), "{}", location);
            assert_eq!(
                folder.read_source(location).unwrap_err().kind(),
                io::ErrorKind::NotFound
            );
            assert!(folder.last_modified(location).is_none());
            assert!(folder.source_size(location).is_none());
        }
        assert!(folder.list_views("..").unwrap().is_empty());
        assert!(folder.has_view("home/index.html"));
    }

    #[test]
    fn in_memory_lists_direct_children_only() {
        let folder = InMemoryFolder::new()
            .with_view("home/index.html", "")
            .with_view("home/list.html", "")
            .with_view("home/partials/row.html", "")
            .with_view("Shared/Application.html", "");

        assert_eq!(
            folder.list_views("home").unwrap(),
            vec!["index.html", "list.html"]
        );
        assert_eq!(folder.list_views("Shared").unwrap(), vec!["Application.html"]);
    }

    #[test]
    fn in_memory_add_and_remove() {
        let folder = InMemoryFolder::new();
        assert!(!folder.has_view("home/index.html"));

        folder.add("home/index.html", "v1");
        assert!(folder.has_view("home/index.html"));
        assert_eq!(folder.read_source("home/index.html").unwrap(), "v1");

        folder.add("home/index.html", "v2");
        assert_eq!(folder.read_source("home/index.html").unwrap(), "v2");

        assert!(folder.remove("home/index.html"));
        assert!(!folder.remove("home/index.html"));
        assert!(folder.last_modified("home/index.html").is_none());
    }
}
