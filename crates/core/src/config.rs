//! Class-path configuration.
//!
//! Entries come from, in order of precedence:
//! - explicit entries (CLI flags, embedding code)
//! - `PROVSCOPE_CLASS_PATH` (platform path-list syntax)
//!
//! `PROVSCOPE_HOME` optionally points at an installation whose `lib/*.jar`
//! archives form the parent scope (installed providers).

use crate::scope::{ClassPath, DirectoryScope, JarScope};
use provscope_api::DiscoveryScope;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const CLASS_PATH_ENV: &str = "PROVSCOPE_CLASS_PATH";
pub const HOME_ENV: &str = "PROVSCOPE_HOME";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPathConfig {
    pub entries: Vec<PathBuf>,
    /// Installation directory; `<home>/lib/*.jar` become the parent scope.
    pub home: Option<PathBuf>,
}

impl ClassPathConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `PROVSCOPE_CLASS_PATH` and `PROVSCOPE_HOME`.
    pub fn from_env() -> Self {
        let entries = std::env::var_os(CLASS_PATH_ENV)
            .map(|paths| {
                std::env::split_paths(&paths)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let home = std::env::var_os(HOME_ENV)
            .filter(|h| !h.is_empty())
            .map(PathBuf::from);
        Self { entries, home }
    }

    /// Explicit entries take precedence over the environment; an explicit
    /// home replaces the environment one.
    pub fn merge(mut self, entries: Vec<PathBuf>, home: Option<PathBuf>) -> Self {
        if !entries.is_empty() {
            self.entries = entries;
        }
        if home.is_some() {
            self.home = home;
        }
        self
    }

    pub fn with_entry(mut self, entry: impl Into<PathBuf>) -> Self {
        self.entries.push(entry.into());
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Build the class path. Entries that do not exist are skipped.
    pub fn build(&self) -> ClassPath {
        let mut classpath = ClassPath::new("application").with_entries(
            self.entries
                .iter()
                .filter_map(|entry| entry_scope(entry)),
        );

        if let Some(home) = &self.home {
            let installed = ClassPath::new("installed").with_entries(
                installed_archives(home)
                    .into_iter()
                    .map(|jar| Arc::new(JarScope::new(jar)) as Arc<dyn DiscoveryScope>),
            );
            classpath = classpath.with_parent(Arc::new(installed));
        }
        classpath
    }
}

fn is_archive(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("jar") | Some("zip")
    )
}

fn entry_scope(entry: &Path) -> Option<Arc<dyn DiscoveryScope>> {
    if entry.is_dir() {
        Some(Arc::new(DirectoryScope::new(entry)))
    } else if entry.is_file() && is_archive(entry) {
        Some(Arc::new(JarScope::new(entry)))
    } else {
        debug!("Skipping class-path entry {}", entry.display());
        None
    }
}

/// `<home>/lib/*.jar`, sorted by file name for a stable order.
fn installed_archives(home: &Path) -> Vec<PathBuf> {
    let lib = home.join("lib");
    let Ok(entries) = std::fs::read_dir(&lib) else {
        debug!("No installed providers under {}", lib.display());
        return Vec::new();
    };
    let mut jars: Vec<PathBuf> = entries
        .filter_map(|entry| readable(&lib, entry))
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_archive(path))
        .collect();
    jars.sort();
    jars
}

fn readable<T>(dir: &Path, entry: std::io::Result<T>) -> Option<T> {
    entry
        .inspect_err(|e| debug!("Skipping unreadable entry in {}: {}", dir.display(), e))
        .ok()
}
