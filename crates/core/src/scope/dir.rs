//! Exploded class-path directory.

use provscope_api::{ConfigResource, DiscoveryScope, ResourceId, SERVICES_PREFIX, ScopeError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A configuration file on disk.
#[derive(Debug, Clone)]
pub struct FileResource {
    id: ResourceId,
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: PathBuf) -> Self {
        Self {
            id: ResourceId::new(format!("file:{}", path.display())),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigResource for FileResource {
    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn open(&self) -> std::io::Result<Box<dyn BufRead + Send + '_>> {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }
}

/// Scope rooted at a directory; `name` resolves to `<root>/<name>`.
#[derive(Debug, Clone)]
pub struct DirectoryScope {
    root: PathBuf,
    name: String,
}

impl DirectoryScope {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: format!("dir:{}", root.display()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DiscoveryScope for DirectoryScope {
    fn resources(&self, name: &str) -> Result<Vec<Box<dyn ConfigResource>>, ScopeError> {
        let candidate = self.root.join(name);
        if candidate.is_file() {
            Ok(vec![Box::new(FileResource::new(candidate))])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn service_names(&self) -> Result<Vec<String>, ScopeError> {
        let services = self.root.join(SERVICES_PREFIX);
        if !services.is_dir() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&services).map_err(|source| ScopeError::Io {
            location: services.display().to_string(),
            source,
        })?;

        let mut names: Vec<String> = collect_entries(&services, entries)?
            .into_iter()
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Collect directory entries, failing on the first unreadable one.
fn collect_entries<T>(
    dir: &Path,
    entries: impl IntoIterator<Item = std::io::Result<T>>,
) -> Result<Vec<T>, ScopeError> {
    entries
        .into_iter()
        .map(|entry| {
            entry.map_err(|source| ScopeError::Io {
                location: dir.display().to_string(),
                source,
            })
        })
        .collect()
}
