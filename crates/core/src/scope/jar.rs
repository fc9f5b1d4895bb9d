//! JAR/ZIP class-path entry.
//!
//! The archive's central directory is read when resources are enumerated;
//! entry contents are only decompressed when the parser opens them.

use provscope_api::{ConfigResource, DiscoveryScope, ResourceId, SERVICES_PREFIX, ScopeError};
use std::fs::File;
use std::io::{BufRead, Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// A configuration file stored inside an archive.
#[derive(Debug, Clone)]
pub struct JarEntryResource {
    id: ResourceId,
    archive: PathBuf,
    entry: String,
}

impl JarEntryResource {
    pub fn new(archive: PathBuf, entry: String) -> Self {
        Self {
            id: ResourceId::new(format!("jar:file:{}!/{}", archive.display(), entry)),
            archive,
            entry,
        }
    }
}

impl ConfigResource for JarEntryResource {
    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn open(&self) -> std::io::Result<Box<dyn BufRead + Send + '_>> {
        let mut archive = ZipArchive::new(File::open(&self.archive)?).map_err(std::io::Error::other)?;
        let mut entry = archive
            .by_name(&self.entry)
            .map_err(std::io::Error::other)?;
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        Ok(Box::new(Cursor::new(bytes)))
    }
}

/// Scope backed by a single archive.
#[derive(Debug, Clone)]
pub struct JarScope {
    path: PathBuf,
    name: String,
}

impl JarScope {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("jar:{}", path.display()),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_archive(&self) -> Result<ZipArchive<File>, ScopeError> {
        let location = self.path.display().to_string();
        let file = File::open(&self.path).map_err(|source| ScopeError::Io {
            location: location.clone(),
            source,
        })?;
        ZipArchive::new(file).map_err(|e| ScopeError::Archive {
            location,
            message: e.to_string(),
        })
    }
}

impl DiscoveryScope for JarScope {
    fn resources(&self, name: &str) -> Result<Vec<Box<dyn ConfigResource>>, ScopeError> {
        let archive = self.open_archive()?;
        if archive.file_names().any(|entry| entry == name) {
            Ok(vec![Box::new(JarEntryResource::new(
                self.path.clone(),
                name.to_string(),
            ))])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn service_names(&self) -> Result<Vec<String>, ScopeError> {
        let archive = self.open_archive()?;
        let mut names: Vec<String> = archive
            .file_names()
            .filter_map(|entry| entry.strip_prefix(SERVICES_PREFIX))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }
}
