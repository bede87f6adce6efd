use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use log::{info, warn};
use walkdir::WalkDir;

use crate::error::{ConfigError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Yaml,
    Other,
}

#[derive(Clone, Debug)]
enum AssetData {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// A logical file provided by a content package.
#[derive(Clone, Debug)]
pub struct Asset {
    pub path_virtual: String,
    pub source_name: String,
    pub kind: AssetKind,
    data: AssetData,
}

impl Asset {
    pub fn from_bytes(path_virtual: &str, source_name: &str, kind: AssetKind, data: Vec<u8>) -> Self {
        Asset {
            path_virtual: path_virtual.to_string(),
            source_name: source_name.to_string(),
            kind,
            data: AssetData::Memory(data),
        }
    }

    pub fn from_file(path_virtual: &str, source_name: &str, kind: AssetKind, path: &Path) -> Self {
        Asset {
            path_virtual: path_virtual.to_string(),
            source_name: source_name.to_string(),
            kind,
            data: AssetData::File(path.to_owned()),
        }
    }

    /// Last segment of the virtual path.
    pub fn file_name(&self) -> &str {
        self.path_virtual
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.path_virtual)
    }

    pub fn read_to_string(&self) -> Result<String> {
        let io_err = |source| ConfigError::Io {
            path: self.path_virtual.clone(),
            source,
        };
        match &self.data {
            AssetData::File(path) => std::fs::read_to_string(path).map_err(io_err),
            AssetData::Memory(bytes) => String::from_utf8(bytes.clone()).map_err(|e| {
                io_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            }),
        }
    }
}

/// Resolves logical content paths to assets.
pub trait ContentSource {
    fn try_get(&self, path: &str) -> Option<&Asset>;

    /// Every registration, including package-qualified aliases and paths
    /// shadowed by a later package.
    fn entries(&self) -> Vec<(&str, &Asset)>;
}

/// True for keys of the form `Package:/path`, which alias a file inside a
/// specific package's namespace. Package names may contain `:` but no path
/// separator, so the first separator must directly follow the package's `:`.
pub fn is_package_qualified(key: &str) -> bool {
    let Some(sep) = key.find(['/', '\\']) else {
        return false;
    };
    match key[..sep].strip_suffix(':') {
        Some(package) => !package.is_empty(),
        None => false,
    }
}

/// Maps a package-relative file path to its logical key and kind.
fn logical_key(relative: &Path) -> (String, AssetKind) {
    let key = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    for ext in [".yaml", ".yml"] {
        if let Some(stripped) = key.strip_suffix(ext) {
            return (stripped.to_string(), AssetKind::Yaml);
        }
    }
    (key, AssetKind::Other)
}

/// In-memory index of content packages. Later registrations of the same
/// logical path win lookups; every registration stays visible to scans.
#[derive(Default, Clone, Debug)]
pub struct ContentIndex {
    entries: Vec<(String, Asset)>,
    index_by_key: HashMap<String, usize>,
}

impl ContentIndex {
    pub fn new() -> Self {
        ContentIndex::default()
    }

    fn insert(&mut self, key: String, asset: Asset) {
        self.index_by_key.insert(key.clone(), self.entries.len());
        self.entries.push((key, asset));
    }

    /// Register an asset under its logical path and its package-qualified alias.
    /// A package provides at most one asset per logical path; later ones from
    /// the same package (e.g. `rando.yml` next to `rando.yaml`) are ignored.
    pub fn add(&mut self, asset: Asset) {
        let qualified = format!("{}:/{}", asset.source_name, asset.path_virtual);
        if self.index_by_key.contains_key(&qualified) {
            warn!(
                "{}: ignoring second asset for {}",
                asset.source_name, asset.path_virtual
            );
            return;
        }
        self.insert(qualified, asset.clone());
        self.insert(asset.path_virtual.clone(), asset);
    }

    pub fn add_yaml(&mut self, package: &str, path_virtual: &str, text: &str) {
        self.add(Asset::from_bytes(
            path_virtual,
            package,
            AssetKind::Yaml,
            text.as_bytes().to_vec(),
        ));
    }

    /// Index a package directory; the package is named after the directory.
    pub fn add_directory(&mut self, root: &Path) -> Result<usize> {
        let package = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        let mut paths: Vec<PathBuf> = vec![];
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| ConfigError::Io {
                path: root.display().to_string(),
                source: e.into(),
            })?;
            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        for path in &paths {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let (key, kind) = logical_key(relative);
            self.add(Asset::from_file(&key, &package, kind, path));
        }
        info!("{}: {} assets indexed ({})", package, paths.len(), root.display());
        Ok(paths.len())
    }

    pub fn from_directories(roots: &[PathBuf]) -> Result<Self> {
        let mut index = ContentIndex::new();
        for root in roots {
            index.add_directory(root)?;
        }
        Ok(index)
    }
}

impl ContentSource for ContentIndex {
    fn try_get(&self, path: &str) -> Option<&Asset> {
        self.index_by_key.get(path).map(|&i| &self.entries[i].1)
    }

    fn entries(&self) -> Vec<(&str, &Asset)> {
        self.entries
            .iter()
            .map(|(key, asset)| (key.as_str(), asset))
            .collect()
    }
}
