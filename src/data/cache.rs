use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};

use super::loader;
use super::model::BatterTable;

/// Modification signature of a source file. A change in either field
/// invalidates the cached snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSignature {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceSignature {
    pub fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .with_context(|| format!("reading metadata of {}", path.display()))?;
        Ok(SourceSignature {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Immutable table snapshots keyed by source path.
///
/// Snapshots are never mutated: a changed signature replaces the entry
/// with a freshly loaded `Arc`, leaving earlier holders untouched.
#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, (SourceSignature, Arc<BatterTable>)>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for `path`, loading it when absent or
    /// when the file's signature has changed.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<BatterTable>> {
        self.get_or_load_with(path, loader::load_file)
    }

    fn get_or_load_with<F>(&mut self, path: &Path, load: F) -> Result<Arc<BatterTable>>
    where
        F: FnOnce(&Path) -> Result<BatterTable>,
    {
        let signature = SourceSignature::of(path)?;
        if let Some((cached_sig, table)) = self.entries.get(path) {
            if *cached_sig == signature {
                log::debug!("Cache hit for {}", path.display());
                return Ok(Arc::clone(table));
            }
            log::info!("{} changed on disk; reloading", path.display());
        }

        let table = Arc::new(load(path)?);
        self.entries
            .insert(path.to_path_buf(), (signature, Arc::clone(&table)));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
