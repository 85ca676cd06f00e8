//! Resource tables: name and file to [`PhysicalFontResource`].
//!
//! The factory is the only place physical resources are created. Names are
//! keyed lower-case. A file is loaded at most once; a file that fails to
//! parse is remembered and treated as not found afterwards.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fontweft_config::AntiAliasMode;
use parking_lot::RwLock;

use crate::error::FontError;
use crate::face::{FaceLoader, FileKey, FontFile};
use crate::platform::PlatformFontDirectory;
use crate::resource::PhysicalFontResource;

#[derive(Default)]
struct Tables {
    by_name: HashMap<String, Arc<PhysicalFontResource>>,
    by_file: HashMap<FileKey, Arc<PhysicalFontResource>>,
    failed: HashSet<FileKey>,
}

pub struct FontFactory {
    directory: Arc<dyn PlatformFontDirectory>,
    loader: Arc<dyn FaceLoader>,
    default_antialias: AntiAliasMode,
    tables: RwLock<Tables>,
}

impl std::fmt::Debug for FontFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("FontFactory")
            .field("names", &tables.by_name.len())
            .field("files", &tables.by_file.len())
            .field("failed", &tables.failed.len())
            .finish()
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl FontFactory {
    pub fn new(
        directory: Arc<dyn PlatformFontDirectory>,
        loader: Arc<dyn FaceLoader>,
        default_antialias: AntiAliasMode,
    ) -> Self {
        Self {
            directory,
            loader,
            default_antialias,
            tables: RwLock::new(Tables::default()),
        }
    }

    pub fn directory(&self) -> &Arc<dyn PlatformFontDirectory> {
        &self.directory
    }

    /// Resource for `file`, loading and parsing it on first use.
    pub fn load_resource(&self, file: &FontFile) -> Result<Arc<PhysicalFontResource>, FontError> {
        let key = file.key();
        if let Some(resource) = self.tables.read().by_file.get(&key) {
            return Ok(Arc::clone(resource));
        }

        // Parse outside the lock; another thread may win the insert.
        let face = self.loader.load(file)?;
        let resource = Arc::new(PhysicalFontResource::new(
            file.clone(),
            face,
            self.default_antialias,
        ));

        let mut tables = self.tables.write();
        let resource = Arc::clone(tables.by_file.entry(key).or_insert(resource));
        tables
            .by_name
            .entry(name_key(resource.full_name()))
            .or_insert_with(|| Arc::clone(&resource));
        Ok(resource)
    }

    /// Like [`load_resource`](Self::load_resource), but a file that cannot be
    /// loaded is logged and reported as `None`.
    pub fn resource_for_file(&self, file: &FontFile) -> Option<Arc<PhysicalFontResource>> {
        let key = file.key();
        if self.tables.read().failed.contains(&key) {
            return None;
        }
        match self.load_resource(file) {
            Ok(resource) => Some(resource),
            Err(err) => {
                log::warn!("Skipping font {}: {}", file.describe(), err);
                self.tables.write().failed.insert(key);
                None
            }
        }
    }

    /// Resource registered under, or whose full name is, `name`.
    pub fn resource_for_name(&self, name: &str) -> Option<Arc<PhysicalFontResource>> {
        let key = name_key(name);
        if let Some(resource) = self.tables.read().by_name.get(&key) {
            return Some(Arc::clone(resource));
        }
        let file = self.directory.lookup_full_name(name)?;
        let resource = self.resource_for_file(&file)?;
        self.tables
            .write()
            .by_name
            .entry(key)
            .or_insert_with(|| Arc::clone(&resource));
        Some(resource)
    }

    /// Face of `family` closest to the requested style.
    pub fn resource_for_family(
        &self,
        family: &str,
        bold: bool,
        italic: bool,
    ) -> Option<Arc<PhysicalFontResource>> {
        let file = self.directory.lookup(family, bold, italic)?;
        self.resource_for_file(&file)
    }

    /// Register `resource` under `name` in addition to its full name.
    pub fn insert(&self, name: &str, resource: Arc<PhysicalFontResource>) {
        let mut tables = self.tables.write();
        tables
            .by_file
            .insert(resource.file().key(), Arc::clone(&resource));
        tables
            .by_name
            .insert(name_key(resource.full_name()), Arc::clone(&resource));
        tables.by_name.insert(name_key(name), resource);
    }

    /// Drop every table entry that refers to `resource`.
    pub fn remove(&self, resource: &PhysicalFontResource) -> bool {
        let key = resource.file().key();
        let mut tables = self.tables.write();
        let removed = tables.by_file.remove(&key).is_some();
        tables
            .by_name
            .retain(|_, existing| existing.file().key() != key);
        removed
    }

    /// All loaded resources.
    pub fn resources(&self) -> Vec<Arc<PhysicalFontResource>> {
        self.tables.read().by_file.values().cloned().collect()
    }

    pub fn clear(&self) {
        let mut tables = self.tables.write();
        tables.by_name.clear();
        tables.by_file.clear();
        tables.failed.clear();
    }
}
