//! The font registry: one context object owning every resource table, the
//! logical font table and the strike cache.
//!
//! Construct one per process (or per test), share it by reference, and call
//! [`FontRegistry::shutdown`] (or drop it) to release strikes and delete
//! temporary font files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fontweft_config::{AntiAliasMode, FontConfig};
use parking_lot::{Mutex, RwLock};

use crate::composite::{CompositeFontResource, CompositeKind};
use crate::error::FontError;
use crate::face::{FaceLoader, FileKey, FontFile};
use crate::factory::FontFactory;
use crate::font::Font;
use crate::logical::{LogicalFamily, LogicalFonts, parse_logical_name};
use crate::platform::{FontDbDirectory, PlatformFontDirectory};
use crate::resource::{FontResource, PhysicalFontResource};
use crate::strike::{FontStrike, FontStrikeDescriptor, StrikeCache, sweep_physical};
use crate::swash_face::SwashLoader;

/// A font added at runtime rather than found in the platform directory.
#[derive(Debug)]
struct Registration {
    resource: Arc<PhysicalFontResource>,
    /// File deleted when the font is unregistered or the registry shuts down.
    temporary: Option<PathBuf>,
}

pub struct FontRegistry {
    config: FontConfig,
    factory: Arc<FontFactory>,
    logical: LogicalFonts,
    composites: RwLock<HashMap<FileKey, Arc<CompositeFontResource>>>,
    registrations: Mutex<HashMap<String, Registration>>,
    strikes: StrikeCache,
    default_family: LogicalFamily,
    default: Arc<CompositeFontResource>,
    shut_down: AtomicBool,
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("default", &self.default.full_name())
            .field("factory", &self.factory)
            .field("logical", &self.logical)
            .field("composites", &self.composites.read().len())
            .field("strikes", &self.strikes)
            .finish()
    }
}

impl FontRegistry {
    /// Build a registry and resolve the default logical font.
    ///
    /// Fails with [`FontError::NoDefaultFont`] when the directory cannot
    /// supply any family for the configured default, since every unresolved
    /// request degrades to it.
    pub fn new(
        config: FontConfig,
        directory: Arc<dyn PlatformFontDirectory>,
        loader: Arc<dyn FaceLoader>,
    ) -> Result<Self, FontError> {
        config.validate()?;

        let factory = Arc::new(FontFactory::new(
            directory,
            loader,
            config.default_antialias,
        ));
        let logical = LogicalFonts::new(config.logical_families.clone(), Arc::clone(&factory));

        let default_family = LogicalFamily::from_name(&config.default_family)
            .ok_or_else(|| FontError::NoDefaultFont(config.default_family.clone()))?;
        let default = logical
            .composite(default_family, false, false)
            .ok_or_else(|| FontError::NoDefaultFont(config.default_family.clone()))?;
        log::info!(
            "Font registry ready, default font '{}' ('{}')",
            default.full_name(),
            default.primary().full_name()
        );

        Ok(Self {
            strikes: StrikeCache::from_config(&config),
            config,
            factory,
            logical,
            composites: RwLock::new(HashMap::new()),
            registrations: Mutex::new(HashMap::new()),
            default_family,
            default,
            shut_down: AtomicBool::new(false),
        })
    }

    /// Registry over the system fonts, rendered with swash.
    pub fn with_system_fonts(config: FontConfig) -> Result<Self, FontError> {
        let directory = Arc::new(FontDbDirectory::from_config(&config));
        Self::new(config, directory, Arc::new(SwashLoader))
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    pub fn factory(&self) -> &Arc<FontFactory> {
        &self.factory
    }

    pub fn strike_cache(&self) -> &StrikeCache {
        &self.strikes
    }

    /// The default font ("System Regular" unless configured otherwise).
    pub fn default_font(&self, size: f32) -> Font {
        Font::new(FontResource::Composite(Arc::clone(&self.default)), size)
    }

    /// Resolve `name` in the requested style. Never fails.
    ///
    /// `name` is tried as a logical family, then a platform family, then a
    /// font's full name. Anything unresolved gets the default family in the
    /// requested style, or the default font itself.
    pub fn font(&self, name: &str, bold: bool, italic: bool, size: f32) -> Font {
        if let Some(family) = LogicalFamily::from_name(name) {
            if let Some(composite) = self.logical.composite(family, bold, italic) {
                return Font::new(FontResource::Composite(composite), size);
            }
        } else if let Some(resource) = self
            .factory
            .resource_for_family(name, bold, italic)
            .or_else(|| self.factory.resource_for_name(name))
        {
            return Font::new(FontResource::Composite(self.composite_for(resource)), size);
        }

        log::debug!(
            "Font '{}' (bold={}, italic={}) not found, using the default",
            name,
            bold,
            italic
        );
        let composite = self
            .logical
            .composite(self.default_family, bold, italic)
            .unwrap_or_else(|| Arc::clone(&self.default));
        Font::new(FontResource::Composite(composite), size)
    }

    /// Font whose full name is `full_name`: a logical name such as
    /// "Serif Bold", or a platform font's full name. `None` if neither.
    pub fn find_font(&self, full_name: &str, size: f32) -> Option<Font> {
        if let Some(font) = self.logical_font(full_name, size) {
            return Some(font);
        }
        let resource = self.factory.resource_for_name(full_name)?;
        Some(Font::new(
            FontResource::Composite(self.composite_for(resource)),
            size,
        ))
    }

    /// Like [`find_font`](Self::find_font), for callers that want an error
    /// rather than a fallback.
    pub fn require_font(&self, full_name: &str, size: f32) -> Result<Font, FontError> {
        self.find_font(full_name, size)
            .ok_or_else(|| FontError::NotFound(full_name.to_string()))
    }

    /// Like [`find_font`](Self::find_font), degrading to the default font.
    pub fn font_by_full_name(&self, full_name: &str, size: f32) -> Font {
        self.find_font(full_name, size).unwrap_or_else(|| {
            log::debug!("Font '{}' not found, using the default", full_name);
            self.default_font(size)
        })
    }

    /// Logical font for a name of the form "<Family> <Style>".
    ///
    /// Only "Regular", "Bold", "Italic" and "Bold Italic" are accepted as
    /// styles; family and style are matched case-insensitively.
    pub fn logical_font(&self, full_name: &str, size: f32) -> Option<Font> {
        let (family, bold, italic) = parse_logical_name(full_name)?;
        let composite = self.logical.composite(family, bold, italic)?;
        Some(Font::new(FontResource::Composite(composite), size))
    }

    /// The platform composite whose primary is `resource`.
    pub fn composite_for(&self, resource: Arc<PhysicalFontResource>) -> Arc<CompositeFontResource> {
        let key = resource.file().key();
        if let Some(composite) = self.composites.read().get(&key) {
            return Arc::clone(composite);
        }
        let mut composites = self.composites.write();
        Arc::clone(composites.entry(key).or_insert_with(|| {
            Arc::new(CompositeFontResource::new(
                CompositeKind::Platform,
                resource,
                Arc::clone(&self.factory),
            ))
        }))
    }

    /// Strike for `font` under `transform`. `antialias` defaults to the
    /// configured mode.
    pub fn strike(
        &self,
        font: &Font,
        transform: [f32; 4],
        antialias: Option<AntiAliasMode>,
    ) -> FontStrike {
        let antialias = antialias.unwrap_or(self.config.default_antialias);
        self.strikes.strike(
            font.resource(),
            FontStrikeDescriptor::new(font.size(), transform, antialias),
        )
    }

    /// Register in-memory font data under `name`.
    pub fn register_embedded(
        &self,
        name: &str,
        data: Vec<u8>,
    ) -> Result<Arc<PhysicalFontResource>, FontError> {
        let file = FontFile::from_memory(Arc::new(data), 0);
        self.register(name, file, None)
    }

    /// Register a font file. A `temporary` file is deleted when the font is
    /// unregistered or the registry shuts down.
    pub fn register_file(
        &self,
        path: &Path,
        temporary: bool,
    ) -> Result<Arc<PhysicalFontResource>, FontError> {
        let file = FontFile::from_path(path, 0);
        // Loads and caches the resource; `register` then finds it by file.
        let name = self.factory.load_resource(&file)?.full_name().to_string();
        self.register(&name, file, temporary.then(|| path.to_path_buf()))
    }

    fn register(
        &self,
        name: &str,
        file: FontFile,
        temporary: Option<PathBuf>,
    ) -> Result<Arc<PhysicalFontResource>, FontError> {
        let resource = self.factory.load_resource(&file)?;
        self.factory.insert(name, Arc::clone(&resource));
        log::info!(
            "Registered font '{}' as '{}'{}",
            resource.full_name(),
            name,
            if temporary.is_some() { " (temporary)" } else { "" }
        );
        let previous = self.registrations.lock().insert(
            name.to_lowercase(),
            Registration {
                resource: Arc::clone(&resource),
                temporary,
            },
        );
        if let Some(previous) = previous {
            if !Arc::ptr_eq(&previous.resource, &resource) {
                self.release(previous);
            }
        }
        Ok(resource)
    }

    /// Remove a font added with `register_embedded` or `register_file`.
    pub fn unregister(&self, name: &str) -> bool {
        let Some(registration) = self.registrations.lock().remove(&name.to_lowercase()) else {
            return false;
        };
        self.release(registration);
        true
    }

    fn release(&self, registration: Registration) {
        let resource = registration.resource;
        let key = resource.file().key();

        let composite = self.composites.write().remove(&key);
        if let Some(composite) = composite {
            let strikes = composite.strikes().drain();
            self.strikes
                .release_retained_for(&FontResource::Composite(composite));
            for strike in strikes {
                strike.dispose();
            }
        }
        self.strikes
            .release_retained_for(&FontResource::Physical(Arc::clone(&resource)));
        for strike in resource.strikes().drain() {
            strike.dispose();
        }
        self.factory.remove(&resource);
        log::info!("Unregistered font '{}'", resource.full_name());

        if let Some(path) = registration.temporary {
            remove_temporary(&path);
        }
    }

    /// Evict every strike nothing holds any more. Returns the eviction count.
    pub fn sweep_strikes(&self) -> usize {
        let mut composites = self.logical.resolved();
        composites.extend(self.composites.read().values().cloned());

        let mut evicted = 0;
        for composite in &composites {
            for strike in composite.strikes().sweep() {
                strike.dispose();
                evicted += 1;
            }
        }
        for resource in self.factory.resources() {
            evicted += sweep_physical(&resource);
        }
        if evicted > 0 {
            log::debug!("Swept {} unreachable strikes", evicted);
        }
        evicted
    }

    /// Drop retained strikes, then sweep.
    pub fn purge_strikes(&self) -> usize {
        let released = self.strikes.release_retained();
        log::debug!("Released {} retained strikes", released);
        self.sweep_strikes()
    }

    /// Release all strikes and resources and delete temporary font files.
    ///
    /// Idempotent. Fonts handed out earlier keep working; the registry only
    /// forgets them.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        self.strikes.release_retained();

        let mut composites = self.logical.resolved();
        composites.extend(self.composites.write().drain().map(|(_, c)| c));
        for composite in &composites {
            for strike in composite.strikes().drain() {
                strike.dispose();
            }
            composite.clear_glyph_cache();
        }
        for resource in self.factory.resources() {
            for strike in resource.strikes().drain() {
                strike.dispose();
            }
        }

        let registrations: Vec<Registration> =
            self.registrations.lock().drain().map(|(_, r)| r).collect();
        for path in registrations.into_iter().filter_map(|r| r.temporary) {
            remove_temporary(&path);
        }

        self.logical.clear();
        self.factory.clear();
        log::info!("Font registry shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}

impl Drop for FontRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn remove_temporary(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::info!("Removed temporary font file {:?}", path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => log::warn!("Failed to remove temporary font file {:?}: {}", path, err),
    }
}
