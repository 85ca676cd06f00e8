//! The four logical families and their memoized composite resources.
//!
//! A logical font is addressed as `(family, bold, italic)`. Each of the 16
//! combinations resolves once to a composite whose primary is the first
//! configured platform family the directory can find in that style.

use std::sync::Arc;

use fontweft_config::{LogicalFamilies, canonical_family_name};
use parking_lot::RwLock;

use crate::composite::{CompositeFontResource, CompositeKind};
use crate::factory::FontFactory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalFamily {
    System,
    Serif,
    SansSerif,
    Monospaced,
}

const STYLE_NAMES: &[(&str, bool, bool)] = &[
    ("regular", false, false),
    ("bold", true, false),
    ("italic", false, true),
    ("bold italic", true, true),
];

impl LogicalFamily {
    pub const ALL: [LogicalFamily; 4] = [
        LogicalFamily::System,
        LogicalFamily::Serif,
        LogicalFamily::SansSerif,
        LogicalFamily::Monospaced,
    ];

    /// Canonical family for `name`, or `None` if it is not a logical family.
    pub fn from_name(name: &str) -> Option<LogicalFamily> {
        let canonical = canonical_family_name(name)?;
        LogicalFamily::ALL
            .into_iter()
            .find(|family| family.name() == canonical)
    }

    /// Canonical name, as used in logical full names.
    pub fn name(self) -> &'static str {
        match self {
            LogicalFamily::System => "System",
            LogicalFamily::Serif => "Serif",
            LogicalFamily::SansSerif => "SansSerif",
            LogicalFamily::Monospaced => "Monospaced",
        }
    }

    /// Platform families configured for this logical family, in order.
    pub fn platform_families(self, families: &LogicalFamilies) -> &[String] {
        match self {
            LogicalFamily::System => &families.system,
            LogicalFamily::Serif => &families.serif,
            LogicalFamily::SansSerif => &families.sans_serif,
            LogicalFamily::Monospaced => &families.monospaced,
        }
    }

    fn table_index(self, bold: bool, italic: bool) -> usize {
        self as usize * 4 + bold as usize + 2 * italic as usize
    }
}

/// Split a logical full name such as "SansSerif Bold Italic".
///
/// Only the styles "Regular", "Bold", "Italic" and "Bold Italic" are
/// accepted; anything else (including no style at all) yields `None`.
pub fn parse_logical_name(full_name: &str) -> Option<(LogicalFamily, bool, bool)> {
    let (family, style) = full_name.trim().split_once(' ')?;
    let family = LogicalFamily::from_name(family)?;
    let style = style.trim();
    STYLE_NAMES
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(style))
        .map(|&(_, bold, italic)| (family, bold, italic))
}

/// Memo table of logical composites.
pub struct LogicalFonts {
    families: LogicalFamilies,
    factory: Arc<FontFactory>,
    table: RwLock<[Option<Arc<CompositeFontResource>>; 16]>,
}

impl std::fmt::Debug for LogicalFonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let resolved = self.table.read().iter().filter(|e| e.is_some()).count();
        f.debug_struct("LogicalFonts")
            .field("families", &self.families)
            .field("resolved", &resolved)
            .finish()
    }
}

impl LogicalFonts {
    pub fn new(families: LogicalFamilies, factory: Arc<FontFactory>) -> Self {
        Self {
            families,
            factory,
            table: RwLock::new([const { None }; 16]),
        }
    }

    /// Composite for `(family, bold, italic)`, resolved on first use.
    ///
    /// `None` when no configured platform family exists in the directory.
    pub fn composite(
        &self,
        family: LogicalFamily,
        bold: bool,
        italic: bool,
    ) -> Option<Arc<CompositeFontResource>> {
        let index = family.table_index(bold, italic);
        if let Some(composite) = &self.table.read()[index] {
            return Some(Arc::clone(composite));
        }

        let primary = family
            .platform_families(&self.families)
            .iter()
            .find_map(|name| self.factory.resource_for_family(name, bold, italic));
        let Some(primary) = primary else {
            log::warn!(
                "No platform family found for logical font {} (tried {:?})",
                family.name(),
                family.platform_families(&self.families)
            );
            return None;
        };

        let mut table = self.table.write();
        let composite = table[index].get_or_insert_with(|| {
            log::info!(
                "Logical font {} (bold={}, italic={}) uses '{}'",
                family.name(),
                bold,
                italic,
                primary.full_name()
            );
            Arc::new(CompositeFontResource::new(
                CompositeKind::Logical {
                    family,
                    bold,
                    italic,
                },
                primary,
                Arc::clone(&self.factory),
            ))
        });
        Some(Arc::clone(composite))
    }

    /// Logical composites resolved so far.
    pub fn resolved(&self) -> Vec<Arc<CompositeFontResource>> {
        self.table.read().iter().flatten().cloned().collect()
    }

    pub fn clear(&self) {
        *self.table.write() = [const { None }; 16];
    }
}
