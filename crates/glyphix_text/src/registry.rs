//! Font registry for system font discovery and caching
//!
//! Uses fontdb to find faces by family name. Only a handful of well-known
//! system font files are loaded up front; the full system scan is deferred
//! until a lookup misses.

use crate::font::{Font, FontFace};
use crate::{Result, TextError};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::Arc;

/// Known system font paths, loaded directly without scanning all fonts
#[cfg(target_os = "macos")]
const KNOWN_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/SFNS.ttf",
    "/System/Library/Fonts/SFNSMono.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Menlo.ttc",
];

#[cfg(target_os = "windows")]
const KNOWN_FONT_PATHS: &[&str] = &[
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const KNOWN_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/system/fonts/Roboto-Regular.ttf",
];

/// Named faces tried when the system UI font is requested
const SYSTEM_FALLBACK_NAMES: &[&str] = &[
    "SF Pro",
    "Segoe UI",
    "Roboto",
    "Helvetica",
    "Noto Sans",
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
];

/// Font registry that discovers and caches system fonts
pub struct FontRegistry {
    db: Database,
    /// Cached lookups (None = known miss)
    faces: FxHashMap<String, Option<Arc<FontFace>>>,
    system_fonts_loaded: bool,
}

impl FontRegistry {
    /// Create a registry seeded with known system fonts
    pub fn new() -> Self {
        let mut registry = Self::empty();

        let mut loaded_count = 0;
        for path in KNOWN_FONT_PATHS {
            if Path::new(path).exists() && registry.db.load_font_file(path).is_ok() {
                loaded_count += 1;
            }
        }
        tracing::debug!("Loaded {} known system fonts", loaded_count);

        registry
    }

    /// Create a registry that only knows fonts loaded explicitly
    pub fn empty() -> Self {
        Self {
            db: Database::new(),
            faces: FxHashMap::default(),
            // An empty registry never scans the system.
            system_fonts_loaded: true,
        }
    }

    /// Register bundled font data; returns the number of faces added
    pub fn load_font_data(&mut self, data: Vec<u8>) -> usize {
        let before = self.db.faces().count();
        self.db.load_font_data(data);
        let loaded = self.db.faces().count() - before;
        if loaded > 0 {
            // Earlier misses may now resolve.
            self.faces.retain(|_, face| face.is_some());
            tracing::debug!("Loaded {} font faces from data", loaded);
        }
        loaded
    }

    /// Family names of every known face
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    /// Load the face best matching `font`.
    ///
    /// The system family resolves to the platform sans-serif face.
    pub fn load_font(&mut self, font: &Font) -> Result<Arc<FontFace>> {
        let cache_key = format!("{}:w{}", font.family, font.weight.to_number());
        if let Some(cached) = self.faces.get(&cache_key) {
            return cached.clone().ok_or_else(|| {
                TextError::FontLoadError(format!("Font '{}' not found (cached)", font.family))
            });
        }

        let mut id = self.find_font_id(font);
        if id.is_none() && !self.system_fonts_loaded {
            self.ensure_system_fonts_loaded();
            id = self.find_font_id(font);
        }

        let Some(id) = id else {
            self.faces.insert(cache_key, None);
            return Err(TextError::FontLoadError(format!(
                "Font '{}' not found",
                font.family
            )));
        };

        let face = Arc::new(self.load_face_by_id(id)?);
        self.faces.insert(cache_key, Some(Arc::clone(&face)));
        Ok(face)
    }

    fn ensure_system_fonts_loaded(&mut self) {
        if self.system_fonts_loaded {
            return;
        }
        tracing::debug!("Loading all system fonts (lazy scan)...");
        self.db.load_system_fonts();
        self.system_fonts_loaded = true;
        tracing::debug!("System fonts loaded: {} faces", self.db.faces().count());
    }

    fn find_font_id(&self, font: &Font) -> Option<fontdb::ID> {
        let weight = Weight(font.weight.to_number());
        let query_family = |family: Family<'_>| {
            self.db.query(&Query {
                families: &[family],
                weight,
                stretch: Stretch::Normal,
                style: Style::Normal,
            })
        };

        if !font.is_system() {
            return query_family(Family::Name(font.family.as_str()));
        }

        query_family(Family::SansSerif).or_else(|| {
            SYSTEM_FALLBACK_NAMES
                .iter()
                .find_map(|name| query_family(Family::Name(name)))
        })
    }

    fn load_face_by_id(&self, id: fontdb::ID) -> Result<FontFace> {
        self.db
            .with_face_data(id, |data, face_index| {
                FontFace::from_data_with_index(data.to_vec(), face_index)
            })
            .unwrap_or_else(|| {
                Err(TextError::FontLoadError(
                    "Font source not readable".to_string(),
                ))
            })
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_misses_are_cached() {
        let mut registry = FontRegistry::empty();
        assert!(registry.families().is_empty());

        let font = Font::new("Definitely Not A Font", 12.0);
        assert!(registry.load_font(&font).is_err());
        assert!(registry.faces.contains_key("Definitely Not A Font:w400"));
        assert!(registry.load_font(&font).is_err());
    }

    #[test]
    fn test_load_system_font() {
        let mut registry = FontRegistry::new();
        let face = match registry.load_font(&Font::default()) {
            Ok(face) => face,
            Err(_) => {
                println!("No system fonts available - skipping test (CI environment)");
                return;
            }
        };
        assert!(face.metrics().units_per_em > 0);

        // Second lookup comes from the cache.
        let again = registry.load_font(&Font::default()).unwrap();
        assert!(Arc::ptr_eq(&face, &again));
    }
}
