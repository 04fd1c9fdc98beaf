//! Pre-drawn SVG glyph fragments, one file per character or word.
//!
//! A directory of `<key>.svg` files is loaded once; each file's inner markup
//! (everything between the root `<svg ...>` and `</svg>`) is kept and later
//! placed with a translation.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::log::{info, warn};
use bevy::prelude::*;

use crate::error::CityError;

#[derive(Resource, Debug, Clone, Default)]
pub struct GlyphSet {
    fragments: HashMap<String, String>,
}

impl GlyphSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.svg` in `dir`, keyed by file stem. Unreadable files are
    /// logged and skipped.
    pub fn load_dir(dir: &Path) -> Result<Self, CityError> {
        let mut set = Self::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("svg") {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match fs::read_to_string(&path) {
                Ok(text) => set.insert(key, extract_svg_inner(&text)),
                Err(e) => warn!("Skipping glyph {}: {e}", path.display()),
            }
        }
        info!("Loaded {} glyph fragments from {}", set.len(), dir.display());
        Ok(set)
    }

    pub fn insert(&mut self, key: &str, markup: impl Into<String>) {
        self.fragments.insert(key.to_string(), markup.into());
    }

    pub fn get(&self, key: &str) -> Result<&str, CityError> {
        self.fragments
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| CityError::MissingAsset(format!("{key}.svg")))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fragments.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Strip the XML prolog and the root `<svg>` element, keeping its children.
/// Text without a root element is returned trimmed.
pub fn extract_svg_inner(text: &str) -> String {
    let Some(open) = text.find("<svg") else {
        return text.trim().to_string();
    };
    let Some(body_start) = text[open..].find('>').map(|i| open + i + 1) else {
        return String::new();
    };
    if text[..body_start].ends_with("/>") {
        return String::new();
    }
    let body_end = text.rfind("</svg>").unwrap_or(text.len());
    if body_end < body_start {
        return String::new();
    }
    text[body_start..body_end].trim().to_string()
}
