//! Named palettes shared between style policies.
//!
//! Scales are handed out as `Arc`s. Reloading a palette builds a new scale
//! and swaps the `Arc` under the write lock, so a reader holding the old
//! scale keeps a consistent table until it drops it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use style_common::{PaletteDefinition, StyleConfig, StyleError, StyleResult};

use crate::colorscale::ColorScale;

#[derive(Debug, Default)]
pub struct PaletteRegistry {
    palettes: RwLock<HashMap<String, Arc<ColorScale>>>,
}

impl PaletteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resample every palette of a configuration. Fails on the first
    /// invalid definition.
    pub fn from_config(config: &StyleConfig) -> StyleResult<Self> {
        let registry = Self::new();
        for (name, def) in &config.palettes {
            let scale = ColorScale::from_definition(def)
                .map_err(|e| StyleError::ValidationError(format!("{}: {}", name, e)))?;
            registry.insert(name, scale);
        }
        Ok(registry)
    }

    /// Get a palette by name.
    pub fn get(&self, name: &str) -> StyleResult<Arc<ColorScale>> {
        let palettes = self.palettes.read().unwrap_or_else(PoisonError::into_inner);
        palettes
            .get(name)
            .cloned()
            .ok_or_else(|| StyleError::PaletteNotFound(name.to_string()))
    }

    /// Publish a scale under `name`, returning the one it replaces.
    pub fn insert(&self, name: &str, scale: ColorScale) -> Option<Arc<ColorScale>> {
        self.publish(name, Arc::new(scale))
    }

    fn publish(&self, name: &str, scale: Arc<ColorScale>) -> Option<Arc<ColorScale>> {
        let mut palettes = self.palettes.write().unwrap_or_else(PoisonError::into_inner);
        let previous = palettes.insert(name.to_string(), scale);
        tracing::debug!(palette = %name, replaced = previous.is_some(), "Published color scale");
        previous
    }

    /// Rebuild a palette from a changed definition.
    ///
    /// The new scale is fully built before it is published; on error the
    /// registry is left untouched.
    pub fn reload(&self, name: &str, def: &PaletteDefinition) -> StyleResult<Arc<ColorScale>> {
        let scale = Arc::new(ColorScale::from_definition(def)?);
        self.publish(name, Arc::clone(&scale));
        Ok(scale)
    }

    /// Palette names, sorted.
    pub fn names(&self) -> Vec<String> {
        let palettes = self.palettes.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = palettes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.palettes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
