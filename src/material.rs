//! Named metal material presets.
//!
//! The table is fixed at build time and read-only for the whole run; the generator iterates it
//! in declaration order.

use crate::foundation::core::validate_path_component;
use crate::foundation::error::{TurntableError, TurntableResult};

/// A named physically-based metal preset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialPreset {
    /// Preset name, also used in sequence directory names.
    pub name: String,
    /// Metalness factor in `[0, 1]`.
    pub metalness: f32,
    /// Roughness factor in `[0, 1]`.
    pub roughness: f32,
    /// Linear base color, each channel in `[0, 1]`.
    pub color: [f32; 3],
}

impl MaterialPreset {
    /// Build a preset from its raw factors.
    pub fn new(name: impl Into<String>, metalness: f32, roughness: f32, color: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            metalness,
            roughness,
            color,
        }
    }

    /// Check that every factor is finite and within `[0, 1]`.
    pub fn validate(&self) -> TurntableResult<()> {
        validate_path_component("material", &self.name)?;
        let unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        if !unit(self.metalness) {
            return Err(TurntableError::validation(format!(
                "material '{}' metalness must be within [0, 1]",
                self.name
            )));
        }
        if !unit(self.roughness) {
            return Err(TurntableError::validation(format!(
                "material '{}' roughness must be within [0, 1]",
                self.name
            )));
        }
        if !self.color.iter().copied().all(unit) {
            return Err(TurntableError::validation(format!(
                "material '{}' color channels must be within [0, 1]",
                self.name
            )));
        }
        Ok(())
    }
}

/// Ordered, immutable set of material presets.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialTable {
    presets: Vec<MaterialPreset>,
}

impl MaterialTable {
    /// Build a table from presets, preserving their order.
    ///
    /// Names must be unique and every preset must validate.
    pub fn new(presets: Vec<MaterialPreset>) -> TurntableResult<Self> {
        let table = Self { presets };
        table.validate()?;
        Ok(table)
    }

    /// The built-in jewelry metal presets.
    pub fn builtin() -> Self {
        Self {
            presets: vec![
                MaterialPreset::new("platinum", 1.0, 0.15, [0.90, 0.89, 0.87]),
                MaterialPreset::new("white-gold", 1.0, 0.12, [0.95, 0.94, 0.90]),
                MaterialPreset::new("yellow-gold", 1.0, 0.15, [1.0, 0.766, 0.336]),
                MaterialPreset::new("rose-gold", 1.0, 0.18, [0.92, 0.64, 0.55]),
            ],
        }
    }

    /// Look up a preset by exact name.
    pub fn get(&self, name: &str) -> Option<&MaterialPreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Iterate presets in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, MaterialPreset> {
        self.presets.iter()
    }

    /// Preset names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Return `true` when the table holds no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Validate every preset and reject duplicate names.
    pub fn validate(&self) -> TurntableResult<()> {
        if self.presets.is_empty() {
            return Err(TurntableError::validation(
                "material table must contain at least one preset",
            ));
        }
        for (i, preset) in self.presets.iter().enumerate() {
            preset.validate()?;
            if self.presets[..i].iter().any(|p| p.name == preset.name) {
                return Err(TurntableError::validation(format!(
                    "duplicate material preset '{}'",
                    preset.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a MaterialTable {
    type Item = &'a MaterialPreset;
    type IntoIter = std::slice::Iter<'a, MaterialPreset>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[path = "../tests/unit/material.rs"]
mod tests;
