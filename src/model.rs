//! Input model discovery and loading.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use base64::Engine as _;

use crate::foundation::core::validate_path_component;
use crate::foundation::error::{TurntableError, TurntableResult};

/// Magic bytes at the start of every binary glTF container.
pub const GLB_MAGIC: &[u8; 4] = b"glTF";

/// MIME type used in model data URIs.
pub const GLB_MIME: &str = "model/gltf-binary";

/// A binary glTF model loaded into memory.
///
/// The renderer never touches the filesystem; models are shipped to it as data URIs.
#[derive(Clone, Debug)]
pub struct ModelAsset {
    /// Model identifier (file stem), used in sequence directory names.
    pub name: String,
    /// Source file the bytes were read from.
    pub path: PathBuf,
    /// Raw GLB bytes.
    pub bytes: Vec<u8>,
}

impl ModelAsset {
    /// Build a model from in-memory GLB bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        bytes: Vec<u8>,
    ) -> TurntableResult<Self> {
        let name = name.into();
        validate_path_component("model", &name)?;
        if !bytes.starts_with(GLB_MAGIC) {
            return Err(TurntableError::validation(format!(
                "model '{name}' is not a binary glTF file (missing 'glTF' magic)"
            )));
        }
        Ok(Self {
            name,
            path: path.into(),
            bytes,
        })
    }

    /// Read and validate a model file. The model name is the file stem.
    pub fn load(path: &Path) -> TurntableResult<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                TurntableError::validation(format!(
                    "model path '{}' has no usable file name",
                    path.display()
                ))
            })?
            .to_string();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read model '{}'", path.display()))?;
        Self::from_bytes(name, path, bytes)
    }

    /// Encode the model as a `data:model/gltf-binary;base64,...` URI.
    pub fn to_data_uri(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{GLB_MIME};base64,{b64}")
    }
}

/// List model files in `dir` whose extension matches `extension` (case-insensitive).
///
/// Results are sorted by file name so runs enumerate models in a stable order.
pub fn discover_models(dir: &Path, extension: &str) -> TurntableResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read model directory '{}'", dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("list model directory '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            out.push(path);
        }
    }
    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
