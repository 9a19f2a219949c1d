//! Lighting and material recipe handed to the renderer for every frame.
//!
//! The renderer is opaque to this crate; the recipe is a visual-parity target. It pairs an
//! exposure-boosted filmic tone map with a forced emissive term on the metal, which keeps
//! metallic renders from coming out dark under the fixed light rig.

use crate::material::MaterialPreset;

/// Tone-mapping exposure applied by the renderer.
pub const EXPOSURE: f32 = 1.8;
/// Self-illumination strength added to the replacement metal material.
pub const EMISSIVE_INTENSITY: f32 = 0.1;
/// Opacity of gemstone meshes.
pub const STONE_OPACITY: f32 = 0.8;
/// Edge length of the box models are scaled to fit.
pub const FIT_SIZE: f32 = 2.0;
/// Lower-cased mesh-name fragments that mark a gemstone.
pub const STONE_NAME_PATTERNS: [&str; 2] = ["gem", "diamond"];

/// Tone-mapping operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    /// ACES filmic curve.
    AcesFilmic,
}

/// Position of a directional light in the rig.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LightRole {
    /// Main light.
    Key,
    /// Softens shadows opposite the key.
    Fill,
    /// Back light separating the silhouette.
    Rim,
    /// Supplemental highlight from above.
    Top,
    /// Supplemental highlight from below.
    Bottom,
}

/// One light of the rig.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    /// Uniform ambient term.
    Ambient {
        /// Linear RGB color.
        color: [f32; 3],
        /// Intensity multiplier.
        intensity: f32,
    },
    /// Sky/ground gradient.
    Hemisphere {
        /// Color from above.
        sky: [f32; 3],
        /// Color from below.
        ground: [f32; 3],
        /// Intensity multiplier.
        intensity: f32,
    },
    /// Directional light placed at `position`, aimed at the origin.
    Directional {
        /// Role in the rig.
        role: LightRole,
        /// Linear RGB color.
        color: [f32; 3],
        /// Intensity multiplier.
        intensity: f32,
        /// World-space position.
        position: [f32; 3],
    },
}

/// Physically-based material parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PbrMaterial {
    /// Linear base color.
    pub color: [f32; 3],
    /// Metalness factor.
    pub metalness: f32,
    /// Roughness factor.
    pub roughness: f32,
    /// Emissive color.
    pub emissive: [f32; 3],
    /// Emissive intensity.
    pub emissive_intensity: f32,
    /// Opacity; only honored when `transparent` is set.
    pub opacity: f32,
    /// Enable alpha blending.
    pub transparent: bool,
}

impl PbrMaterial {
    /// Replacement metal material for a preset.
    pub fn metal(preset: &MaterialPreset) -> Self {
        Self {
            color: preset.color,
            metalness: preset.metalness,
            roughness: preset.roughness,
            emissive: preset.color,
            emissive_intensity: EMISSIVE_INTENSITY,
            opacity: 1.0,
            transparent: false,
        }
    }

    /// Faceted stone override.
    pub fn stone() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            metalness: 0.0,
            roughness: 0.0,
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 0.0,
            opacity: STONE_OPACITY,
            transparent: true,
        }
    }
}

/// Override applied to meshes whose name marks them as a stone.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StoneOverride {
    /// Lower-cased name fragments; a mesh matches if its lower-cased name contains any.
    pub name_patterns: Vec<String>,
    /// Material used for matching meshes.
    pub material: PbrMaterial,
}

/// Perspective camera.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// World-space position.
    pub position: [f32; 3],
    /// Look-at target.
    pub target: [f32; 3],
}

/// Everything the renderer needs to build the scene for one frame.
///
/// The renderer rebuilds the scene from this recipe on every frame and disposes the previous
/// frame's objects when `dispose_previous` is set.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneRecipe {
    /// Render with a transparent background.
    pub transparent_background: bool,
    /// Tone-mapping operator.
    pub tone_mapping: ToneMapping,
    /// Tone-mapping exposure.
    pub exposure: f32,
    /// Light rig.
    pub lights: Vec<Light>,
    /// Camera.
    pub camera: Camera,
    /// Models are centered and uniformly scaled so their largest extent equals this.
    pub fit_size: f32,
    /// Material that wholesale replaces every mesh material.
    pub material: PbrMaterial,
    /// Stone override.
    pub stone: StoneOverride,
    /// Free the previous frame's model and materials before rendering.
    pub dispose_previous: bool,
}

impl SceneRecipe {
    /// Build the fixed recipe for one material preset.
    pub fn for_material(preset: &MaterialPreset) -> Self {
        Self {
            transparent_background: true,
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: EXPOSURE,
            lights: light_rig(),
            camera: Camera {
                fov_deg: 45.0,
                position: [0.0, 1.0, 4.0],
                target: [0.0, 0.0, 0.0],
            },
            fit_size: FIT_SIZE,
            material: PbrMaterial::metal(preset),
            stone: StoneOverride {
                name_patterns: STONE_NAME_PATTERNS.iter().map(|s| s.to_string()).collect(),
                material: PbrMaterial::stone(),
            },
            dispose_previous: true,
        }
    }

    /// Return `true` if a mesh named `mesh_name` receives the stone override.
    pub fn is_stone_mesh(&self, mesh_name: &str) -> bool {
        let lower = mesh_name.to_lowercase();
        self.stone
            .name_patterns
            .iter()
            .any(|p| lower.contains(p.as_str()))
    }

    /// Material a mesh named `mesh_name` ends up with.
    pub fn material_for_mesh(&self, mesh_name: &str) -> &PbrMaterial {
        if self.is_stone_mesh(mesh_name) {
            &self.stone.material
        } else {
            &self.material
        }
    }
}

/// Ambient + hemisphere + key/fill/rim + top/bottom.
fn light_rig() -> Vec<Light> {
    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
    vec![
        Light::Ambient {
            color: WHITE,
            intensity: 0.6,
        },
        Light::Hemisphere {
            sky: WHITE,
            ground: [0.27, 0.27, 0.27],
            intensity: 0.8,
        },
        Light::Directional {
            role: LightRole::Key,
            color: WHITE,
            intensity: 2.0,
            position: [5.0, 5.0, 5.0],
        },
        Light::Directional {
            role: LightRole::Fill,
            color: WHITE,
            intensity: 1.0,
            position: [-5.0, 3.0, 5.0],
        },
        Light::Directional {
            role: LightRole::Rim,
            color: WHITE,
            intensity: 1.5,
            position: [0.0, 5.0, -5.0],
        },
        Light::Directional {
            role: LightRole::Top,
            color: WHITE,
            intensity: 1.0,
            position: [0.0, 10.0, 0.0],
        },
        Light::Directional {
            role: LightRole::Bottom,
            color: WHITE,
            intensity: 0.5,
            position: [0.0, -10.0, 0.0],
        },
    ]
}

/// Convert a rotation angle to radians, coercing non-finite input to zero.
pub fn rotation_radians(angle_deg: f64) -> f64 {
    if angle_deg.is_finite() {
        angle_deg.to_radians()
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
