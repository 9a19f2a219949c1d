#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use turntable::{
    FrameRGBA, MaterialPreset, ModelAsset, PipelineConfig, RenderBackend, Resolution,
    TurntableError, TurntableResult,
};

/// Smallest valid-looking GLB: the 12-byte header.
pub const TINY_GLB: &[u8] = b"glTF\x02\x00\x00\x00\x0c\x00\x00\x00";

pub fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "turntable_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

/// A config rooted at `root/models` and `root/out`, rendering tiny frames.
pub fn small_config(root: &Path) -> PipelineConfig {
    let mut cfg = PipelineConfig::default().with_roots(root.join("models"), root.join("out"));
    cfg.resolution = Resolution::square(8);
    cfg
}

pub fn write_model(cfg: &PipelineConfig, name: &str) -> PathBuf {
    std::fs::create_dir_all(&cfg.input_dir).unwrap();
    let path = cfg.input_dir.join(format!("{name}.glb"));
    std::fs::write(&path, TINY_GLB).unwrap();
    path
}

/// Sorted file names directly under `dir`, or empty if it does not exist.
pub fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[derive(Clone, Copy, Debug)]
pub enum BeginFailure {
    Unavailable,
    Session,
}

/// In-memory backend producing solid frames whose color depends on the angle.
#[derive(Debug)]
pub struct FakeBackend {
    pub resolution: Resolution,
    pub angle_step_deg: f64,
    pub fail_frames: BTreeSet<u32>,
    pub begin_failure: Option<BeginFailure>,
    /// Models whose sessions fail to open, by name.
    pub begin_failure_models: BTreeSet<String>,
    /// Frame from which every render reports a lost session.
    pub lose_session_at: Option<u32>,
    pub begins: usize,
    pub ends: usize,
    pub render_calls: usize,
    pub rendered_angles: Vec<f64>,
    open: bool,
}

impl FakeBackend {
    pub fn new(cfg: &PipelineConfig) -> Self {
        Self {
            resolution: cfg.resolution,
            angle_step_deg: cfg.angle_step_deg,
            fail_frames: BTreeSet::new(),
            begin_failure: None,
            begin_failure_models: BTreeSet::new(),
            lose_session_at: None,
            begins: 0,
            ends: 0,
            render_calls: 0,
            rendered_angles: Vec::new(),
            open: false,
        }
    }

    pub fn failing_at(mut self, frames: impl IntoIterator<Item = u32>) -> Self {
        self.fail_frames.extend(frames);
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl RenderBackend for FakeBackend {
    fn begin_sequence(
        &mut self,
        model: &ModelAsset,
        _material: &MaterialPreset,
    ) -> TurntableResult<()> {
        match self.begin_failure {
            Some(BeginFailure::Unavailable) => {
                return Err(TurntableError::backend_unavailable("fake renderer missing"));
            }
            Some(BeginFailure::Session) => {
                return Err(TurntableError::session("fake renderer refused"));
            }
            None => {}
        }
        if self.begin_failure_models.contains(&model.name) {
            return Err(TurntableError::session("fake renderer refused model"));
        }
        assert!(!self.open, "session opened twice");
        self.open = true;
        self.begins += 1;
        Ok(())
    }

    fn render_frame(
        &mut self,
        _model: &ModelAsset,
        _material: &MaterialPreset,
        angle_deg: f64,
    ) -> TurntableResult<FrameRGBA> {
        assert!(self.open, "render outside of a session");
        self.render_calls += 1;
        self.rendered_angles.push(angle_deg);
        let frame = (angle_deg / self.angle_step_deg).round() as u32;
        if self.lose_session_at.is_some_and(|at| frame >= at) {
            return Err(TurntableError::session("fake renderer exited"));
        }
        if self.fail_frames.contains(&frame) {
            return Err(TurntableError::render(format!("fake failure at frame {frame}")));
        }
        let shade = (frame * 7 % 256) as u8;
        Ok(FrameRGBA::solid(self.resolution, [shade, 64, 200, 255]))
    }

    fn end_sequence(&mut self) -> TurntableResult<()> {
        self.open = false;
        self.ends += 1;
        Ok(())
    }
}
