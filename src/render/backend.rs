use std::io::Cursor;

use crate::foundation::core::Resolution;
use crate::foundation::error::{TurntableError, TurntableResult};
use crate::material::MaterialPreset;
use crate::model::ModelAsset;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **straight alpha**, tightly packed and row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// A frame filled with a single color.
    pub fn solid(resolution: Resolution, rgba: [u8; 4]) -> Self {
        let px = (resolution.width as usize) * (resolution.height as usize);
        let mut data = Vec::with_capacity(px * 4);
        for _ in 0..px {
            data.extend_from_slice(&rgba);
        }
        Self {
            width: resolution.width,
            height: resolution.height,
            data,
        }
    }

    /// Decode an encoded PNG snapshot.
    pub fn from_png(bytes: &[u8]) -> TurntableResult<Self> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| TurntableError::render(format!("decode png snapshot: {e}")))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            data: img.into_raw(),
        })
    }

    /// Encode as a lossless PNG.
    pub fn to_png(&self) -> TurntableResult<Vec<u8>> {
        self.validate()?;
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| TurntableError::validation("frame buffer does not match its size"))?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| TurntableError::encode(format!("png snapshot: {e}")))?;
        Ok(out)
    }

    /// Frame size.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }

    /// Check that the buffer is non-empty and holds exactly `width * height * 4` bytes.
    pub fn validate(&self) -> TurntableResult<()> {
        self.resolution().validate()?;
        let expected = self.resolution().rgba8_len();
        if self.data.len() != expected {
            return Err(TurntableError::validation(format!(
                "frame.data size mismatch: got {} bytes, expected {expected} for {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

/// A renderer that turns (model, material, angle) into a [`FrameRGBA`].
///
/// Backends are driven one sequence at a time: [`RenderBackend::begin_sequence`], then
/// [`RenderBackend::render_frame`] for each angle in increasing order, then
/// [`RenderBackend::end_sequence`]. Callers should go through [`SequenceSession`], which
/// guarantees `end_sequence` runs.
///
/// Only `render_frame` is required; in-memory backends can ignore the session hooks.
pub trait RenderBackend {
    /// Acquire whatever heavyweight resources one sequence needs.
    ///
    /// Return [`TurntableError::BackendUnavailable`] when the renderer cannot be started at all;
    /// any other error abandons only this sequence.
    fn begin_sequence(
        &mut self,
        _model: &ModelAsset,
        _material: &MaterialPreset,
    ) -> TurntableResult<()> {
        Ok(())
    }

    /// Render one frame with the model rotated by `angle_deg` about the vertical axis.
    fn render_frame(
        &mut self,
        model: &ModelAsset,
        material: &MaterialPreset,
        angle_deg: f64,
    ) -> TurntableResult<FrameRGBA>;

    /// Release the resources acquired by `begin_sequence`.
    fn end_sequence(&mut self) -> TurntableResult<()> {
        Ok(())
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn begin_sequence(
        &mut self,
        model: &ModelAsset,
        material: &MaterialPreset,
    ) -> TurntableResult<()> {
        (**self).begin_sequence(model, material)
    }

    fn render_frame(
        &mut self,
        model: &ModelAsset,
        material: &MaterialPreset,
        angle_deg: f64,
    ) -> TurntableResult<FrameRGBA> {
        (**self).render_frame(model, material, angle_deg)
    }

    fn end_sequence(&mut self) -> TurntableResult<()> {
        (**self).end_sequence()
    }
}

/// Exclusive, scoped use of a backend for one (model, material) sequence.
///
/// `end_sequence` is called by [`SequenceSession::close`] or, failing that, on drop, so teardown
/// happens whether or not individual frames failed.
pub struct SequenceSession<'a> {
    backend: &'a mut dyn RenderBackend,
    model: &'a ModelAsset,
    material: &'a MaterialPreset,
    open: bool,
}

impl<'a> SequenceSession<'a> {
    /// Start a sequence on `backend`.
    pub fn open(
        backend: &'a mut dyn RenderBackend,
        model: &'a ModelAsset,
        material: &'a MaterialPreset,
    ) -> TurntableResult<Self> {
        backend.begin_sequence(model, material)?;
        Ok(Self {
            backend,
            model,
            material,
            open: true,
        })
    }

    /// Render the session's model at `angle_deg`.
    pub fn render(&mut self, angle_deg: f64) -> TurntableResult<FrameRGBA> {
        self.backend
            .render_frame(self.model, self.material, angle_deg)
    }

    /// End the sequence and report teardown errors.
    pub fn close(mut self) -> TurntableResult<()> {
        self.open = false;
        self.backend.end_sequence()
    }
}

impl Drop for SequenceSession<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = self.backend.end_sequence() {
            tracing::warn!(
                model = %self.model.name,
                material = %self.material.name,
                error = %e,
                "render session teardown failed"
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
