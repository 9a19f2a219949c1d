use crate::foundation::core::FrameIndex;

/// Final state of one frame after a generator pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOutcome {
    /// Rendered and every attempted format was written.
    Rendered,
    /// Rendered, but at least one format failed to encode.
    PartiallyEncoded,
    /// Already present on disk; the backend was not called.
    Skipped,
    /// Rendering or encoding failed outright and placeholders were written.
    Placeholder,
    /// Rendering failed and nothing was written.
    Failed,
}

/// Progress event emitted once per frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameProgress {
    /// Caller-supplied correlation id, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Model name.
    pub model: String,
    /// Material preset name.
    pub material: String,
    /// Frame index.
    pub frame: FrameIndex,
    /// Frames in the sequence.
    pub total: u32,
    /// What happened to the frame.
    pub outcome: FrameOutcome,
}

/// Receives [`FrameProgress`] events while a sequence runs.
///
/// Implemented for every `FnMut(&FrameProgress)` closure.
pub trait ProgressObserver {
    /// Called after each frame has been processed.
    fn on_frame(&mut self, progress: &FrameProgress);
}

impl<F: FnMut(&FrameProgress)> ProgressObserver for F {
    fn on_frame(&mut self, progress: &FrameProgress) {
        self(progress)
    }
}

/// Observer that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_frame(&mut self, _progress: &FrameProgress) {}
}

/// Counters for one (model, material) sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceReport {
    /// Model name.
    pub model: String,
    /// Material preset name.
    pub material: String,
    /// Frames in the sequence.
    pub frames_total: u64,
    /// Frames rendered and fully encoded.
    pub rendered: u64,
    /// Frames rendered with at least one failed format.
    pub partially_encoded: u64,
    /// Frames skipped because they already existed.
    pub skipped: u64,
    /// Frames whose render call failed.
    pub render_failed: u64,
    /// Frames that ended up as placeholders.
    pub placeholders: u64,
}

impl SequenceReport {
    pub(crate) fn new(model: &str, material: &str) -> Self {
        Self {
            model: model.to_string(),
            material: material.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, outcome: FrameOutcome) {
        self.frames_total += 1;
        match outcome {
            FrameOutcome::Rendered => self.rendered += 1,
            FrameOutcome::PartiallyEncoded => self.partially_encoded += 1,
            FrameOutcome::Skipped => self.skipped += 1,
            FrameOutcome::Placeholder => self.placeholders += 1,
            FrameOutcome::Failed => {}
        }
    }
}

/// A sequence that could not be generated at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedSequence {
    /// Model name or file path.
    pub model: String,
    /// Material preset name, or `None` when the model itself failed to load.
    pub material: Option<String>,
    /// Error text.
    pub error: String,
}

/// Outcome of a full batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Sequences that ran, in processing order.
    pub sequences: Vec<SequenceReport>,
    /// Models or sequences that were abandoned.
    pub failed: Vec<FailedSequence>,
}

impl BatchReport {
    /// Sum of `rendered` across sequences.
    pub fn frames_rendered(&self) -> u64 {
        self.sequences.iter().map(|s| s.rendered).sum()
    }

    /// Sum of `skipped` across sequences.
    pub fn frames_skipped(&self) -> u64 {
        self.sequences.iter().map(|s| s.skipped).sum()
    }

    /// Sum of `placeholders` across sequences.
    pub fn frames_placeholder(&self) -> u64 {
        self.sequences.iter().map(|s| s.placeholders).sum()
    }
}
