use super::controller::{self, IntakeLimits};
use super::error::IntakeError;
use super::item::{UploadItem, UploadSet};
use super::raw_file::RawFile;

/// Where an intake surface is in its batch lifecycle
///
/// Validation is synchronous inside `begin`, so it never shows up here.
/// `Collecting` covers the time a caller spends describing picked or
/// dropped paths before the batch reaches `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakePhase {
    #[default]
    Idle,
    Collecting,
    Decoding,
}

/// What the caller should do after `begin`
#[derive(Debug)]
pub enum BatchStart {
    /// A batch is already decoding; the new one was ignored
    Busy,
    /// Rejected during validation; the error slot is set
    Rejected,
    /// Nothing left to accept after truncation
    Nothing,
    /// Decode these files, then pass the result to `complete`
    Decode(Vec<RawFile>),
}

/// Per-field intake state: phase, error slot and drop-hover flag
///
/// The upload set itself is owned by the enclosing form. Changes are
/// proposed through the `on_change` callback as whole replacement sets.
#[derive(Debug, Clone)]
pub struct IntakeSurface {
    limits: IntakeLimits,
    phase: IntakePhase,
    error: Option<IntakeError>,
    dragging: bool,
}

impl IntakeSurface {
    pub fn new(limits: IntakeLimits) -> Self {
        Self {
            limits,
            phase: IntakePhase::Idle,
            error: None,
            dragging: false,
        }
    }

    pub fn limits(&self) -> &IntakeLimits {
        &self.limits
    }

    pub fn phase(&self) -> IntakePhase {
        self.phase
    }

    /// True while a batch is pending, collecting or decoding
    pub fn is_busy(&self) -> bool {
        self.phase != IntakePhase::Idle
    }

    pub fn error(&self) -> Option<&IntakeError> {
        self.error.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Multi-select picker only when more than one file fits
    pub fn allows_multiple(&self) -> bool {
        self.limits.max_files > 1
    }

    /// Claim the surface before describing paths in the background
    ///
    /// Returns false if another batch is already pending. A successful
    /// reservation must be followed by `begin` or `fail`.
    pub fn reserve(&mut self) -> bool {
        if self.is_busy() {
            tracing::debug!(phase = ?self.phase, "intake ignored while a batch is pending");
            return false;
        }
        self.phase = IntakePhase::Collecting;
        true
    }

    /// Start a batch: clear the error slot, truncate and validate
    ///
    /// Accepted from `Idle` or from the caller's own `Collecting`
    /// reservation; refused while decoding.
    pub fn begin(&mut self, files: Vec<RawFile>, current: &UploadSet) -> BatchStart {
        if self.phase == IntakePhase::Decoding {
            tracing::debug!("batch ignored while decoding");
            return BatchStart::Busy;
        }

        self.error = None;
        match controller::prepare_batch(files, current, &self.limits) {
            Err(err) => {
                self.phase = IntakePhase::Idle;
                self.error = Some(err);
                BatchStart::Rejected
            }
            Ok(accepted) if accepted.is_empty() => {
                self.phase = IntakePhase::Idle;
                BatchStart::Nothing
            }
            Ok(accepted) => {
                tracing::debug!(files = accepted.len(), "decoding batch");
                self.phase = IntakePhase::Decoding;
                BatchStart::Decode(accepted)
            }
        }
    }

    /// Record a failure that happened before validation (e.g. a dropped
    /// path that could not be inspected) and release the reservation
    pub fn fail(&mut self, err: IntakeError) {
        controller::log_decode_failure(&err);
        if self.phase == IntakePhase::Decoding {
            tracing::warn!("failure reported while another batch is decoding");
            return;
        }
        self.phase = IntakePhase::Idle;
        self.error = Some(err);
    }

    /// Finish a decoding batch and propose the new set
    pub fn complete(
        &mut self,
        result: Result<Vec<UploadItem>, IntakeError>,
        current: &UploadSet,
        on_change: impl FnOnce(UploadSet),
    ) {
        self.phase = IntakePhase::Idle;
        match result {
            Ok(items) => {
                tracing::info!(added = items.len(), total = current.len() + items.len(), "batch committed");
                on_change(current.appended(items));
            }
            Err(err) => {
                controller::log_decode_failure(&err);
                self.error = Some(err);
            }
        }
    }

    /// Propose the set without the item at `index`
    ///
    /// Ignored while decoding and for out-of-range indexes.
    pub fn remove(&self, index: usize, current: &UploadSet, on_change: impl FnOnce(UploadSet)) {
        if self.is_busy() || index >= current.len() {
            return;
        }
        on_change(controller::remove_at(current, index));
    }
}
