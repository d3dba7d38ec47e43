/// Multi-file intake pipeline
///
/// This module handles:
/// - Describing picked or dropped files (raw_file.rs)
/// - Count/size validation and concurrent encoding (controller.rs)
/// - Data URI encoding and parsing (data_uri.rs)
/// - The per-field batch state machine (surface.rs)

pub mod controller;
pub mod data_uri;
pub mod error;
pub mod item;
pub mod raw_file;
pub mod surface;

pub use controller::{
    decode_batch, prepare_batch, remove_at, submit_batch, BatchOutcome, IntakeLimits,
    DEFAULT_MAX_SIZE_MB,
};
pub use error::{DataUriError, IntakeError};
pub use item::{UploadItem, UploadSet};
pub use raw_file::{collect_raw_files, FileContent, RawFile};
pub use surface::{BatchStart, IntakePhase, IntakeSurface};
