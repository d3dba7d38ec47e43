use futures::future::try_join_all;

use super::error::IntakeError;
use super::item::{UploadItem, UploadSet};
use super::raw_file::RawFile;

/// Default per-file size limit in megabytes
pub const DEFAULT_MAX_SIZE_MB: u64 = 10;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Count and size limits for one intake surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeLimits {
    pub max_files: usize,
    pub max_size_mb: u64,
}

impl IntakeLimits {
    pub fn new(max_files: usize, max_size_mb: u64) -> Self {
        Self {
            max_files,
            max_size_mb,
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// How many more items `current` can take
    pub fn remaining(&self, current: &UploadSet) -> usize {
        self.max_files.saturating_sub(current.len())
    }
}

/// Result of one batch submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// The replacement set (identical to the input when nothing was accepted)
    pub set: UploadSet,
    /// New value of the error slot
    pub error: Option<IntakeError>,
}

/// Truncate and size-check a batch
///
/// Files beyond the remaining capacity are dropped without an error. If any
/// kept file is over the limit the whole batch is rejected.
pub fn prepare_batch(
    mut files: Vec<RawFile>,
    current: &UploadSet,
    limits: &IntakeLimits,
) -> Result<Vec<RawFile>, IntakeError> {
    files.truncate(limits.remaining(current));

    let max_bytes = limits.max_size_bytes();
    if let Some(oversized) = files.iter().find(|f| f.size > max_bytes) {
        tracing::warn!(
            file = %oversized.name,
            size = oversized.size,
            limit_mb = limits.max_size_mb,
            "rejecting batch with oversized file"
        );
        return Err(IntakeError::SizeLimitExceeded {
            limit_mb: limits.max_size_mb,
        });
    }

    Ok(files)
}

/// Read and encode every file concurrently
///
/// Items come back in input order. The first read failure fails the whole
/// batch and the other results are discarded.
pub async fn decode_batch(files: Vec<RawFile>) -> Result<Vec<UploadItem>, IntakeError> {
    try_join_all(files.iter().map(encode_file)).await
}

async fn encode_file(file: &RawFile) -> Result<UploadItem, IntakeError> {
    let bytes = file
        .read()
        .await
        .map_err(|e| IntakeError::decode_failure(&file.name, e))?;

    Ok(UploadItem::encode(&file.name, &file.mime_type, &bytes))
}

/// Validate, encode and append a batch in one call
pub async fn submit_batch(
    files: Vec<RawFile>,
    current: &UploadSet,
    limits: &IntakeLimits,
) -> BatchOutcome {
    let unchanged = |error| BatchOutcome {
        set: current.clone(),
        error,
    };

    let accepted = match prepare_batch(files, current, limits) {
        Ok(accepted) => accepted,
        Err(err) => return unchanged(Some(err)),
    };
    if accepted.is_empty() {
        return unchanged(None);
    }

    match decode_batch(accepted).await {
        Ok(items) => BatchOutcome {
            set: current.appended(items),
            error: None,
        },
        Err(err) => {
            log_decode_failure(&err);
            unchanged(Some(err))
        }
    }
}

/// Drop the item at `index`; out-of-range indexes are ignored
pub fn remove_at(set: &UploadSet, index: usize) -> UploadSet {
    set.remove_at(index)
}

pub(crate) fn log_decode_failure(err: &IntakeError) {
    if let IntakeError::DecodeFailure { file, reason } = err {
        tracing::error!(%file, %reason, "file read error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::raw_file::FileContent;
    use pretty_assertions::assert_eq;

    const MB: u64 = 1024 * 1024;

    fn sized(name: &str, mime: &str, size: u64) -> RawFile {
        RawFile::new(name, mime, size, FileContent::Memory(name.as_bytes().into()))
    }

    fn names(set: &UploadSet) -> Vec<&str> {
        set.iter().map(UploadItem::name).collect()
    }

    #[test]
    fn test_prepare_truncates_to_remaining() {
        let current = UploadSet::new().appended([UploadItem::encode("old", "text/plain", b"")]);
        let files = vec![
            sized("a", "text/plain", 1),
            sized("b", "text/plain", 1),
            sized("c", "text/plain", 1),
        ];

        let kept = prepare_batch(files, &current, &IntakeLimits::new(3, 10)).unwrap();
        let kept: Vec<_> = kept.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(kept, vec!["a", "b"]);
    }

    #[test]
    fn test_prepare_full_set_accepts_nothing() {
        let current = UploadSet::new().appended([UploadItem::encode("old", "text/plain", b"")]);
        let kept = prepare_batch(
            vec![sized("a", "text/plain", 1)],
            &current,
            &IntakeLimits::new(1, 10),
        )
        .unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_prepare_ignores_oversized_file_past_capacity() {
        // The oversized file is truncated away before validation
        let files = vec![sized("a", "image/png", MB), sized("big", "image/png", 50 * MB)];
        let kept = prepare_batch(files, &UploadSet::new(), &IntakeLimits::new(1, 10)).unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_limit_is_inclusive() {
        let files = vec![sized("exact", "image/png", 10 * MB)];
        assert!(prepare_batch(files, &UploadSet::new(), &IntakeLimits::new(1, 10)).is_ok());

        let files = vec![sized("over", "image/png", 10 * MB + 1)];
        assert_eq!(
            prepare_batch(files, &UploadSet::new(), &IntakeLimits::new(1, 10)).unwrap_err(),
            IntakeError::SizeLimitExceeded { limit_mb: 10 }
        );
    }

    #[tokio::test]
    async fn test_submit_appends_after_existing() {
        let current = UploadSet::new().appended([UploadItem::encode("old", "text/plain", b"")]);
        let outcome = submit_batch(
            vec![sized("a", "image/jpeg", 1), sized("b", "text/plain", 1)],
            &current,
            &IntakeLimits::new(5, 10),
        )
        .await;

        assert_eq!(outcome.error, None);
        assert_eq!(names(&outcome.set), vec!["old", "a", "b"]);
    }

    #[tokio::test]
    async fn test_submit_read_failure_discards_batch() {
        let missing = RawFile::new(
            "gone.jpg",
            "image/jpeg",
            1,
            FileContent::Path("/nonexistent/gone.jpg".into()),
        );
        let outcome = submit_batch(
            vec![sized("ok", "image/jpeg", 1), missing],
            &UploadSet::new(),
            &IntakeLimits::new(3, 10),
        )
        .await;

        assert!(outcome.set.is_empty());
        assert!(matches!(
            outcome.error,
            Some(IntakeError::DecodeFailure { ref file, .. }) if file == "gone.jpg"
        ));
    }

    #[tokio::test]
    async fn test_submit_empty_batch_is_noop() {
        let outcome = submit_batch(Vec::new(), &UploadSet::new(), &IntakeLimits::new(3, 10)).await;
        assert_eq!(
            outcome,
            BatchOutcome {
                set: UploadSet::new(),
                error: None
            }
        );
    }

    #[test]
    fn test_zero_capacity_has_no_remaining() {
        assert_eq!(IntakeLimits::new(0, 10).remaining(&UploadSet::new()), 0);
    }
}
