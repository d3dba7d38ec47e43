/// Raw file intake
///
/// Turns picked or dropped paths into `RawFile` values: name, MIME type and
/// size are known up front so validation can run before any content is read.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncReadExt;

use super::error::IntakeError;

/// Fallback when neither the extension nor the content identifies the file
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Bytes read from the head of a file when sniffing image signatures
const SNIFF_LEN: usize = 32;

/// Where a raw file's content comes from
#[derive(Debug, Clone)]
pub enum FileContent {
    /// A file on disk, read lazily during encoding
    Path(PathBuf),
    /// Content already in memory
    Memory(Arc<[u8]>),
}

/// A file proposed for intake, not yet validated or encoded
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub mime_type: String,
    /// Byte length used for size validation
    pub size: u64,
    pub content: FileContent,
}

impl RawFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
        content: FileContent,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            content,
        }
    }

    /// In-memory file; size is the byte length
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, mime_type, size, FileContent::Memory(bytes.into()))
    }

    /// Describe a file on disk without reading its content
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }

        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let mime_type = detect_mime_type(path).await;

        Ok(Self::new(
            name,
            mime_type,
            metadata.len(),
            FileContent::Path(path.to_path_buf()),
        ))
    }

    /// Read the full content
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.content {
            FileContent::Path(path) => tokio::fs::read(path).await,
            FileContent::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// Describe every picked or dropped path, in order
///
/// A path that cannot be inspected fails the whole batch, same as a read
/// failure during encoding.
pub async fn collect_raw_files(paths: Vec<PathBuf>) -> Result<Vec<RawFile>, IntakeError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = RawFile::from_path(&path)
            .await
            .map_err(|e| IntakeError::decode_failure(&path.display().to_string(), e))?;
        files.push(file);
    }
    Ok(files)
}

/// Guess the MIME type from the extension, then from image signatures
async fn detect_mime_type(path: &Path) -> String {
    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        return mime.to_string();
    }

    match sniff_image_format(path).await {
        Some(mime) => mime.to_string(),
        None => OCTET_STREAM.to_string(),
    }
}

async fn sniff_image_format(path: &Path) -> Option<&'static str> {
    let mut file = tokio::fs::File::open(path).await.ok()?;
    let mut head = [0u8; SNIFF_LEN];
    let n = file.read(&mut head).await.ok()?;

    image::guess_format(&head[..n])
        .ok()
        .map(|format| format.to_mime_type())
}
