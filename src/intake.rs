//! File intake: drag-and-drop and file-picker selection.
//!
//! Both sources produce a list of files; only the first one is kept. The
//! selection is stored in a [`FileSlot`] owned by the form state, so the last
//! event to arrive wins.

use crate::error::UploadError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file chosen by the user, loaded into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name sent in the multipart `file` part and shown in the label.
    pub name: String,
    /// MIME type, when known.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk.
    ///
    /// The name is the final path component; the MIME type is guessed from
    /// the extension for the handful of data formats the form is used with.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => UploadError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => UploadError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => UploadError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!("Loaded {} ({} bytes)", path.display(), bytes.len());

        Ok(Self {
            mime: guess_mime(path).map(str::to_string),
            name,
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some("text/csv"),
        "tsv" => Some("text/tab-separated-values"),
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        _ => None,
    }
}

/// The shared "selected file" reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileSlot {
    #[default]
    Idle,
    FileSelected(SelectedFile),
}

impl FileSlot {
    /// Replace the slot with the first file of `files`, or clear it.
    ///
    /// Returns the new selection so callers can update the label.
    pub fn take_first(&mut self, files: Vec<SelectedFile>) -> Option<&SelectedFile> {
        *self = match files.into_iter().next() {
            Some(file) => FileSlot::FileSelected(file),
            None => FileSlot::Idle,
        };
        self.file()
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        match self {
            FileSlot::Idle => None,
            FileSlot::FileSelected(f) => Some(f),
        }
    }

    pub fn clear(&mut self) {
        *self = FileSlot::Idle;
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, FileSlot::FileSelected(_))
    }
}

/// Events on the dropzone.
///
/// Every variant is consumed by the form: none falls through to a default
/// handler (a browser would otherwise navigate to the dropped file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<SelectedFile>),
}

impl DragEvent {
    /// Highlight state of the dropzone after this event.
    pub fn highlights(&self) -> bool {
        matches!(self, DragEvent::Enter | DragEvent::Over)
    }
}

/// Load every path into a file list, as a picker would hand it over.
pub async fn load_file_list(paths: &[PathBuf]) -> Result<Vec<SelectedFile>, UploadError> {
    let mut files = Vec::with_capacity(paths.len());
    for p in paths {
        files.push(SelectedFile::from_path(p).await?);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn take_first_keeps_only_first() {
        let mut slot = FileSlot::default();
        let picked = slot
            .take_first(vec![
                SelectedFile::new("a.csv", b"a".to_vec()),
                SelectedFile::new("b.csv", b"b".to_vec()),
            ])
            .map(|f| f.name.clone());
        assert_eq!(picked.as_deref(), Some("a.csv"));
        assert_eq!(slot.file().map(|f| f.name.as_str()), Some("a.csv"));
    }

    #[test]
    fn take_first_with_empty_list_clears() {
        let mut slot = FileSlot::FileSelected(SelectedFile::new("a.csv", Vec::new()));
        assert!(slot.take_first(Vec::new()).is_none());
        assert_eq!(slot, FileSlot::Idle);
    }

    #[test]
    fn drag_highlight_states() {
        assert!(DragEvent::Enter.highlights());
        assert!(DragEvent::Over.highlights());
        assert!(!DragEvent::Leave.highlights());
        assert!(!DragEvent::Drop(vec![]).highlights());
    }

    #[test]
    fn debug_hides_file_contents() {
        let f = SelectedFile::new("secret.csv", b"password".to_vec());
        let dbg = format!("{f:?}");
        assert!(dbg.contains("secret.csv"));
        assert!(!dbg.contains("password"));
    }

    #[tokio::test]
    async fn from_path_reads_name_bytes_and_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("casos.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"index,date\n0,2020-06-01\n").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "casos.csv");
        assert_eq!(file.mime.as_deref(), Some("text/csv"));
        assert_eq!(file.len(), 24);
    }

    #[tokio::test]
    async fn from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectedFile::from_path(dir.path().join("nope.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::FileNotFound { .. }));
    }

    #[test]
    fn from_path_on_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = tokio_test::block_on(SelectedFile::from_path(dir.path()));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn load_file_list_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&b, b"bb").unwrap();

        let files = load_file_list(&[a, b]).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.bin"]);
        assert_eq!(files[1].mime, None);
    }
}
