//! File selector: holds at most one PDF chosen for submission.
//!
//! Checks are advisory, matching what a browser drop zone does: the name must
//! end in `.pdf` and the size must not exceed the configured maximum
//! (10 MiB by default). No magic-byte sniffing happens on this side; the
//! service is the authority on whether the bytes are a readable PDF.
//!
//! A rejected candidate never disturbs the current selection.

use crate::config::DEFAULT_MAX_FILE_BYTES;
use crate::error::ValidatorError;
use crate::placeholders::{SELECTOR_HINT, SELECTOR_PROMPT};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A file accepted by the selector.
///
/// Bytes are shared, so snapshots taken for an in-flight submission are
/// cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in MiB with two decimals, e.g. `"1.25 MB"`.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size() as f64 / 1024.0 / 1024.0)
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

type ChangeCallback = Box<dyn FnMut(Option<&SelectedFile>) + Send>;

/// Single-file selector.
pub struct FileSelector {
    selected: Option<SelectedFile>,
    max_bytes: u64,
    on_change: Option<ChangeCallback>,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_BYTES)
    }
}

impl fmt::Debug for FileSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSelector")
            .field("selected", &self.selected)
            .field("max_bytes", &self.max_bytes)
            .field("on_change", &self.on_change.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl FileSelector {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            selected: None,
            max_bytes,
            on_change: None,
        }
    }

    /// Invoke `f` with the new selection (or `None` on clear) after every change.
    pub fn on_change(mut self, f: impl FnMut(Option<&SelectedFile>) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Select a file from disk.
    pub fn select_path(&mut self, path: impl AsRef<Path>) -> Result<&SelectedFile, ValidatorError> {
        let path = path.as_ref();
        let name = file_name(path);
        self.check_extension(&name)?;

        let meta = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
        if !meta.is_file() {
            return Err(ValidatorError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        // Size is checked before reading so an oversized file is never loaded.
        self.check_size(&name, meta.len())?;

        let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
        // The file may have grown since the metadata call.
        self.check_size(&name, bytes.len() as u64)?;
        self.accept(name, bytes)
    }

    /// Select an in-memory file, e.g. one handed over by a drop target.
    pub fn select_bytes(
        &mut self,
        name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Result<&SelectedFile, ValidatorError> {
        let name = name.into();
        let bytes = bytes.into();
        self.check_extension(&name)?;
        self.check_size(&name, bytes.len() as u64)?;
        self.accept(name, bytes)
    }

    /// Multi-file drop: only the first candidate is considered.
    ///
    /// Returns `Ok(None)` when `paths` is empty; the selection is unchanged.
    pub fn select_first<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Option<&SelectedFile>, ValidatorError> {
        match paths.into_iter().next() {
            Some(first) => self.select_path(first).map(Some),
            None => Ok(None),
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
        if let Some(cb) = self.on_change.as_mut() {
            cb(None);
        }
    }

    /// Two display lines: the file name and size, or the idle prompt.
    pub fn label(&self) -> [String; 2] {
        match &self.selected {
            Some(file) => [file.name().to_string(), file.size_label()],
            None => [SELECTOR_PROMPT.to_string(), SELECTOR_HINT.to_string()],
        }
    }

    fn check_extension(&self, name: &str) -> Result<(), ValidatorError> {
        let is_pdf = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            Ok(())
        } else {
            Err(ValidatorError::NotAPdf {
                name: name.to_string(),
            })
        }
    }

    fn check_size(&self, name: &str, size: u64) -> Result<(), ValidatorError> {
        if size > self.max_bytes {
            return Err(ValidatorError::FileTooLarge {
                name: name.to_string(),
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    fn accept(&mut self, name: String, bytes: Vec<u8>) -> Result<&SelectedFile, ValidatorError> {
        debug!("Selected '{}' ({} bytes)", name, bytes.len());
        let file = SelectedFile {
            name,
            bytes: bytes.into(),
        };
        if let Some(cb) = self.on_change.as_mut() {
            cb(Some(&file));
        }
        Ok(self.selected.insert(file))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn io_error(path: &Path, e: std::io::Error) -> ValidatorError {
    let path: PathBuf = path.to_path_buf();
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => ValidatorError::PermissionDenied { path },
        _ => ValidatorError::FileNotFound { path },
    }
}
