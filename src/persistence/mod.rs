//! File persistence.
//!
//! Reading and writing go through a [`Platform`], an injected capability that
//! may be missing. Without it (or in download mode) saving still works by
//! dropping a uniquely named `markdownfile.md` into the download directory,
//! and opening is unavailable.

mod platform;

pub use platform::{NativePlatform, Platform, UnsupportedPlatform};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// MIME type of downloaded documents.
pub const MARKDOWN_MIME: &str = "text/markdown";
pub const DOWNLOAD_STEM: &str = "markdownfile";
pub const DOWNLOAD_EXTENSION: &str = "md";

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File access is not available here")]
    CapabilityUnavailable,
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("{0} is not valid UTF-8 text")]
    InvalidEncoding(PathBuf),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::InvalidData => Self::InvalidEncoding(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// A path the user chose or passed at launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle(PathBuf);

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name for display, falling back to the whole path.
    pub fn name(&self) -> String {
        self.0
            .file_name()
            .map_or_else(|| self.0.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceMode {
    /// Read and write the user's file in place.
    #[default]
    FileHandle,
    /// Always save by download.
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Disabled,
    EnabledNoFile,
    EnabledWithFile,
}

impl FileState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disabled => "download only",
            Self::EnabledNoFile => "no file",
            Self::EnabledWithFile => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to the current handle.
    Saved(PathBuf),
    /// Written as a new file in the download directory.
    Downloaded(PathBuf),
    /// No handle yet; ask the user for a target and call
    /// [`FilePersistence::save_as`].
    NeedsTarget,
}

/// Where download-mode saves land.
#[derive(Debug, Clone)]
pub struct Downloads {
    dir: PathBuf,
}

impl Downloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `text` under the first free download name.
    pub fn save(&self, text: &str) -> Result<PathBuf, FileError> {
        fs::create_dir_all(&self.dir).map_err(|err| FileError::from_io(&self.dir, err))?;
        let path = self.next_free_path();
        fs::write(&path, text).map_err(|err| FileError::from_io(&path, err))?;
        tracing::info!(path = %path.display(), mime = MARKDOWN_MIME, "downloaded document");
        Ok(path)
    }

    /// `markdownfile.md`, then `markdownfile (1).md`, `markdownfile (2).md`, ...
    pub fn next_free_path(&self) -> PathBuf {
        let first = self.dir.join(format!("{DOWNLOAD_STEM}.{DOWNLOAD_EXTENSION}"));
        if !first.exists() {
            return first;
        }
        (1..)
            .map(|n| {
                self.dir
                    .join(format!("{DOWNLOAD_STEM} ({n}).{DOWNLOAD_EXTENSION}"))
            })
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }
}

impl Default for Downloads {
    fn default() -> Self {
        Self::new(default_download_dir())
    }
}

/// `$HOME/Downloads` when it exists, else the working directory.
pub fn default_download_dir() -> PathBuf {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    home.map(|home| PathBuf::from(home).join("Downloads"))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub struct FilePersistence {
    platform: Box<dyn Platform>,
    mode: PersistenceMode,
    current: Option<FileHandle>,
    downloads: Downloads,
}

impl FilePersistence {
    pub fn new(platform: Box<dyn Platform>) -> Self {
        Self {
            platform,
            mode: PersistenceMode::default(),
            current: None,
            downloads: Downloads::default(),
        }
    }

    pub fn native() -> Self {
        Self::new(Box::new(NativePlatform))
    }

    pub fn with_mode(mut self, mode: PersistenceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_downloads(mut self, downloads: Downloads) -> Self {
        self.downloads = downloads;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.mode == PersistenceMode::FileHandle && self.platform.is_supported()
    }

    pub fn state(&self) -> FileState {
        match (self.is_enabled(), &self.current) {
            (false, _) => FileState::Disabled,
            (true, None) => FileState::EnabledNoFile,
            (true, Some(_)) => FileState::EnabledWithFile,
        }
    }

    pub fn current_file(&self) -> Option<&FileHandle> {
        self.current.as_ref()
    }

    /// Read `handle` and make it the current file.
    pub fn open_file(&mut self, handle: FileHandle) -> Result<String, FileError> {
        if !self.is_enabled() {
            return Err(FileError::CapabilityUnavailable);
        }
        let text = self.platform.read(&handle)?;
        tracing::info!(path = %handle.path().display(), "opened file");
        self.current = Some(handle);
        Ok(text)
    }

    /// Open a file passed at launch. A path that does not exist yet becomes
    /// the current file with an empty document.
    pub fn handle_launch(&mut self, handle: FileHandle) -> Result<String, FileError> {
        if !self.is_enabled() {
            return Err(FileError::CapabilityUnavailable);
        }
        if !self.platform.exists(&handle) {
            tracing::info!(path = %handle.path().display(), "launching with new file");
            self.current = Some(handle);
            return Ok(String::new());
        }
        self.open_file(handle)
    }

    pub fn save_file(&mut self, text: &str) -> Result<SaveOutcome, FileError> {
        if !self.is_enabled() {
            return self.downloads.save(text).map(SaveOutcome::Downloaded);
        }
        match &self.current {
            Some(handle) => {
                self.platform.write(handle, text)?;
                tracing::info!(path = %handle.path().display(), "saved file");
                Ok(SaveOutcome::Saved(handle.path().to_path_buf()))
            }
            None => Ok(SaveOutcome::NeedsTarget),
        }
    }

    /// Write to a newly chosen target; on success it becomes the current file.
    pub fn save_as(&mut self, handle: FileHandle, text: &str) -> Result<SaveOutcome, FileError> {
        if !self.is_enabled() {
            return self.downloads.save(text).map(SaveOutcome::Downloaded);
        }
        self.platform.write(&handle, text)?;
        tracing::info!(path = %handle.path().display(), "saved file as");
        let path = handle.path().to_path_buf();
        self.current = Some(handle);
        Ok(SaveOutcome::Saved(path))
    }

    pub fn close_file(&mut self) {
        if let Some(handle) = self.current.take() {
            tracing::info!(path = %handle.path().display(), "closed file");
        }
    }
}

impl std::fmt::Debug for FilePersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePersistence")
            .field("mode", &self.mode)
            .field("supported", &self.platform.is_supported())
            .field("current", &self.current)
            .field("downloads", &self.downloads)
            .finish()
    }
}
