use std::fs;
use std::io;

use super::{FileError, FileHandle};

/// Host file access.
pub trait Platform {
    fn is_supported(&self) -> bool;
    fn read(&self, handle: &FileHandle) -> Result<String, FileError>;
    fn write(&self, handle: &FileHandle, text: &str) -> Result<(), FileError>;
    fn exists(&self, handle: &FileHandle) -> bool;
}

/// Direct `std::fs` access.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativePlatform;

impl Platform for NativePlatform {
    fn is_supported(&self) -> bool {
        true
    }

    fn read(&self, handle: &FileHandle) -> Result<String, FileError> {
        let path = handle.path();
        let bytes = fs::read(path).map_err(|err| FileError::from_io(path, err))?;
        String::from_utf8(bytes).map_err(|_| FileError::InvalidEncoding(path.to_path_buf()))
    }

    fn write(&self, handle: &FileHandle, text: &str) -> Result<(), FileError> {
        let path = handle.path();
        fs::write(path, text).map_err(|err| FileError::from_io(path, err))
    }

    fn exists(&self, handle: &FileHandle) -> bool {
        handle.path().exists()
    }
}

/// A host without file access.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedPlatform;

impl Platform for UnsupportedPlatform {
    fn is_supported(&self) -> bool {
        false
    }

    fn read(&self, _handle: &FileHandle) -> Result<String, FileError> {
        Err(FileError::CapabilityUnavailable)
    }

    fn write(&self, _handle: &FileHandle, _text: &str) -> Result<(), FileError> {
        Err(FileError::CapabilityUnavailable)
    }

    fn exists(&self, _handle: &FileHandle) -> bool {
        false
    }
}
