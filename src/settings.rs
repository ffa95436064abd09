//! Persisted user settings.
//!
//! A flat JSON object on disk. Unknown keys survive a load/save cycle.
//! Observers get the full [`Settings`] value on subscribe and again after
//! every change.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::global_config_dir;
use crate::observable::Subject;

pub const SPELLCHECK: &str = "spellcheck";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to access settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed settings {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, Value>);

impl Settings {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn spellcheck(&self) -> bool {
        self.get_bool(SPELLCHECK).unwrap_or(true)
    }

    fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }
}

pub struct SettingsStore {
    path: Option<PathBuf>,
    current: Settings,
    subject: Subject<Settings>,
}

impl SettingsStore {
    /// Load from `path`. A missing file gives defaults. So does a malformed
    /// one, with a warning.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match read_settings(&path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "using default settings");
                Settings::default()
            }
        };
        Self {
            path: Some(path),
            current,
            subject: Subject::new(),
        }
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: Settings::default(),
            subject: Subject::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub const fn settings(&self) -> &Settings {
        &self.current
    }

    /// Receive the current settings now and every later change.
    pub fn subscribe(&mut self) -> Receiver<Settings> {
        self.subject.subscribe_with(self.current.clone())
    }

    /// Change one key, notify observers, then persist.
    ///
    /// The in-memory value and subscribers are updated even when writing
    /// fails; the error is returned for the caller to report.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), SettingsError> {
        self.current.insert(key, value.into());
        self.subject.emit(&self.current);
        self.persist()
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| SettingsError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.current).map_err(|source| {
            SettingsError::Json {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(path, format!("{json}\n")).map_err(io_err)?;
        tracing::debug!(path = %path.display(), "persisted settings");
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        global_config_dir().map(|dir| dir.join("settings.json"))
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.path)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content).map_err(|source| SettingsError::Json {
        path: path.to_path_buf(),
        source,
    })
}
