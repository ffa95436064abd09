//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! [`App`] owns the file persistence adapter and the settings store. After
//! each [`update`] it performs the message's I/O and syncs the model's
//! mirrors of that state.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{LEGACY_KEYBOARD_HINT, Model, TOAST_DURATION, ToastLevel};
pub use update::{Message, update};

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use crate::commands::CommandStyle;
use crate::persistence::FilePersistence;
use crate::settings::{Settings, SettingsStore};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    launch_file: Option<PathBuf>,
    files: FilePersistence,
    settings: SettingsStore,
    settings_rx: Option<Receiver<Settings>>,
    command_style: CommandStyle,
}

impl App {
    /// Create an application with native file access and in-memory settings.
    pub fn new() -> Self {
        Self {
            launch_file: None,
            files: FilePersistence::native(),
            settings: SettingsStore::in_memory(),
            settings_rx: None,
            command_style: CommandStyle::default(),
        }
    }

    /// Open this file at startup.
    #[must_use]
    pub fn with_launch_file(mut self, path: Option<PathBuf>) -> Self {
        self.launch_file = path;
        self
    }

    #[must_use]
    pub fn with_files(mut self, files: FilePersistence) -> Self {
        self.files = files;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SettingsStore) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub const fn with_command_style(mut self, style: CommandStyle) -> Self {
        self.command_style = style;
        self
    }

    pub const fn files(&self) -> &FilePersistence {
        &self.files
    }

    pub const fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Build the initial model: subscribe to settings, open the launch file.
    pub fn init_model(&mut self, width: u16, height: u16, layout_units: u32) -> Model {
        let mut model = Model::new(width, height, layout_units);
        model.command_style = self.command_style;

        let rx = self.settings.subscribe();
        self.settings_rx = Some(rx);
        self.poll_settings(&mut model);

        if let Some(path) = self.launch_file.take() {
            self.open_launch_file(&mut model, path);
        }
        self.sync_file_info(&mut model);
        model
    }

    /// Run one message through update and its side effects, then any
    /// follow-up messages it produced.
    pub fn dispatch(&mut self, model: &mut Model, msg: Message) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let side_msg = msg.clone();
            *model = update(std::mem::take(model), msg);
            self.handle_message_side_effects(model, &side_msg);
            queue.extend(model.take_followups());
        }
    }

    /// Apply the newest settings emission to the model, if any arrived.
    /// Returns whether anything changed.
    pub fn poll_settings(&mut self, model: &mut Model) -> bool {
        let Some(settings) = self
            .settings_rx
            .as_ref()
            .and_then(crate::observable::latest)
        else {
            return false;
        };
        let enabled = settings.spellcheck();
        if enabled == model.spellcheck {
            return false;
        }
        self.dispatch(model, Message::SpellcheckChanged(enabled));
        true
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
