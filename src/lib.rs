// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. dialog::DialogKind)
    clippy::module_name_repetitions
)]

//! # mdpad
//!
//! A terminal markdown pad.
//!
//! mdpad edits a markdown document in the terminal with:
//! - A toolbar of markdown insertion commands, each with a shortcut
//! - Modal dialogs for links, images, code, lists and tables
//! - A rendered preview pane beside the editor on wide terminals
//! - File open/save behind a pluggable platform, with a download fallback
//!
//! ## Architecture
//!
//! mdpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Observable text buffer and selection-aware splices
//! - [`commands`]: Toolbar commands and markdown fragments
//! - [`dialog`]: Modal input forms
//! - [`persistence`]: File access and download saves
//! - [`settings`]: Persisted user settings
//! - [`layout`]: Width-driven pane layout
//! - [`preview`]: Markdown to styled terminal lines
//! - [`highlight`]: Syntax highlighting
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod commands;
pub mod config;
pub mod dialog;
pub mod editor;
pub mod highlight;
pub mod layout;
pub mod observable;
pub mod persistence;
pub mod preview;
pub mod settings;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::commands::Command;
    pub use crate::editor::{EditorBuffer, Selection};
}
