//! Markdown pad editor core.
//!
//! Provides a rope-backed text buffer with selection management and the pure
//! selection-aware splice functions used by toolbar commands.

mod buffer;
pub mod mutator;

pub use buffer::{Cursor, Direction, EditorBuffer, Selection};
pub use mutator::Splice;
