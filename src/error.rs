//! Error types reported by the dispatcher and binding parser.

use crate::input::{Action, Intent};
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced while dispatching an input event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Save or load was requested while the surface tool is running.
    #[error("{intent:?} is only permitted while the surface tool is not started")]
    ToolActive { intent: Intent },

    #[error("Failed to save sketch world to {}: {cause:#}", .path.display())]
    Save { path: PathBuf, cause: anyhow::Error },

    #[error("Failed to load sketch world from {}: {cause:#}", .path.display())]
    Load { path: PathBuf, cause: anyhow::Error },
}

/// Invalid entries in the `[bindings]` or `[hands]` configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("Unknown hand '{name}' in bindings for {action:?} (expected \"left\" or \"right\")")]
    UnknownHand { action: Action, name: String },

    #[error("Duplicate binding: {action:?} is bound to the {hand} hand more than once")]
    Duplicate { action: Action, hand: String },

    #[error("Input source for the {hand} hand is empty")]
    EmptySource { hand: String },

    #[error("Both hands are mapped to the same input source '{source_id}'")]
    SharedSource { source_id: String },
}
