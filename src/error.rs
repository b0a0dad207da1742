use std::io;

use thiserror::Error;

use crate::window::WindowId;

/// Failures surfaced by the window manager and its persistence boundary.
///
/// Commands that reference an unknown window are deliberately not errors:
/// they are no-ops, since a click can race with a window going away.
#[derive(Debug, Error)]
pub enum WmError {
    #[error("window `{0}` is already registered")]
    DuplicateRegistration(WindowId),
    #[error("unknown resize edge `{0}`")]
    UnknownResizeEdge(String),
    #[error("unsupported window table schema version {0}")]
    UnsupportedSchema(u32),
    #[error("failed to encode or decode window table: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type WmResult<T> = Result<T, WmError>;
