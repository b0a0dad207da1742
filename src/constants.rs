//! Shared crate-wide constants.
//!
//! Geometry values are logical units (the same coordinate system window
//! geometry is stored in), not terminal cells.

use std::time::Duration;

/// Floor a window's width can be shrunk to by a resize gesture.
pub const MIN_WIDTH: f64 = 300.0;

/// Floor a window's height can be shrunk to by a resize gesture.
pub const MIN_HEIGHT: f64 = 200.0;

/// Strip reserved at the bottom of the workspace for the taskbar. Maximized
/// windows never cover it.
pub const TASKBAR_HEIGHT: f64 = 48.0;

/// Height of the draggable header band at the top of every window.
pub const HEADER_HEIGHT: f64 = 32.0;

/// Thickness of the resize bands along each window edge. Corner handles are
/// squares of this size.
pub const RESIZE_HANDLE_THICKNESS: f64 = 8.0;

/// Width of each header control button (minimize, maximize, close).
pub const CONTROL_BUTTON_WIDTH: f64 = 24.0;

/// Corner radius given to freshly registered windows.
pub const DEFAULT_BORDER_RADIUS: f64 = 8.0;

/// Degrees of shear applied per logical unit of horizontal pointer travel
/// between two drag moves. Negative so the window leans against the motion.
pub const SKEW_FACTOR: f64 = -0.8;

/// Upper bound (in degrees, either sign) for the drag shear.
pub const MAX_SKEW_DEGREES: f64 = 15.0;

/// How long the elastic shear release runs before the transition override is
/// cleared.
pub const SKEW_SETTLE: Duration = Duration::from_millis(500);

/// Length of the exit transition played by close and minimize.
pub const CLOSE_TRANSITION: Duration = Duration::from_millis(200);

/// Two header presses on the same window within this window toggle maximize.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Stacking order every window starts at before its first focus.
pub const Z_BASE: u64 = 100;

/// First value handed out by the focus counter is `Z_COUNTER_START + 1`.
pub const Z_COUNTER_START: u64 = 1000;

pub const DEFAULT_WORKSPACE_WIDTH: f64 = 1280.0;
pub const DEFAULT_WORKSPACE_HEIGHT: f64 = 800.0;
