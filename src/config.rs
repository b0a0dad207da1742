//! Tunables for a [`WindowManager`](crate::window::WindowManager).
//!
//! Everything defaults to the values in [`crate::constants`]. Front ends
//! override the chrome metrics to match their own rendering grid (the
//! terminal desktop sizes them to whole cells).

use std::time::Duration;

use crate::constants::{
    CLOSE_TRANSITION, CONTROL_BUTTON_WIDTH, DEFAULT_WORKSPACE_HEIGHT, DEFAULT_WORKSPACE_WIDTH,
    DOUBLE_CLICK_WINDOW, HEADER_HEIGHT, MAX_SKEW_DEGREES, MIN_HEIGHT, MIN_WIDTH,
    RESIZE_HANDLE_THICKNESS, SKEW_FACTOR, SKEW_SETTLE, TASKBAR_HEIGHT,
};
use crate::layout::Region;

/// Logical size of the area windows live in, taskbar strip included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Workspace {
    pub width: f64,
    pub height: f64,
}

impl Workspace {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(DEFAULT_WORKSPACE_WIDTH, DEFAULT_WORKSPACE_HEIGHT)
    }
}

/// Sizes of the interactive parts of window chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeMetrics {
    pub header_height: f64,
    pub resize_handle_thickness: f64,
    pub control_button_width: f64,
}

impl Default for ChromeMetrics {
    fn default() -> Self {
        Self {
            header_height: HEADER_HEIGHT,
            resize_handle_thickness: RESIZE_HANDLE_THICKNESS,
            control_button_width: CONTROL_BUTTON_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WmConfig {
    pub workspace: Workspace,
    pub taskbar_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub chrome: ChromeMetrics,
    pub skew_factor: f64,
    pub max_skew: f64,
    pub skew_settle: Duration,
    pub close_transition: Duration,
    pub double_click: Duration,
}

impl Default for WmConfig {
    fn default() -> Self {
        Self {
            workspace: Workspace::default(),
            taskbar_height: TASKBAR_HEIGHT,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            chrome: ChromeMetrics::default(),
            skew_factor: SKEW_FACTOR,
            max_skew: MAX_SKEW_DEGREES,
            skew_settle: SKEW_SETTLE,
            close_transition: CLOSE_TRANSITION,
            double_click: DOUBLE_CLICK_WINDOW,
        }
    }
}

impl WmConfig {
    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn with_chrome(mut self, chrome: ChromeMetrics) -> Self {
        self.chrome = chrome;
        self
    }

    pub fn with_taskbar_height(mut self, height: f64) -> Self {
        self.taskbar_height = height.max(0.0);
        self
    }

    /// The part of the workspace a maximized window fills: everything above
    /// the taskbar strip.
    pub fn usable_area(&self) -> Region {
        Region {
            left: 0.0,
            top: 0.0,
            width: self.workspace.width,
            height: (self.workspace.height - self.taskbar_height).max(0.0),
        }
    }
}
