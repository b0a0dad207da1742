//! Taskbar and start-menu launcher.
//!
//! Both are plain models in logical units. They read window state through
//! [`WindowManager`] queries and issue `open` calls; the terminal desktop
//! draws them.

use crate::config::WmConfig;
use crate::layout::{Point, Region};
use crate::window::{WindowId, WindowManager};

/// One launchable application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppEntry {
    pub id: &'static str,
    pub name: &'static str,
}

pub const DEFAULT_APPS: [AppEntry; 7] = [
    AppEntry {
        id: "chrome",
        name: "Google Chrome",
    },
    AppEntry {
        id: "settings",
        name: "Settings",
    },
    AppEntry {
        id: "task-manager",
        name: "Task Manager",
    },
    AppEntry {
        id: "terminal",
        name: "Terminal",
    },
    AppEntry {
        id: "file-explorer",
        name: "This Computer",
    },
    AppEntry {
        id: "system-info",
        name: "System Info",
    },
    AppEntry {
        id: "game-hub",
        name: "Game Hub",
    },
];

/// Case-insensitive subsequence match: every character of `pattern` appears
/// in `text` in order, not necessarily adjacent.
pub fn fuzzy_match(pattern: &str, text: &str) -> bool {
    let mut haystack = text.chars().flat_map(char::to_lowercase);
    pattern
        .chars()
        .flat_map(char::to_lowercase)
        .all(|needle| haystack.any(|c| c == needle))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Visible and focused.
    Active,
    /// On screen or minimized, but not focused.
    Running,
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskbarAction {
    ToggleLauncher,
    Activate(WindowId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskbarButton {
    pub app: AppEntry,
    pub region: Region,
}

/// The strip at the bottom of the workspace: a start button followed by one
/// button per pinned app.
#[derive(Debug, Clone)]
pub struct Taskbar {
    apps: Vec<AppEntry>,
    start_width: f64,
    button_width: f64,
}

impl Taskbar {
    pub fn new(apps: &[AppEntry], start_width: f64, button_width: f64) -> Self {
        Self {
            apps: apps.to_vec(),
            start_width: start_width.max(0.0),
            button_width: button_width.max(0.0),
        }
    }

    pub fn apps(&self) -> &[AppEntry] {
        &self.apps
    }

    pub fn strip(&self, config: &WmConfig) -> Region {
        let usable = config.usable_area();
        Region::new(0.0, usable.bottom(), config.workspace.width, config.taskbar_height)
    }

    pub fn start_button(&self, config: &WmConfig) -> Region {
        let strip = self.strip(config);
        Region::new(strip.left, strip.top, self.start_width, strip.height)
    }

    /// App buttons that fit on the strip, left to right.
    pub fn buttons(&self, config: &WmConfig) -> Vec<TaskbarButton> {
        let strip = self.strip(config);
        self.apps
            .iter()
            .enumerate()
            .map(|(idx, app)| TaskbarButton {
                app: *app,
                region: Region::new(
                    strip.left + self.start_width + idx as f64 * self.button_width,
                    strip.top,
                    self.button_width,
                    strip.height,
                ),
            })
            .take_while(|button| button.region.right() <= strip.right())
            .collect()
    }

    pub fn hit_test(&self, config: &WmConfig, point: Point) -> Option<TaskbarAction> {
        if !self.strip(config).contains(point) {
            return None;
        }
        if self.start_button(config).contains(point) {
            return Some(TaskbarAction::ToggleLauncher);
        }
        self.buttons(config)
            .into_iter()
            .find(|button| button.region.contains(point))
            .map(|button| TaskbarAction::Activate(WindowId::from(button.app.id)))
    }

    pub fn indicator(wm: &WindowManager, id: &str) -> Indicator {
        if wm.is_visible(id) && wm.is_active(id) {
            Indicator::Active
        } else if wm.is_visible(id) || wm.was_minimized(id) {
            Indicator::Running
        } else {
            Indicator::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsHeading {
    Pinned,
    Matches,
    /// Nothing matched; a single suggestion is offered instead.
    Suggested,
}

impl ResultsHeading {
    pub fn label(self) -> &'static str {
        match self {
            ResultsHeading::Pinned => "Pinned apps",
            ResultsHeading::Matches => "Search results",
            ResultsHeading::Suggested => "No results. Suggested:",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LauncherResults {
    pub heading: ResultsHeading,
    pub apps: Vec<AppEntry>,
}

/// Start menu: open flag, search query and the highlighted row.
#[derive(Debug, Clone, Default)]
pub struct Launcher {
    open: bool,
    query: String,
    selected: usize,
}

impl Launcher {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Opening always starts from an empty search.
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open = true;
            self.query.clear();
            self.selected = 0;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn push_char(&mut self, ch: char) {
        self.query.push(ch);
        self.selected = 0;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select(&mut self, idx: usize) {
        self.selected = idx;
    }

    pub fn results(&self, apps: &[AppEntry]) -> LauncherResults {
        if self.query.is_empty() {
            return LauncherResults {
                heading: ResultsHeading::Pinned,
                apps: apps.to_vec(),
            };
        }
        let matches: Vec<AppEntry> = apps
            .iter()
            .filter(|app| fuzzy_match(&self.query, app.name))
            .copied()
            .collect();
        if !matches.is_empty() {
            return LauncherResults {
                heading: ResultsHeading::Matches,
                apps: matches,
            };
        }
        // The suggestion depends only on the query length.
        let suggestion = apps.get(self.query.chars().count() % apps.len().max(1));
        LauncherResults {
            heading: ResultsHeading::Suggested,
            apps: suggestion.copied().into_iter().collect(),
        }
    }

    pub fn selected_app(&self, apps: &[AppEntry]) -> Option<AppEntry> {
        self.results(apps).apps.get(self.selected).copied()
    }
}
