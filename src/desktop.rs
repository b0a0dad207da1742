//! The terminal desktop: one [`WindowManager`] with a panel per app, the
//! shortcut icons, the taskbar and start menu, and the keyboard and mouse
//! bindings that drive them.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use ratatui::layout::{Position, Rect};

use crate::config::Workspace;
use crate::drivers::mouse::pointer_event;
use crate::error::WmResult;
use crate::event_loop::ControlFlow;
use crate::icons::DesktopIcons;
use crate::pointer::{PointerButton, PointerKind};
use crate::taskbar::{AppEntry, Launcher, Taskbar, TaskbarAction};
use crate::ui::{self, CellScale, UiFrame};
use crate::window::{Geometry, SurfaceSpec, WindowManager};

/// Horizontal and vertical step between freshly registered panels.
const CASCADE_STEP: f64 = 32.0;

pub struct Desktop {
    wm: WindowManager,
    icons: DesktopIcons,
    taskbar: Taskbar,
    launcher: Launcher,
    scale: CellScale,
    area: Rect,
    help_visible: bool,
    follow_terminal: bool,
    dirty: Rc<Cell<bool>>,
}

impl Desktop {
    /// Desktop for a terminal of `cols` x `rows` cells, with one panel
    /// registered per app. Nothing is open yet.
    pub fn new(scale: CellScale, cols: u16, rows: u16, apps: &[AppEntry]) -> WmResult<Self> {
        let mut wm = WindowManager::new(scale.wm_config(scale.workspace_for(cols, rows)));
        let usable = wm.config().usable_area();
        let width = (usable.width * 0.55).round();
        let height = (usable.height * 0.6).round();
        for (idx, app) in apps.iter().enumerate() {
            let step = CASCADE_STEP * (idx % 8) as f64;
            let geometry = Geometry::new(
                CASCADE_STEP + step,
                CASCADE_STEP / 2.0 + step,
                width,
                height,
            );
            wm.register(app.id, SurfaceSpec::new(app.name, geometry))?;
        }

        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        wm.set_on_update(move |_| flag.set(true));

        Ok(Self {
            wm,
            icons: DesktopIcons::new(
                apps,
                scale.cell_height,
                12.0 * scale.cell_width,
                3.0 * scale.cell_height,
            ),
            taskbar: Taskbar::new(apps, 10.0 * scale.cell_width, 16.0 * scale.cell_width),
            launcher: Launcher::default(),
            scale,
            area: Rect::new(0, 0, cols, rows),
            help_visible: false,
            follow_terminal: true,
            dirty,
        })
    }

    /// Pin the workspace to a fixed logical size instead of following the
    /// terminal.
    pub fn set_fixed_workspace(&mut self, workspace: Workspace) {
        self.follow_terminal = false;
        self.wm.set_workspace(workspace);
        self.mark_dirty();
    }

    pub fn window_manager(&self) -> &WindowManager {
        &self.wm
    }

    pub fn window_manager_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn icons(&self) -> &DesktopIcons {
        &self.icons
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    pub fn scale(&self) -> &CellScale {
        &self.scale
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Whether something changed since the last call.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.area = Rect::new(0, 0, cols, rows);
        if self.follow_terminal {
            self.wm.set_workspace(self.scale.workspace_for(cols, rows));
        }
        self.mark_dirty();
    }

    pub fn tick(&mut self, now: Instant) {
        if self.wm.tick(now) {
            self.mark_dirty();
        }
    }

    pub fn draw(&self, frame: &mut UiFrame<'_>) {
        ui::render_desktop(frame, self);
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                ControlFlow::Continue
            }
            Event::Resize(cols, rows) => {
                self.resize(*cols, *rows);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return ControlFlow::Quit;
        }
        self.mark_dirty();
        if key.code == KeyCode::Esc {
            if !self.wm.cancel_gesture() {
                if self.launcher.is_open() {
                    self.launcher.close();
                } else {
                    self.help_visible = false;
                }
            }
            return ControlFlow::Continue;
        }
        if self.launcher.is_open() {
            self.handle_launcher_key(key);
            return ControlFlow::Continue;
        }

        let active = self.wm.active_window().cloned();
        match key.code {
            KeyCode::Char('q') => return ControlFlow::Quit,
            KeyCode::F(1) | KeyCode::Char('?') => self.help_visible = !self.help_visible,
            KeyCode::Char('s') => self.launcher.toggle(),
            KeyCode::Tab => self.focus_next(),
            KeyCode::Char('m') => {
                if let Some(id) = active {
                    self.wm.minimize(id.as_str());
                }
            }
            KeyCode::Char('x') => {
                if let Some(id) = active {
                    self.wm.toggle_maximize(id.as_str());
                }
            }
            KeyCode::Char('w') => {
                if let Some(id) = active {
                    self.wm.close(id.as_str());
                }
            }
            _ => {}
        }
        ControlFlow::Continue
    }

    fn handle_launcher_key(&mut self, key: &KeyEvent) {
        let count = self.launcher.results(self.taskbar.apps()).apps.len();
        match key.code {
            KeyCode::Char(ch) => self.launcher.push_char(ch),
            KeyCode::Backspace => self.launcher.pop_char(),
            KeyCode::Down | KeyCode::Tab => self.launcher.select_next(count),
            KeyCode::Up | KeyCode::BackTab => self.launcher.select_prev(count),
            KeyCode::Enter => {
                if let Some(app) = self.launcher.selected_app(self.taskbar.apps()) {
                    self.launch(app.id);
                }
            }
            _ => {}
        }
    }

    /// Raise the bottom-most interactive window, cycling through the stack.
    fn focus_next(&mut self) {
        let next = self
            .wm
            .draw_order()
            .into_iter()
            .find(|id| {
                self.wm
                    .visibility(id.as_str())
                    .is_some_and(|v| v.is_interactive())
            })
            .cloned();
        if let Some(id) = next {
            self.wm.focus(id.as_str());
        }
    }

    fn launch(&mut self, id: &str) {
        tracing::debug!(app = id, "launching from start menu");
        self.wm.open(id);
        self.launcher.close();
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let Some(pointer) = pointer_event(mouse, &self.scale) else {
            return;
        };
        if let PointerKind::Down(button) = pointer.kind {
            self.mark_dirty();
            if self.help_visible {
                self.help_visible = false;
                return;
            }
            let taskbar_hit = if self.wm.is_gesture_active() {
                None
            } else {
                self.taskbar.hit_test(self.wm.config(), pointer.position)
            };
            if self.launcher.is_open() {
                let results = self.launcher.results(self.taskbar.apps());
                let rect = ui::launcher_rect(
                    self.area,
                    ui::taskbar_top(self, self.area),
                    results.apps.len(),
                );
                if rect.contains(Position::new(mouse.column, mouse.row)) {
                    let picked =
                        ui::launcher_item_at(rect, results.apps.len(), mouse.column, mouse.row)
                            .and_then(|idx| results.apps.get(idx));
                    if let Some(app) = picked {
                        self.launch(app.id);
                    }
                    return;
                }
                if taskbar_hit != Some(TaskbarAction::ToggleLauncher) {
                    self.launcher.close();
                }
            }
            match taskbar_hit {
                Some(TaskbarAction::ToggleLauncher) => {
                    self.launcher.toggle();
                    return;
                }
                Some(TaskbarAction::Activate(id)) => {
                    self.wm.open(id.as_str());
                    return;
                }
                None => {}
            }
            // Icons lie beneath every window.
            if button == PointerButton::Primary
                && !self.wm.is_gesture_active()
                && self.wm.hit_test(pointer.position).is_none()
            {
                let double_click = self.wm.config().double_click;
                if let Some(app) = self.icons.press(
                    self.wm.config(),
                    pointer.position,
                    Instant::now(),
                    double_click,
                ) {
                    tracing::debug!(app = app.id, "launching from desktop icon");
                    self.wm.open(app.id);
                    return;
                }
            } else {
                self.icons.reset();
            }
        }
        self.wm.handle_pointer_event(&pointer);
    }
}
