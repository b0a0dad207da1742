use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use super::decorator::{DefaultDecorator, HeaderAction, WindowDecorator};
use super::{
    Geometry, Presentation, SurfaceSpec, TransitionOverride, Visibility, WindowId, WindowRecord,
};
use crate::config::{Workspace, WmConfig};
use crate::constants::{Z_BASE, Z_COUNTER_START};
use crate::error::{WmError, WmResult};
use crate::layout::Point;
use crate::layout::floating::{
    HeaderDrag, MinSize, ResizeDrag, ResizeEdge, apply_header_drag, apply_resize_drag, drag_skew,
    maximized_geometry, resize_handle_at,
};
use crate::pointer::{PointerButton, PointerEvent, PointerKind};
use crate::snapshot::{PersistedVisibility, SCHEMA_VERSION, WindowEntry, WindowTableSnapshot};

/// Single-slot observer invoked with the active window after state changes.
pub type UpdateCallback = Box<dyn FnMut(Option<&WindowId>)>;

/// The one pointer gesture that may be in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Drag(HeaderDrag),
    Resize(ResizeDrag),
}

impl Gesture {
    pub fn target(&self) -> &WindowId {
        match self {
            Gesture::Drag(drag) => &drag.id,
            Gesture::Resize(resize) => &resize.id,
        }
    }

    fn start_geometry(&self) -> Geometry {
        match self {
            Gesture::Drag(drag) => drag.start,
            Gesture::Resize(resize) => resize.start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
    Resizing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitKind {
    Close,
    Minimize,
}

/// Registry of window panels with their stacking, focus, maximize state and
/// the drag/resize gesture machine.
///
/// All operations run to completion on the caller's thread; pointer moves
/// only touch the gesture target, never scan the registry.
pub struct WindowManager {
    config: WmConfig,
    windows: BTreeMap<WindowId, WindowRecord>,
    active: Option<WindowId>,
    z_counter: u64,
    gesture: Option<Gesture>,
    last_header_click: Option<(WindowId, Instant)>,
    decorator: Arc<dyn WindowDecorator>,
    on_update: Option<UpdateCallback>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(WmConfig::default())
    }
}

impl WindowManager {
    pub fn new(config: WmConfig) -> Self {
        Self {
            config,
            windows: BTreeMap::new(),
            active: None,
            z_counter: Z_COUNTER_START,
            gesture: None,
            last_header_click: None,
            decorator: Arc::new(DefaultDecorator),
            on_update: None,
        }
    }

    pub fn config(&self) -> &WmConfig {
        &self.config
    }

    /// Adopt a new workspace size. Maximized windows are refitted to it.
    pub fn set_workspace(&mut self, workspace: Workspace) {
        self.config.workspace = workspace;
        let full = maximized_geometry(self.config.usable_area());
        let mut refitted = false;
        for record in self.windows.values_mut().filter(|r| r.is_maximized) {
            record.geometry = full;
            refitted = true;
        }
        if refitted {
            self.notify_update();
        }
    }

    pub fn decorator(&self) -> Arc<dyn WindowDecorator> {
        Arc::clone(&self.decorator)
    }

    pub fn set_decorator(&mut self, decorator: Arc<dyn WindowDecorator>) {
        self.decorator = decorator;
    }

    /// Install the update observer, replacing any previous one.
    pub fn set_on_update<F>(&mut self, callback: F)
    where
        F: FnMut(Option<&WindowId>) + 'static,
    {
        self.on_update = Some(Box::new(callback));
    }

    pub fn clear_on_update(&mut self) {
        self.on_update = None;
    }

    fn notify_update(&mut self) {
        if let Some(callback) = self.on_update.as_mut() {
            callback(self.active.as_ref());
        }
    }

    pub fn register(&mut self, id: impl Into<WindowId>, surface: SurfaceSpec) -> WmResult<()> {
        let id = id.into();
        if self.windows.contains_key(&id) {
            tracing::warn!(window_id = %id, "rejected duplicate window registration");
            return Err(WmError::DuplicateRegistration(id));
        }
        let mut surface = surface;
        surface.geometry.width = surface.geometry.width.max(self.config.min_width);
        surface.geometry.height = surface.geometry.height.max(self.config.min_height);
        tracing::debug!(window_id = %id, title = %surface.title, "registered window");
        self.windows
            .insert(id.clone(), WindowRecord::new(id, surface, Z_BASE));
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.windows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &WindowId> {
        self.windows.keys()
    }

    pub fn record(&self, id: &str) -> Option<&WindowRecord> {
        self.windows.get(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.values()
    }

    pub fn geometry(&self, id: &str) -> Option<Geometry> {
        self.record(id).map(|r| r.geometry)
    }

    pub fn z_order(&self, id: &str) -> Option<u64> {
        self.record(id).map(|r| r.z)
    }

    pub fn visibility(&self, id: &str) -> Option<Visibility> {
        self.record(id).map(|r| r.visibility)
    }

    /// On screen, including while an exit transition is still playing.
    pub fn is_visible(&self, id: &str) -> bool {
        self.record(id).is_some_and(|r| r.visibility.is_shown())
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_ref().is_some_and(|active| active.as_str() == id)
    }

    pub fn is_maximized(&self, id: &str) -> bool {
        self.record(id).is_some_and(|r| r.is_maximized)
    }

    pub fn was_minimized(&self, id: &str) -> bool {
        self.record(id).is_some_and(|r| {
            matches!(
                r.visibility,
                Visibility::Minimized | Visibility::Minimizing { .. }
            )
        })
    }

    pub fn active_window(&self) -> Option<&WindowId> {
        self.active.as_ref()
    }

    /// Shown windows from bottom to top.
    pub fn draw_order(&self) -> Vec<&WindowId> {
        let mut shown: Vec<&WindowRecord> = self
            .windows
            .values()
            .filter(|r| r.visibility.is_shown())
            .collect();
        shown.sort_by_key(|r| r.z);
        shown.into_iter().map(|r| &r.id).collect()
    }

    /// Topmost interactive window under `point`.
    pub fn hit_test(&self, point: Point) -> Option<WindowId> {
        self.windows
            .values()
            .filter(|r| r.visibility.is_interactive() && r.geometry.contains(point))
            .max_by_key(|r| r.z)
            .map(|r| r.id.clone())
    }

    pub fn open(&mut self, id: &str) {
        self.focus(id);
    }

    /// Show `id`, raise it above every other window and make it the only
    /// active one.
    pub fn focus(&mut self, id: &str) {
        let Some(record) = self.windows.get_mut(id) else {
            tracing::trace!(window_id = id, "focus ignored for unknown window");
            return;
        };
        self.z_counter += 1;
        record.z = self.z_counter;
        record.visibility = Visibility::Visible;
        let id = record.id.clone();
        tracing::debug!(window_id = %id, z = self.z_counter, "focused window");
        self.active = Some(id);
        self.notify_update();
    }

    pub fn close(&mut self, id: &str) {
        self.begin_exit(id, ExitKind::Close, Instant::now());
    }

    /// Hide `id` into a resumable state distinct from closed.
    pub fn minimize(&mut self, id: &str) {
        self.begin_exit(id, ExitKind::Minimize, Instant::now());
    }

    /// Bring a minimized window back; anything else is left alone.
    pub fn restore(&mut self, id: &str) {
        if self.was_minimized(id) {
            self.focus(id);
        }
    }

    fn begin_exit(&mut self, id: &str, kind: ExitKind, now: Instant) {
        let until = now + self.config.close_transition;
        let Some(record) = self.windows.get_mut(id) else {
            return;
        };
        let next = match (record.visibility, kind) {
            (Visibility::Hidden, _) | (Visibility::Minimized, ExitKind::Minimize) => return,
            (Visibility::Minimized, ExitKind::Close) => Visibility::Hidden,
            (_, ExitKind::Close) => Visibility::Closing { until },
            (_, ExitKind::Minimize) => Visibility::Minimizing { until },
        };
        record.visibility = next;
        tracing::debug!(window_id = id, ?kind, "hiding window");

        if self
            .gesture
            .as_ref()
            .is_some_and(|g| g.target().as_str() == id)
        {
            self.gesture = None;
            record.presentation = Presentation::default();
        }
        if next == Visibility::Hidden && self.is_active(id) {
            self.active = None;
        }
        self.notify_update();
    }

    pub fn toggle_maximize(&mut self, id: &str) {
        let full = maximized_geometry(self.config.usable_area());
        let Some(record) = self.windows.get_mut(id) else {
            return;
        };
        if record.is_maximized {
            if let Some(original) = record.original_geometry {
                record.geometry = original;
            }
            record.is_maximized = false;
            tracing::debug!(window_id = id, "restored window from maximize");
        } else {
            record.original_geometry = Some(record.geometry);
            record.geometry = full;
            record.is_maximized = true;
            tracing::debug!(window_id = id, "maximized window");
        }
        if self
            .gesture
            .as_ref()
            .is_some_and(|g| g.target().as_str() == id)
        {
            self.gesture = None;
        }
        self.notify_update();
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn gesture_target(&self) -> Option<&WindowId> {
        self.gesture.as_ref().map(Gesture::target)
    }

    pub fn gesture_state(&self, id: &str) -> GestureState {
        match &self.gesture {
            Some(Gesture::Drag(drag)) if drag.id.as_str() == id => GestureState::Dragging,
            Some(Gesture::Resize(resize)) if resize.id.as_str() == id => GestureState::Resizing,
            _ => GestureState::Idle,
        }
    }

    /// Start dragging `id` by its header. Refused while another gesture is
    /// live, for unknown or hidden windows, and for maximized ones.
    pub fn begin_drag(&mut self, id: &str, pointer: Point) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let Some(record) = self.windows.get_mut(id) else {
            return false;
        };
        if record.is_maximized || !record.visibility.is_interactive() {
            return false;
        }
        let start = record.geometry;
        record.presentation.transition = TransitionOverride::Disabled;
        let id = record.id.clone();
        self.gesture = Some(Gesture::Drag(HeaderDrag {
            id: id.clone(),
            offset: Point::new(pointer.x - start.left, pointer.y - start.top),
            last_x: pointer.x,
            start,
        }));
        tracing::debug!(window_id = %id, "drag started");
        self.focus(id.as_str());
        true
    }

    /// Start resizing `id` from `edge`. Same refusals as [`Self::begin_drag`].
    pub fn begin_resize(&mut self, id: &str, edge: ResizeEdge, pointer: Point) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let Some(record) = self.windows.get_mut(id) else {
            return false;
        };
        if record.is_maximized || !record.visibility.is_interactive() {
            return false;
        }
        let id = record.id.clone();
        self.gesture = Some(Gesture::Resize(ResizeDrag {
            id: id.clone(),
            edge,
            start_pointer: pointer,
            start: record.geometry,
        }));
        tracing::debug!(window_id = %id, %edge, "resize started");
        self.focus(id.as_str());
        true
    }

    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let min = MinSize {
            width: self.config.min_width,
            height: self.config.min_height,
        };
        let (factor, max_skew) = (self.config.skew_factor, self.config.max_skew);
        let moved = match self.gesture.as_mut() {
            None => false,
            Some(Gesture::Drag(drag)) => match self.windows.get_mut(drag.id.as_str()) {
                Some(record) => {
                    record.geometry = apply_header_drag(&record.geometry, drag.offset, pointer);
                    record.presentation.skew_degrees =
                        drag_skew(pointer.x - drag.last_x, factor, max_skew);
                    drag.last_x = pointer.x;
                    true
                }
                None => false,
            },
            Some(Gesture::Resize(resize)) => match self.windows.get_mut(resize.id.as_str()) {
                Some(record) => {
                    record.geometry = apply_resize_drag(
                        &resize.start,
                        resize.edge,
                        resize.start_pointer,
                        pointer,
                        min,
                    );
                    true
                }
                None => false,
            },
        };
        if moved {
            self.notify_update();
        }
        moved
    }

    /// Finish the live gesture. A drag releases its shear with an elastic
    /// ease; a resize just stops. Without a gesture this does nothing.
    pub fn pointer_up(&mut self) -> bool {
        self.end_gesture(Instant::now())
    }

    fn end_gesture(&mut self, now: Instant) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        match gesture {
            Gesture::Drag(drag) => {
                if let Some(record) = self.windows.get_mut(drag.id.as_str()) {
                    record.presentation.skew_degrees = 0.0;
                    record.presentation.transition = TransitionOverride::Elastic {
                        until: now + self.config.skew_settle,
                    };
                }
                tracing::debug!(window_id = %drag.id, "drag ended");
            }
            Gesture::Resize(resize) => {
                tracing::debug!(window_id = %resize.id, "resize ended");
            }
        }
        true
    }

    /// Abort the live gesture and put the window back where it started.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        let start = gesture.start_geometry();
        if let Some(record) = self.windows.get_mut(gesture.target().as_str()) {
            record.geometry = start;
            record.presentation = Presentation::default();
        }
        tracing::debug!(window_id = %gesture.target(), "gesture cancelled");
        self.notify_update();
        true
    }

    /// Route a raw pointer event. Returns whether the manager consumed it.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down(button) => {
                self.handle_pointer_down(event.position, button, Instant::now())
            }
            PointerKind::Move => self.pointer_move(event.position),
            PointerKind::Up(_) => self.pointer_up(),
        }
    }

    fn handle_pointer_down(&mut self, point: Point, button: PointerButton, now: Instant) -> bool {
        if self.gesture.is_some() {
            // The release of the live gesture was lost; keep it exclusive.
            return true;
        }
        let Some(id) = self.hit_test(point) else {
            self.last_header_click = None;
            return false;
        };
        if button != PointerButton::Primary {
            self.focus(id.as_str());
            return true;
        }
        let Some(record) = self.windows.get(id.as_str()) else {
            return false;
        };
        let (geometry, controls, maximized) =
            (record.geometry, record.controls, record.is_maximized);

        if !maximized
            && let Some(edge) =
                resize_handle_at(&geometry, self.config.chrome.resize_handle_thickness, point)
        {
            self.last_header_click = None;
            return self.begin_resize(id.as_str(), edge, point);
        }

        let action = self
            .decorator
            .hit_test(&geometry, controls, &self.config.chrome, point);
        if action != HeaderAction::Drag {
            self.last_header_click = None;
        }
        match action {
            HeaderAction::Close => {
                self.focus(id.as_str());
                self.close(id.as_str());
            }
            HeaderAction::Minimize => {
                self.focus(id.as_str());
                self.minimize(id.as_str());
            }
            HeaderAction::Maximize => {
                self.focus(id.as_str());
                self.toggle_maximize(id.as_str());
            }
            HeaderAction::Drag => {
                let double = self.last_header_click.as_ref().is_some_and(|(prev, at)| {
                    *prev == id && now.duration_since(*at) <= self.config.double_click
                });
                if double {
                    self.last_header_click = None;
                    self.focus(id.as_str());
                    self.toggle_maximize(id.as_str());
                    return true;
                }
                self.last_header_click = Some((id.clone(), now));
                if !self.begin_drag(id.as_str(), point) {
                    self.focus(id.as_str());
                }
            }
            HeaderAction::None => self.focus(id.as_str()),
        }
        true
    }

    /// Settle exit transitions and elastic releases whose time has come.
    /// Returns whether anything changed on screen.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut settled = false;
        let mut relaxed = false;
        for record in self.windows.values_mut() {
            match record.visibility {
                Visibility::Closing { until } if now >= until => {
                    record.visibility = Visibility::Hidden;
                    settled = true;
                }
                Visibility::Minimizing { until } if now >= until => {
                    record.visibility = Visibility::Minimized;
                    settled = true;
                }
                _ => {}
            }
            if let TransitionOverride::Elastic { until } = record.presentation.transition
                && now >= until
            {
                record.presentation.transition = TransitionOverride::None;
                relaxed = true;
            }
        }
        if settled {
            let active_gone = self.active.as_ref().is_some_and(|id| {
                !self
                    .windows
                    .get(id.as_str())
                    .is_some_and(|r| r.visibility.is_shown())
            });
            if active_gone {
                self.active = None;
            }
            self.notify_update();
        }
        settled || relaxed
    }

    pub fn export_snapshot(&self) -> WindowTableSnapshot {
        WindowTableSnapshot {
            schema_version: SCHEMA_VERSION,
            z_counter: self.z_counter,
            active: self.active.clone(),
            windows: self
                .windows
                .values()
                .map(|r| WindowEntry {
                    id: r.id.clone(),
                    geometry: r.geometry,
                    is_maximized: r.is_maximized,
                    original_geometry: r.original_geometry,
                    visibility: PersistedVisibility::from(r.visibility),
                    z: r.z,
                })
                .collect(),
        }
    }

    /// Apply a previously exported table to the registered windows. Entries
    /// for ids that are not registered are skipped. Returns how many entries
    /// were applied.
    pub fn import_snapshot(&mut self, snapshot: &WindowTableSnapshot) -> WmResult<usize> {
        if snapshot.schema_version > SCHEMA_VERSION {
            return Err(WmError::UnsupportedSchema(snapshot.schema_version));
        }
        self.gesture = None;
        self.last_header_click = None;
        let full = maximized_geometry(self.config.usable_area());
        let (min_width, min_height) = (self.config.min_width, self.config.min_height);
        let mut z_counter = self.z_counter.max(snapshot.z_counter);
        let mut applied = 0;
        for entry in &snapshot.windows {
            let Some(record) = self.windows.get_mut(entry.id.as_str()) else {
                tracing::warn!(window_id = %entry.id, "skipping snapshot entry for unregistered window");
                continue;
            };
            let floored = |mut g: Geometry| {
                g.width = g.width.max(min_width);
                g.height = g.height.max(min_height);
                g
            };
            // A maximized entry without its restore geometry cannot be
            // un-maximized, so it comes back as a plain window.
            let original = entry.original_geometry.map(floored);
            record.is_maximized = entry.is_maximized && original.is_some();
            record.original_geometry = original;
            record.geometry = if record.is_maximized {
                full
            } else {
                floored(entry.geometry)
            };
            record.visibility = entry.visibility.into();
            record.z = entry.z;
            record.presentation = Presentation::default();
            z_counter = z_counter.max(entry.z);
            applied += 1;
        }
        self.z_counter = z_counter;
        self.active = snapshot.active.clone().filter(|id| {
            self.windows
                .get(id.as_str())
                .is_some_and(|r| r.visibility.is_shown())
        });
        tracing::debug!(applied, "imported window table");
        self.notify_update();
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn manager_with(ids: &[&str]) -> WindowManager {
        let mut wm = WindowManager::default();
        for (i, id) in ids.iter().enumerate() {
            let offset = 40.0 * i as f64;
            wm.register(
                *id,
                SurfaceSpec::new(*id, Geometry::new(50.0 + offset, 50.0 + offset, 800.0, 600.0)),
            )
            .unwrap();
        }
        wm
    }

    fn later() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    #[test]
    fn focus_sequence_orders_stack() {
        let mut wm = manager_with(&["a", "b", "c"]);
        for id in ["a", "b", "c", "a"] {
            wm.focus(id);
        }
        let (a, b, c) = (
            wm.z_order("a").unwrap(),
            wm.z_order("b").unwrap(),
            wm.z_order("c").unwrap(),
        );
        assert!(a > c && c > b);
        assert!(wm.is_active("a"));
        assert!(!wm.is_active("b"));
        assert!(!wm.is_active("c"));
        assert_eq!(wm.z_counter, Z_COUNTER_START + 4);
    }

    #[test]
    fn duplicate_registration_keeps_original() {
        let mut wm = manager_with(&["a"]);
        wm.toggle_maximize("a");
        let err = wm
            .register("a", SurfaceSpec::new("other", Geometry::new(0.0, 0.0, 400.0, 300.0)))
            .unwrap_err();
        assert!(matches!(err, WmError::DuplicateRegistration(ref id) if id == "a"));
        assert!(wm.is_maximized("a"));
        assert_eq!(wm.record("a").unwrap().title(), "a");
    }

    #[test]
    fn registration_floors_initial_size() {
        let mut wm = WindowManager::default();
        wm.register("tiny", SurfaceSpec::new("tiny", Geometry::new(0.0, 0.0, 10.0, 10.0)))
            .unwrap();
        let g = wm.geometry("tiny").unwrap();
        assert_eq!((g.width, g.height), (300.0, 200.0));
        assert!(!wm.is_visible("tiny"));
    }

    #[test]
    fn maximize_round_trip_restores_geometry() {
        let mut wm = manager_with(&["a"]);
        let before = wm.geometry("a").unwrap();
        wm.toggle_maximize("a");
        let full = wm.geometry("a").unwrap();
        assert!(wm.is_maximized("a"));
        assert_eq!(full.left, 0.0);
        assert_eq!(full.top, 0.0);
        assert_eq!(full.width, wm.config().workspace.width);
        assert_eq!(
            full.height,
            wm.config().workspace.height - wm.config().taskbar_height
        );
        assert_eq!(full.border_radius, 0.0);
        wm.toggle_maximize("a");
        assert_eq!(wm.geometry("a").unwrap(), before);
        assert!(!wm.is_maximized("a"));
    }

    #[test]
    fn second_maximize_captures_fresh_geometry() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        wm.toggle_maximize("a");
        wm.toggle_maximize("a");
        assert!(wm.begin_drag("a", Point::new(100.0, 60.0)));
        wm.pointer_move(Point::new(300.0, 160.0));
        wm.pointer_up();
        let moved = wm.geometry("a").unwrap();
        wm.toggle_maximize("a");
        wm.toggle_maximize("a");
        assert_eq!(wm.geometry("a").unwrap(), moved);
    }

    #[test]
    fn maximized_windows_follow_workspace() {
        let mut wm = manager_with(&["a"]);
        wm.toggle_maximize("a");
        wm.set_workspace(Workspace::new(1920.0, 1080.0));
        let g = wm.geometry("a").unwrap();
        assert_eq!(g.width, 1920.0);
        assert_eq!(g.height, 1080.0 - wm.config().taskbar_height);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut wm = manager_with(&["a"]);
        wm.focus("a");
        let before = wm.export_snapshot();
        wm.open("ghost");
        wm.close("ghost");
        wm.minimize("ghost");
        wm.restore("ghost");
        wm.toggle_maximize("ghost");
        assert!(!wm.begin_drag("ghost", Point::new(0.0, 0.0)));
        assert_eq!(wm.export_snapshot(), before);
        assert!(!wm.is_visible("ghost"));
        assert!(!wm.is_active("ghost"));
    }

    #[test]
    fn close_plays_transition_then_hides() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        wm.close("a");
        assert!(matches!(
            wm.visibility("a"),
            Some(Visibility::Closing { .. })
        ));
        assert!(wm.is_visible("a"));
        assert!(wm.tick(later()));
        assert_eq!(wm.visibility("a"), Some(Visibility::Hidden));
        assert!(!wm.is_visible("a"));
        assert!(!wm.is_active("a"));
        assert!(wm.contains("a"));
    }

    #[test]
    fn minimize_is_distinct_from_close() {
        let mut wm = manager_with(&["a", "b"]);
        wm.open("a");
        wm.open("b");
        wm.minimize("a");
        wm.close("b");
        wm.tick(later());
        assert_eq!(wm.visibility("a"), Some(Visibility::Minimized));
        assert_eq!(wm.visibility("b"), Some(Visibility::Hidden));
        assert!(wm.was_minimized("a"));
        assert!(!wm.was_minimized("b"));

        wm.restore("b");
        assert!(!wm.is_visible("b"));
        wm.restore("a");
        assert!(wm.is_visible("a"));
        assert!(wm.is_active("a"));
    }

    #[test]
    fn focusing_a_closing_window_cancels_the_exit() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        wm.close("a");
        wm.focus("a");
        wm.tick(later());
        assert_eq!(wm.visibility("a"), Some(Visibility::Visible));
    }

    #[test]
    fn drag_tracks_pointer_and_skews() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        assert!(wm.begin_drag("a", Point::new(100.0, 60.0)));
        assert_eq!(wm.gesture_state("a"), GestureState::Dragging);
        assert_eq!(
            wm.record("a").unwrap().presentation().transition,
            TransitionOverride::Disabled
        );
        wm.pointer_move(Point::new(110.0, 70.0));
        let g = wm.geometry("a").unwrap();
        assert_eq!((g.left, g.top), (60.0, 60.0));
        assert_eq!(wm.record("a").unwrap().presentation().skew_degrees, -8.0);
        wm.pointer_move(Point::new(400.0, 70.0));
        assert_eq!(wm.record("a").unwrap().presentation().skew_degrees, -15.0);

        assert!(wm.pointer_up());
        let presentation = wm.record("a").unwrap().presentation();
        assert_eq!(presentation.skew_degrees, 0.0);
        assert!(matches!(
            presentation.transition,
            TransitionOverride::Elastic { .. }
        ));
        assert!(wm.tick(later()));
        assert_eq!(
            wm.record("a").unwrap().presentation().transition,
            TransitionOverride::None
        );
    }

    #[test]
    fn maximized_window_cannot_be_dragged_or_resized() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        wm.toggle_maximize("a");
        assert!(!wm.begin_drag("a", Point::new(10.0, 10.0)));
        assert!(!wm.begin_resize("a", ResizeEdge::East, Point::new(10.0, 10.0)));
        assert!(!wm.is_gesture_active());
    }

    #[test]
    fn gestures_are_exclusive() {
        let mut wm = manager_with(&["a", "b"]);
        wm.open("a");
        wm.open("b");
        assert!(wm.begin_drag("a", Point::new(100.0, 60.0)));
        assert!(!wm.begin_resize("b", ResizeEdge::SouthEast, Point::new(0.0, 0.0)));
        assert!(!wm.begin_drag("b", Point::new(0.0, 0.0)));
        assert_eq!(wm.gesture_state("b"), GestureState::Idle);
        wm.pointer_up();
        assert!(wm.begin_resize("b", ResizeEdge::SouthEast, Point::new(0.0, 0.0)));
        assert_eq!(wm.gesture_state("a"), GestureState::Idle);
        assert_eq!(wm.gesture_state("b"), GestureState::Resizing);
    }

    #[test]
    fn stray_release_and_move_are_harmless() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        let before = wm.geometry("a");
        assert!(!wm.pointer_up());
        assert!(!wm.pointer_move(Point::new(500.0, 500.0)));
        assert!(!wm.cancel_gesture());
        assert_eq!(wm.geometry("a"), before);
    }

    #[test]
    fn cancel_restores_start_geometry() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        let before = wm.geometry("a").unwrap();
        wm.begin_resize("a", ResizeEdge::SouthEast, Point::new(850.0, 650.0));
        wm.pointer_move(Point::new(900.0, 700.0));
        assert_ne!(wm.geometry("a").unwrap(), before);
        assert!(wm.cancel_gesture());
        assert_eq!(wm.geometry("a").unwrap(), before);
        assert!(!wm.is_gesture_active());
    }

    #[test]
    fn closing_the_dragged_window_ends_the_gesture() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        wm.begin_drag("a", Point::new(100.0, 60.0));
        wm.close("a");
        assert!(!wm.is_gesture_active());
    }

    #[test]
    fn update_callback_sees_active_window() {
        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut wm = manager_with(&["a", "b"]);
        wm.set_on_update(move |active| {
            sink.borrow_mut().push(active.map(|id| id.to_string()));
        });
        wm.focus("a");
        wm.toggle_maximize("a");
        wm.focus("b");
        wm.close("b");
        wm.tick(later());
        let seen = seen.borrow();
        assert_eq!(
            *seen,
            vec![
                Some("a".to_string()),
                Some("a".to_string()),
                Some("b".to_string()),
                Some("b".to_string()),
                None
            ]
        );
    }

    #[test]
    fn pointer_down_on_header_starts_drag() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        assert!(wm.handle_pointer_event(&PointerEvent::down(200.0, 60.0)));
        assert_eq!(wm.gesture_state("a"), GestureState::Dragging);
        wm.handle_pointer_event(&PointerEvent::moved(260.0, 100.0));
        wm.handle_pointer_event(&PointerEvent::up(260.0, 100.0));
        let g = wm.geometry("a").unwrap();
        assert_eq!((g.left, g.top), (110.0, 90.0));
    }

    #[test]
    fn pointer_down_on_edge_starts_resize() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        // east edge of a window spanning 50..850
        assert!(wm.handle_pointer_event(&PointerEvent::down(846.0, 300.0)));
        assert_eq!(wm.gesture_state("a"), GestureState::Resizing);
        wm.handle_pointer_event(&PointerEvent::moved(896.0, 300.0));
        assert_eq!(wm.geometry("a").unwrap().width, 850.0);
    }

    #[test]
    fn pointer_down_on_controls() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        // maximize button: second from the right in the header
        wm.handle_pointer_event(&PointerEvent::down(815.0, 60.0));
        wm.handle_pointer_event(&PointerEvent::up(815.0, 60.0));
        assert!(wm.is_maximized("a"));
        let full = wm.geometry("a").unwrap();
        // close button on the maximized window
        wm.handle_pointer_event(&PointerEvent::down(full.width - 10.0, 10.0));
        assert!(matches!(
            wm.visibility("a"),
            Some(Visibility::Closing { .. })
        ));
    }

    #[test]
    fn double_press_on_header_toggles_maximize() {
        let mut wm = manager_with(&["a"]);
        wm.open("a");
        wm.handle_pointer_event(&PointerEvent::down(200.0, 60.0));
        wm.handle_pointer_event(&PointerEvent::up(200.0, 60.0));
        wm.handle_pointer_event(&PointerEvent::down(200.0, 60.0));
        assert!(wm.is_maximized("a"));
        assert!(!wm.is_gesture_active());
    }

    #[test]
    fn press_focuses_topmost_window() {
        let mut wm = manager_with(&["a", "b"]);
        wm.open("a");
        wm.open("b");
        // overlap of a (50..850) and b (90..890); b is on top
        wm.handle_pointer_event(&PointerEvent::down(400.0, 400.0));
        assert!(wm.is_active("b"));
        // only a covers this point
        wm.handle_pointer_event(&PointerEvent::down(60.0, 300.0));
        assert!(wm.is_active("a"));
        assert_eq!(wm.draw_order().last().map(|id| id.as_str()), Some("a"));
    }

    #[test]
    fn press_on_empty_desktop_is_not_consumed() {
        let mut wm = manager_with(&["a"]);
        assert!(!wm.handle_pointer_event(&PointerEvent::down(10.0, 10.0)));
    }

    #[test]
    fn snapshot_reapplies_state() {
        let mut wm = manager_with(&["a", "b"]);
        wm.open("a");
        wm.open("b");
        wm.toggle_maximize("b");
        wm.minimize("a");
        wm.tick(later());
        let snapshot = wm.export_snapshot();

        let mut fresh = manager_with(&["a", "b"]);
        assert_eq!(fresh.import_snapshot(&snapshot).unwrap(), 2);
        assert!(fresh.is_maximized("b"));
        assert!(fresh.was_minimized("a"));
        assert!(fresh.is_active("b"));
        fresh.focus("a");
        assert!(fresh.z_order("a").unwrap() > snapshot.z_counter);
        fresh.toggle_maximize("b");
        assert_eq!(fresh.geometry("b"), wm.record("b").unwrap().original_geometry());
    }

    #[test]
    fn snapshot_import_floors_size_and_drops_unrestorable_maximize() {
        let mut wm = manager_with(&["a", "b"]);
        wm.open("a");
        wm.open("b");
        let mut snapshot = wm.export_snapshot();
        for entry in &mut snapshot.windows {
            entry.geometry = Geometry::new(20.0, 30.0, 120.0, 80.0);
            if entry.id == "b" {
                entry.is_maximized = true;
                entry.original_geometry = None;
            }
        }

        let mut fresh = manager_with(&["a", "b"]);
        fresh.import_snapshot(&snapshot).unwrap();
        let a = fresh.geometry("a").unwrap();
        assert_eq!((a.left, a.top, a.width, a.height), (20.0, 30.0, 300.0, 200.0));
        assert!(!fresh.is_maximized("b"));
        let b = fresh.geometry("b").unwrap();
        assert_eq!((b.width, b.height), (300.0, 200.0));

        fresh.toggle_maximize("b");
        fresh.toggle_maximize("b");
        assert_eq!(fresh.geometry("b"), Some(b));
    }

    #[test]
    fn snapshot_from_newer_schema_is_rejected() {
        let mut wm = manager_with(&["a"]);
        let mut snapshot = wm.export_snapshot();
        snapshot.schema_version = SCHEMA_VERSION + 1;
        assert!(matches!(
            wm.import_snapshot(&snapshot),
            Err(WmError::UnsupportedSchema(_))
        ));
    }
}
