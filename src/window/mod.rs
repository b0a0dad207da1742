pub mod decorator;

mod window_manager;

use std::borrow::Borrow;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::layout::{Point, Region};

pub use decorator::{DefaultDecorator, HeaderAction, WindowControls, WindowDecorator};
pub use window_manager::{Gesture, GestureState, UpdateCallback, WindowManager};

/// Stable identifier a panel is registered under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for WindowId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for WindowId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WindowId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Position, size and corner radius of a window, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub border_radius: f64,
}

impl Geometry {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            border_radius: crate::constants::DEFAULT_BORDER_RADIUS,
        }
    }

    pub fn with_border_radius(mut self, radius: f64) -> Self {
        self.border_radius = radius;
        self
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn region(&self) -> Region {
        Region::new(self.left, self.top, self.width, self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.region().contains(point)
    }
}

/// How the registering application describes a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec {
    pub title: String,
    pub geometry: Geometry,
    pub controls: WindowControls,
}

impl SurfaceSpec {
    pub fn new(title: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            title: title.into(),
            geometry,
            controls: WindowControls::default(),
        }
    }

    pub fn with_controls(mut self, controls: WindowControls) -> Self {
        self.controls = controls;
        self
    }
}

/// Presentation state of a window's surface.
///
/// `Closing` and `Minimizing` are the exit transition; [`WindowManager::tick`]
/// settles them into `Hidden` and `Minimized` once their deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Closing { until: Instant },
    Hidden,
    Minimizing { until: Instant },
    Minimized,
}

impl Visibility {
    /// Whether the surface is on screen, exit transitions included.
    pub fn is_shown(&self) -> bool {
        matches!(
            self,
            Visibility::Visible | Visibility::Closing { .. } | Visibility::Minimizing { .. }
        )
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Override of the surface's positional transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionOverride {
    /// Renderer's own transitions apply.
    #[default]
    None,
    /// Movement tracks the pointer without easing (during a drag).
    Disabled,
    /// Elastic ease of the shear back to zero, cleared at `until`.
    Elastic { until: Instant },
}

/// Cosmetic state; never part of the geometric model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Presentation {
    pub skew_degrees: f64,
    pub transition: TransitionOverride,
}

/// One registered panel.
#[derive(Debug, Clone)]
pub struct WindowRecord {
    id: WindowId,
    title: String,
    controls: WindowControls,
    geometry: Geometry,
    is_maximized: bool,
    original_geometry: Option<Geometry>,
    visibility: Visibility,
    z: u64,
    presentation: Presentation,
}

impl WindowRecord {
    fn new(id: WindowId, surface: SurfaceSpec, z: u64) -> Self {
        Self {
            id,
            title: surface.title,
            controls: surface.controls,
            geometry: surface.geometry,
            is_maximized: false,
            original_geometry: None,
            visibility: Visibility::Hidden,
            z,
            presentation: Presentation::default(),
        }
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn controls(&self) -> WindowControls {
        self.controls
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn is_maximized(&self) -> bool {
        self.is_maximized
    }

    pub fn original_geometry(&self) -> Option<Geometry> {
        self.original_geometry
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn z(&self) -> u64 {
        self.z
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }
}
