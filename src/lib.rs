//! Window manager for a simulated desktop shell.
//!
//! [`WindowManager`] keeps a registry of window panels with their geometry,
//! stacking order, focus, maximize state and the single drag or resize
//! gesture in flight. It is render-agnostic; the [`desktop`] module is a
//! terminal front end built on ratatui and crossterm.

pub mod config;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod icons;
pub mod layout;
pub mod pointer;
pub mod runner;
pub mod snapshot;
pub mod taskbar;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use config::{ChromeMetrics, Workspace, WmConfig};
pub use error::{WmError, WmResult};
pub use layout::floating::ResizeEdge;
pub use layout::{Point, Region};
pub use pointer::{PointerButton, PointerEvent, PointerKind};
pub use snapshot::WindowTableSnapshot;
pub use window::{Geometry, SurfaceSpec, Visibility, WindowId, WindowManager};
