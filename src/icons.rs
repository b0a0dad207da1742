//! Desktop shortcut icons: a column of app tiles along the left edge of the
//! workspace. A double press on a tile opens its app.

use std::time::{Duration, Instant};

use crate::config::WmConfig;
use crate::layout::{Point, Region};
use crate::taskbar::AppEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct IconTile {
    pub app: AppEntry,
    pub region: Region,
}

#[derive(Debug, Clone)]
pub struct DesktopIcons {
    apps: Vec<AppEntry>,
    margin: f64,
    tile_width: f64,
    tile_height: f64,
    last_press: Option<(&'static str, Instant)>,
}

impl DesktopIcons {
    /// Tiles are `tile_width` x `tile_height`, stacked top to bottom with
    /// `margin` around and between them.
    pub fn new(apps: &[AppEntry], margin: f64, tile_width: f64, tile_height: f64) -> Self {
        Self {
            apps: apps.to_vec(),
            margin: margin.max(0.0),
            tile_width: tile_width.max(0.0),
            tile_height: tile_height.max(0.0),
            last_press: None,
        }
    }

    /// Tiles that fit above the taskbar.
    pub fn tiles(&self, config: &WmConfig) -> Vec<IconTile> {
        let usable = config.usable_area();
        let step = self.tile_height + self.margin;
        self.apps
            .iter()
            .enumerate()
            .map(|(idx, app)| IconTile {
                app: *app,
                region: Region::new(
                    usable.left + self.margin,
                    usable.top + self.margin + idx as f64 * step,
                    self.tile_width,
                    self.tile_height,
                ),
            })
            .take_while(|tile| {
                tile.region.bottom() <= usable.bottom() && tile.region.right() <= usable.right()
            })
            .collect()
    }

    pub fn hit_test(&self, config: &WmConfig, point: Point) -> Option<AppEntry> {
        self.tiles(config)
            .into_iter()
            .find(|tile| tile.region.contains(point))
            .map(|tile| tile.app)
    }

    /// Record a primary press at `point`. Returns the app to open when this
    /// press completes a double press on the same tile within `window`.
    pub fn press(
        &mut self,
        config: &WmConfig,
        point: Point,
        now: Instant,
        window: Duration,
    ) -> Option<AppEntry> {
        let Some(app) = self.hit_test(config, point) else {
            self.last_press = None;
            return None;
        };
        let double = self
            .last_press
            .is_some_and(|(id, at)| id == app.id && now.duration_since(at) <= window);
        if double {
            self.last_press = None;
            return Some(app);
        }
        self.last_press = Some((app.id, now));
        None
    }

    /// Forget a pending first press.
    pub fn reset(&mut self) {
        self.last_press = None;
    }
}
