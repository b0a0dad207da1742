use std::fmt;
use std::str::FromStr;

use super::{Point, Region};
use crate::error::WmError;
use crate::window::{Geometry, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::North,
        ResizeEdge::South,
        ResizeEdge::East,
        ResizeEdge::West,
        ResizeEdge::NorthEast,
        ResizeEdge::NorthWest,
        ResizeEdge::SouthEast,
        ResizeEdge::SouthWest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeEdge::North => "n",
            ResizeEdge::South => "s",
            ResizeEdge::East => "e",
            ResizeEdge::West => "w",
            ResizeEdge::NorthEast => "ne",
            ResizeEdge::NorthWest => "nw",
            ResizeEdge::SouthEast => "se",
            ResizeEdge::SouthWest => "sw",
        }
    }

    pub fn moves_north(self) -> bool {
        matches!(
            self,
            ResizeEdge::North | ResizeEdge::NorthEast | ResizeEdge::NorthWest
        )
    }

    pub fn moves_south(self) -> bool {
        matches!(
            self,
            ResizeEdge::South | ResizeEdge::SouthEast | ResizeEdge::SouthWest
        )
    }

    pub fn moves_east(self) -> bool {
        matches!(
            self,
            ResizeEdge::East | ResizeEdge::NorthEast | ResizeEdge::SouthEast
        )
    }

    pub fn moves_west(self) -> bool {
        matches!(
            self,
            ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
        )
    }
}

impl fmt::Display for ResizeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeEdge {
    type Err = WmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeEdge::ALL
            .into_iter()
            .find(|edge| edge.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| WmError::UnknownResizeEdge(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeHandle {
    pub edge: ResizeEdge,
    pub region: Region,
}

/// Transient state of a header drag.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDrag {
    pub id: WindowId,
    /// Pointer position minus the window's top-left at gesture start.
    pub offset: Point,
    /// Pointer x at the previous move, for the shear velocity.
    pub last_x: f64,
    pub start: Geometry,
}

/// Transient state of an edge or corner resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDrag {
    pub id: WindowId,
    pub edge: ResizeEdge,
    pub start_pointer: Point,
    pub start: Geometry,
}

/// Minimum size a resize may shrink a window to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinSize {
    pub width: f64,
    pub height: f64,
}

/// The eight resize handles around `geometry`, corners first so they win hit
/// tests where they overlap the edge bands.
pub fn resize_handles_for_window(geometry: &Geometry, thickness: f64) -> Vec<ResizeHandle> {
    let mut handles = Vec::with_capacity(8);
    if geometry.width <= 0.0 || geometry.height <= 0.0 || thickness <= 0.0 {
        return handles;
    }
    let t = thickness
        .min(geometry.width / 2.0)
        .min(geometry.height / 2.0);
    let left = geometry.left;
    let top = geometry.top;
    let right = geometry.left + geometry.width - t;
    let bottom = geometry.top + geometry.height - t;
    let inner_w = (geometry.width - 2.0 * t).max(0.0);
    let inner_h = (geometry.height - 2.0 * t).max(0.0);

    let mut push = |edge, region: Region| {
        if !region.is_empty() {
            handles.push(ResizeHandle { edge, region });
        }
    };
    push(ResizeEdge::NorthWest, Region::new(left, top, t, t));
    push(ResizeEdge::NorthEast, Region::new(right, top, t, t));
    push(ResizeEdge::SouthWest, Region::new(left, bottom, t, t));
    push(ResizeEdge::SouthEast, Region::new(right, bottom, t, t));
    push(ResizeEdge::North, Region::new(left + t, top, inner_w, t));
    push(ResizeEdge::South, Region::new(left + t, bottom, inner_w, t));
    push(ResizeEdge::West, Region::new(left, top + t, t, inner_h));
    push(ResizeEdge::East, Region::new(right, top + t, t, inner_h));
    handles
}

pub fn resize_handle_at(geometry: &Geometry, thickness: f64, point: Point) -> Option<ResizeEdge> {
    resize_handles_for_window(geometry, thickness)
        .into_iter()
        .find(|handle| handle.region.contains(point))
        .map(|handle| handle.edge)
}

/// The band at the top of a window that starts a drag.
pub fn floating_header_for_window(geometry: &Geometry, header_height: f64) -> Option<Region> {
    if geometry.width <= 0.0 || geometry.height <= 0.0 || header_height <= 0.0 {
        return None;
    }
    Some(Region::new(
        geometry.left,
        geometry.top,
        geometry.width,
        header_height.min(geometry.height),
    ))
}

/// Geometry after dragging `edge` from `start_pointer` to `pointer`.
///
/// Each moved axis is floored at `min`. Once a west or north resize hits the
/// floor the opposite edge stays put, so the origin rests at
/// `far edge - min` and does not move while the pointer keeps travelling.
pub fn apply_resize_drag(
    start: &Geometry,
    edge: ResizeEdge,
    start_pointer: Point,
    pointer: Point,
    min: MinSize,
) -> Geometry {
    let dx = pointer.x - start_pointer.x;
    let dy = pointer.y - start_pointer.y;
    let mut next = *start;

    if edge.moves_east() {
        next.width = (start.width + dx).max(min.width);
    }
    if edge.moves_south() {
        next.height = (start.height + dy).max(min.height);
    }
    if edge.moves_west() {
        let raw = start.width - dx;
        next.width = raw.max(min.width);
        next.left = if raw >= min.width {
            start.left + dx
        } else {
            start.left + start.width - min.width
        };
    }
    if edge.moves_north() {
        let raw = start.height - dy;
        next.height = raw.max(min.height);
        next.top = if raw >= min.height {
            start.top + dy
        } else {
            start.top + start.height - min.height
        };
    }
    next
}

/// Geometry of a window being dragged: pointer minus the grab offset. Size
/// and corner radius are untouched.
pub fn apply_header_drag(current: &Geometry, offset: Point, pointer: Point) -> Geometry {
    Geometry {
        left: pointer.x - offset.x,
        top: pointer.y - offset.y,
        ..*current
    }
}

/// Shear (degrees) for a drag step of `delta_x`, clamped to `±max`.
pub fn drag_skew(delta_x: f64, factor: f64, max: f64) -> f64 {
    let max = max.abs();
    (delta_x * factor).clamp(-max, max)
}

/// Geometry of a maximized window: the whole usable area, square corners.
pub fn maximized_geometry(area: Region) -> Geometry {
    Geometry {
        left: area.left,
        top: area.top,
        width: area.width,
        height: area.height,
        border_radius: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: MinSize = MinSize {
        width: 300.0,
        height: 200.0,
    };

    fn window(left: f64, top: f64, width: f64, height: f64) -> Geometry {
        Geometry::new(left, top, width, height)
    }

    #[test]
    fn edge_names_parse_both_ways() {
        for edge in ResizeEdge::ALL {
            assert_eq!(edge.as_str().parse::<ResizeEdge>().unwrap(), edge);
        }
        assert_eq!("SE".parse::<ResizeEdge>().unwrap(), ResizeEdge::SouthEast);
        assert!(matches!(
            "up".parse::<ResizeEdge>(),
            Err(WmError::UnknownResizeEdge(_))
        ));
    }

    #[test]
    fn south_east_grows_then_clamps() {
        let start = window(100.0, 100.0, 400.0, 300.0);
        let origin = Point::new(500.0, 400.0);
        let grown = apply_resize_drag(
            &start,
            ResizeEdge::SouthEast,
            origin,
            Point::new(550.0, 450.0),
            MIN,
        );
        assert_eq!((grown.width, grown.height), (450.0, 350.0));
        assert_eq!((grown.left, grown.top), (100.0, 100.0));

        let shrunk = apply_resize_drag(
            &start,
            ResizeEdge::SouthEast,
            origin,
            Point::new(300.0, 400.0),
            MIN,
        );
        assert_eq!(shrunk.width, 300.0);
        assert_eq!(shrunk.height, 300.0);
    }

    #[test]
    fn west_moves_origin_until_floor() {
        let start = window(100.0, 100.0, 400.0, 300.0);
        let origin = Point::new(100.0, 200.0);
        let moved = apply_resize_drag(
            &start,
            ResizeEdge::West,
            origin,
            Point::new(150.0, 200.0),
            MIN,
        );
        assert_eq!((moved.left, moved.width), (150.0, 350.0));

        for dx in [101.0, 150.0, 400.0] {
            let clamped = apply_resize_drag(
                &start,
                ResizeEdge::West,
                origin,
                Point::new(100.0 + dx, 200.0),
                MIN,
            );
            assert_eq!(clamped.width, 300.0);
            assert_eq!(clamped.left, 200.0, "left must rest at the floor at dx={dx}");
            assert_eq!(clamped.left + clamped.width, 500.0);
        }
    }

    #[test]
    fn origin_is_continuous_across_the_floor() {
        let start = window(100.0, 100.0, 400.0, 300.0);
        let origin = Point::new(100.0, 100.0);
        let at_floor = apply_resize_drag(
            &start,
            ResizeEdge::NorthWest,
            origin,
            Point::new(200.0, 200.0),
            MIN,
        );
        assert_eq!((at_floor.left, at_floor.top), (200.0, 200.0));
        assert_eq!((at_floor.width, at_floor.height), (300.0, 200.0));

        let past = apply_resize_drag(
            &start,
            ResizeEdge::NorthWest,
            origin,
            Point::new(201.0, 201.0),
            MIN,
        );
        assert_eq!((past.left, past.top), (at_floor.left, at_floor.top));
        assert_eq!((past.width, past.height), (300.0, 200.0));
    }

    #[test]
    fn north_is_symmetric_to_west() {
        let start = window(0.0, 100.0, 400.0, 300.0);
        let origin = Point::new(200.0, 100.0);
        let up = apply_resize_drag(
            &start,
            ResizeEdge::North,
            origin,
            Point::new(200.0, 60.0),
            MIN,
        );
        assert_eq!((up.top, up.height), (60.0, 340.0));
        let floor = apply_resize_drag(
            &start,
            ResizeEdge::North,
            origin,
            Point::new(200.0, 250.0),
            MIN,
        );
        assert_eq!((floor.top, floor.height), (200.0, 200.0));
        assert_eq!(floor.width, 400.0);
    }

    #[test]
    fn handles_cover_all_eight_directions() {
        let g = window(0.0, 0.0, 400.0, 300.0);
        let handles = resize_handles_for_window(&g, 8.0);
        assert_eq!(handles.len(), 8);
        for edge in ResizeEdge::ALL {
            assert!(handles.iter().any(|h| h.edge == edge), "missing {edge}");
        }
        assert_eq!(
            resize_handle_at(&g, 8.0, Point::new(1.0, 1.0)),
            Some(ResizeEdge::NorthWest)
        );
        assert_eq!(
            resize_handle_at(&g, 8.0, Point::new(399.0, 150.0)),
            Some(ResizeEdge::East)
        );
        assert_eq!(resize_handle_at(&g, 8.0, Point::new(200.0, 150.0)), None);
    }

    #[test]
    fn header_spans_top_band() {
        let g = window(10.0, 20.0, 400.0, 300.0);
        let header = floating_header_for_window(&g, 32.0).unwrap();
        assert_eq!(header, Region::new(10.0, 20.0, 400.0, 32.0));
        assert!(floating_header_for_window(&window(0.0, 0.0, 0.0, 10.0), 32.0).is_none());
    }

    #[test]
    fn skew_is_clamped() {
        assert_eq!(drag_skew(10.0, -0.8, 15.0), -8.0);
        assert_eq!(drag_skew(100.0, -0.8, 15.0), -15.0);
        assert_eq!(drag_skew(-100.0, -0.8, 15.0), 15.0);
        assert_eq!(drag_skew(0.0, -0.8, 15.0), 0.0);
    }

    #[test]
    fn header_drag_keeps_size() {
        let g = window(50.0, 50.0, 800.0, 600.0);
        let moved = apply_header_drag(&g, Point::new(20.0, 10.0), Point::new(220.0, 110.0));
        assert_eq!((moved.left, moved.top), (200.0, 100.0));
        assert_eq!((moved.width, moved.height), (800.0, 600.0));
    }
}
