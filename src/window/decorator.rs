use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::config::ChromeMetrics;
use crate::layout::floating::floating_header_for_window;
use crate::layout::{Point, Region};
use crate::window::Geometry;

/// What a press on a window's header means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    None,
    Drag,
    Minimize,
    Maximize,
    Close,
}

/// Which control buttons a surface carries in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowControls {
    pub minimize: bool,
    pub maximize: bool,
    pub close: bool,
}

impl Default for WindowControls {
    fn default() -> Self {
        Self {
            minimize: true,
            maximize: true,
            close: true,
        }
    }
}

impl WindowControls {
    pub fn none() -> Self {
        Self {
            minimize: false,
            maximize: false,
            close: false,
        }
    }
}

/// Header buttons laid out right to left (close, maximize, minimize), each
/// `control_button_width` wide and as tall as the header. The row starts one
/// resize-handle thickness in from the right edge so the east band never
/// swallows the close button.
pub fn control_regions(
    geometry: &Geometry,
    controls: WindowControls,
    chrome: &ChromeMetrics,
) -> Vec<(HeaderAction, Region)> {
    let Some(header) = floating_header_for_window(geometry, chrome.header_height) else {
        return Vec::new();
    };
    let width = chrome.control_button_width;
    let mut right = header.right() - chrome.resize_handle_thickness;
    let mut out = Vec::new();
    for (action, present) in [
        (HeaderAction::Close, controls.close),
        (HeaderAction::Maximize, controls.maximize),
        (HeaderAction::Minimize, controls.minimize),
    ] {
        if !present {
            continue;
        }
        let left = right - width;
        if left < header.left {
            break;
        }
        out.push((action, Region::new(left, header.top, width, header.height)));
        right = left;
    }
    out
}

pub trait WindowDecorator: std::fmt::Debug {
    fn hit_test(
        &self,
        geometry: &Geometry,
        controls: WindowControls,
        chrome: &ChromeMetrics,
        point: Point,
    ) -> HeaderAction {
        let Some(header) = floating_header_for_window(geometry, chrome.header_height) else {
            return HeaderAction::None;
        };
        if !header.contains(point) {
            return HeaderAction::None;
        }
        control_regions(geometry, controls, chrome)
            .into_iter()
            .find(|(_, region)| region.contains(point))
            .map(|(action, _)| action)
            .unwrap_or(HeaderAction::Drag)
    }

    /// Draw frame, title bar and buttons into `area` of `buffer`. `buttons`
    /// are already in the buffer's cell coordinates.
    fn render_window(
        &self,
        buffer: &mut Buffer,
        area: Rect,
        title: &str,
        buttons: &[(HeaderAction, Rect)],
        focused: bool,
        maximized: bool,
    );
}

#[derive(Debug, Default)]
pub struct DefaultDecorator;

impl DefaultDecorator {
    fn button_glyph(action: HeaderAction, maximized: bool) -> &'static str {
        match action {
            HeaderAction::Minimize => "_",
            HeaderAction::Maximize if maximized => "❐",
            HeaderAction::Maximize => "□",
            HeaderAction::Close => "×",
            HeaderAction::Drag | HeaderAction::None => " ",
        }
    }
}

impl WindowDecorator for DefaultDecorator {
    fn render_window(
        &self,
        buffer: &mut Buffer,
        area: Rect,
        title: &str,
        buttons: &[(HeaderAction, Rect)],
        focused: bool,
        maximized: bool,
    ) {
        if area.width < 2 || area.height < 2 {
            return;
        }
        let header_style = if focused {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        let border_style = if focused {
            Style::default().fg(Color::LightBlue)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let left = area.x;
        let top = area.y;
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;
        let (tl, tr, bl, br) = if maximized {
            ("┌", "┐", "└", "┘")
        } else {
            ("╭", "╮", "╰", "╯")
        };

        for x in left..=right {
            let (top_glyph, bottom_glyph) = if x == left {
                (tl, bl)
            } else if x == right {
                (tr, br)
            } else {
                ("─", "─")
            };
            if let Some(cell) = buffer.cell_mut((x, top)) {
                cell.set_symbol(top_glyph);
                cell.set_style(border_style);
            }
            if let Some(cell) = buffer.cell_mut((x, bottom)) {
                cell.set_symbol(bottom_glyph);
                cell.set_style(border_style);
            }
        }
        for y in top + 1..bottom {
            for x in [left, right] {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol("│");
                    cell.set_style(border_style);
                }
            }
        }

        // Title bar sits on the first row inside the border.
        let header_y = top + 1;
        if header_y >= bottom {
            return;
        }
        for x in left + 1..right {
            if let Some(cell) = buffer.cell_mut((x, header_y)) {
                cell.set_symbol(" ");
                cell.set_style(header_style);
            }
        }
        let buttons_left = buttons
            .iter()
            .map(|(_, rect)| rect.x)
            .min()
            .unwrap_or(right)
            .max(left + 1);
        let room = buttons_left.saturating_sub(left + 2) as usize;
        for (idx, ch) in title.chars().take(room).enumerate() {
            let x = left + 2 + idx as u16;
            if let Some(cell) = buffer.cell_mut((x, header_y)) {
                cell.set_symbol(&ch.to_string());
                cell.set_style(header_style);
            }
        }
        for (action, rect) in buttons {
            if rect.width == 0 {
                continue;
            }
            let x = rect.x + rect.width / 2;
            if x <= left || x >= right {
                continue;
            }
            let style = if *action == HeaderAction::Close {
                header_style.bg(Color::Red)
            } else {
                header_style
            };
            if let Some(cell) = buffer.cell_mut((x, header_y)) {
                cell.set_symbol(Self::button_glyph(*action, maximized));
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome() -> ChromeMetrics {
        ChromeMetrics {
            header_height: 32.0,
            resize_handle_thickness: 8.0,
            control_button_width: 24.0,
        }
    }

    #[test]
    fn buttons_are_right_aligned_close_last() {
        let g = Geometry::new(0.0, 0.0, 400.0, 300.0);
        let regions = control_regions(&g, WindowControls::default(), &chrome());
        let actions: Vec<_> = regions.iter().map(|(a, _)| *a).collect();
        assert_eq!(
            actions,
            vec![
                HeaderAction::Close,
                HeaderAction::Maximize,
                HeaderAction::Minimize
            ]
        );
        assert_eq!(regions[0].1.left, 368.0);
        assert_eq!(regions[2].1.left, 320.0);
    }

    #[test]
    fn hit_test_resolves_header_parts() {
        let d = DefaultDecorator;
        let g = Geometry::new(100.0, 100.0, 400.0, 300.0);
        let c = WindowControls::default();
        assert_eq!(
            d.hit_test(&g, c, &chrome(), Point::new(480.0, 110.0)),
            HeaderAction::Close
        );
        assert_eq!(
            d.hit_test(&g, c, &chrome(), Point::new(455.0, 110.0)),
            HeaderAction::Maximize
        );
        assert_eq!(
            d.hit_test(&g, c, &chrome(), Point::new(200.0, 110.0)),
            HeaderAction::Drag
        );
        assert_eq!(
            d.hit_test(&g, c, &chrome(), Point::new(200.0, 200.0)),
            HeaderAction::None
        );
    }

    #[test]
    fn missing_controls_fall_back_to_drag() {
        let d = DefaultDecorator;
        let g = Geometry::new(0.0, 0.0, 400.0, 300.0);
        assert_eq!(
            d.hit_test(&g, WindowControls::none(), &chrome(), Point::new(380.0, 10.0)),
            HeaderAction::Drag
        );
    }

    #[test]
    fn render_draws_frame_and_title() {
        let area = Rect::new(0, 0, 20, 6);
        let mut buffer = Buffer::empty(area);
        let buttons = [(HeaderAction::Close, Rect::new(16, 0, 3, 2))];
        DefaultDecorator.render_window(&mut buffer, area, "Terminal", &buttons, true, false);
        assert_eq!(buffer[(0, 0)].symbol(), "╭");
        assert_eq!(buffer[(19, 5)].symbol(), "╯");
        assert_eq!(buffer[(2, 1)].symbol(), "T");
        assert_eq!(buffer[(17, 1)].symbol(), "×");
    }
}
