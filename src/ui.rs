//! Terminal rendering of the desktop.
//!
//! Window geometry lives in logical units; [`CellScale`] maps it onto the
//! terminal grid. Each window is drawn into its own offscreen buffer and then
//! composited bottom to top through [`UiFrame::blit_sheared`], which also
//! applies the drag shear as a per-row horizontal offset.
use indoc::indoc;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::config::{ChromeMetrics, Workspace, WmConfig};
use crate::desktop::Desktop;
use crate::layout::{Point, Region};
use crate::taskbar::{Indicator, Taskbar};
use crate::window::decorator::control_regions;
use crate::window::{Visibility, WindowDecorator, WindowRecord};

pub const HELP_TEXT: &str = indoc! {"
    Mouse
      drag a title bar       move the window
      drag an edge/corner    resize it
      double-click a title   maximize / restore
      _  □  ×                minimize, maximize, close
      taskbar button         open or restore an app
      double-click an icon   open its app

    Keys
      s                      start menu
      Tab                    focus the next window
      m / x / w              minimize / maximize / close the focused window
      Esc                    cancel a drag or resize, close menus
      F1 or ?                toggle this help
      q or Ctrl+Q            quit
"};

const DESKTOP_BG: Color = Color::Rgb(28, 44, 72);
const LAUNCHER_WIDTH: u16 = 36;

/// Wrapper around a frame's buffer that clips every draw to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Copy `src` (anchored at its own origin) to `dest`, which may hang off
    /// any edge of the frame. Row `sy` of the source is moved `row_shift(sy)`
    /// columns sideways.
    pub fn blit_sheared<F>(&mut self, src: &Buffer, dest: CellRect, row_shift: F)
    where
        F: Fn(u16) -> i32,
    {
        let frame_x0 = self.area.x as i32;
        let frame_y0 = self.area.y as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let frame_y1 = frame_y0 + self.area.height as i32;
        for sy in 0..dest.height {
            let dy = dest.y + sy as i32;
            if dy < frame_y0 || dy >= frame_y1 {
                continue;
            }
            let shift = row_shift(sy);
            for sx in 0..dest.width {
                let dx = dest.x + shift + sx as i32;
                if dx < frame_x0 || dx >= frame_x1 {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) = (
                    src.cell((sx, sy)),
                    self.buffer.cell_mut((dx as u16, dy as u16)),
                ) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

/// A rectangle of terminal cells whose origin may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    /// The part of this rectangle that lies inside `bounds`.
    pub fn clip(&self, bounds: Rect) -> Rect {
        let x0 = self.x.max(bounds.x as i32);
        let y0 = self.y.max(bounds.y as i32);
        let x1 = (self.x + self.width as i32).min(bounds.x as i32 + bounds.width as i32);
        let y1 = (self.y + self.height as i32).min(bounds.y as i32 + bounds.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return Rect::new(bounds.x, bounds.y, 0, 0);
        }
        Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16)
    }
}

/// Logical units per terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for CellScale {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}

impl CellScale {
    pub fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            cell_width: cell_width.max(1.0),
            cell_height: cell_height.max(1.0),
        }
    }

    pub fn workspace_for(&self, cols: u16, rows: u16) -> Workspace {
        Workspace::new(
            cols as f64 * self.cell_width,
            rows as f64 * self.cell_height,
        )
    }

    /// Logical position of the centre of cell (`col`, `row`).
    pub fn to_logical(&self, col: u16, row: u16) -> Point {
        Point::new(
            (col as f64 + 0.5) * self.cell_width,
            (row as f64 + 0.5) * self.cell_height,
        )
    }

    /// Cells covered by `region`, each edge rounded to the nearest cell line.
    pub fn to_cells(&self, region: Region) -> CellRect {
        let x0 = (region.left / self.cell_width).round() as i32;
        let y0 = (region.top / self.cell_height).round() as i32;
        let x1 = (region.right() / self.cell_width).round() as i32;
        let y1 = (region.bottom() / self.cell_height).round() as i32;
        CellRect {
            x: x0,
            y: y0,
            width: (x1 - x0).clamp(0, u16::MAX as i32) as u16,
            height: (y1 - y0).clamp(0, u16::MAX as i32) as u16,
        }
    }

    /// Chrome sized to whole cells: the border row is the north band, the
    /// title row below it the header, and each button three columns wide.
    pub fn chrome(&self) -> ChromeMetrics {
        ChromeMetrics {
            header_height: 2.0 * self.cell_height,
            resize_handle_thickness: self.cell_width.max(self.cell_height),
            control_button_width: 3.0 * self.cell_width,
        }
    }

    pub fn wm_config(&self, workspace: Workspace) -> WmConfig {
        WmConfig::default()
            .with_workspace(workspace)
            .with_chrome(self.chrome())
            .with_taskbar_height(3.0 * self.cell_height)
    }

    /// Column offset of `row` in a window `height` rows tall sheared by
    /// `skew_degrees` about its vertical centre.
    pub fn shear_shift(&self, row: u16, height: u16, skew_degrees: f64) -> i32 {
        let offset = row as f64 + 0.5 - height as f64 / 2.0;
        let shift = offset * self.cell_height * skew_degrees.to_radians().tan() / self.cell_width;
        shift.round() as i32
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// First row of the taskbar strip, clamped into `area`.
pub fn taskbar_top(desktop: &Desktop, area: Rect) -> u16 {
    let strip = desktop
        .scale()
        .to_cells(desktop.taskbar().strip(desktop.window_manager().config()));
    strip
        .y
        .clamp(area.y as i32, (area.y + area.height) as i32) as u16
}

/// Where the start menu sits: above the taskbar, flush with the left edge.
pub fn launcher_rect(area: Rect, taskbar_top: u16, rows: usize) -> Rect {
    let width = LAUNCHER_WIDTH.min(area.width);
    let room = taskbar_top.saturating_sub(area.y);
    let height = (rows as u16).saturating_add(4).min(room);
    Rect::new(area.x, taskbar_top - height, width, height)
}

/// Index of the launcher entry under cell (`col`, `row`).
pub fn launcher_item_at(rect: Rect, rows: usize, col: u16, row: u16) -> Option<usize> {
    let first = rect.y + 3;
    let inside_x = col > rect.x && col + 1 < rect.x + rect.width;
    let inside_y = row >= first && row + 1 < rect.y + rect.height;
    if !inside_x || !inside_y {
        return None;
    }
    let idx = (row - first) as usize;
    (idx < rows).then_some(idx)
}

pub fn render_desktop(frame: &mut UiFrame<'_>, desktop: &Desktop) {
    let area = frame.area();
    frame
        .buffer_mut()
        .set_style(area, Style::default().bg(DESKTOP_BG));
    render_icons(frame, desktop);

    let wm = desktop.window_manager();
    let decorator = wm.decorator();
    for id in wm.draw_order() {
        if let Some(record) = wm.record(id.as_str()) {
            render_window(
                frame,
                record,
                desktop.scale(),
                &wm.config().chrome,
                decorator.as_ref(),
                wm.is_active(id.as_str()),
            );
        }
    }

    render_taskbar(frame, desktop);
    if desktop.launcher().is_open() {
        render_launcher(frame, desktop);
    }
    if desktop.help_visible() {
        render_help(frame);
    }
}

fn render_icons(frame: &mut UiFrame<'_>, desktop: &Desktop) {
    let area = frame.area();
    let scale = desktop.scale();
    let glyph_style = Style::default().fg(Color::LightCyan).bg(DESKTOP_BG);
    let label_style = Style::default().fg(Color::White).bg(DESKTOP_BG);
    for tile in desktop.icons().tiles(desktop.window_manager().config()) {
        let cells = scale.to_cells(tile.region).clip(area);
        if cells.width == 0 || cells.height < 2 {
            continue;
        }
        let glyph = "[▣]";
        safe_set_string(
            frame.buffer_mut(),
            cells,
            cells.x + cells.width.saturating_sub(3) / 2,
            cells.y,
            glyph,
            glyph_style,
        );
        let label = truncate_to_width(tile.app.name, cells.width as usize);
        let width = label.chars().count() as u16;
        safe_set_string(
            frame.buffer_mut(),
            cells,
            cells.x + cells.width.saturating_sub(width) / 2,
            cells.y + 1,
            &label,
            label_style,
        );
    }
}

fn render_window(
    frame: &mut UiFrame<'_>,
    record: &WindowRecord,
    scale: &CellScale,
    chrome: &ChromeMetrics,
    decorator: &dyn WindowDecorator,
    focused: bool,
) {
    let geometry = record.geometry();
    let rect = scale.to_cells(geometry.region());
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let local = Rect::new(0, 0, rect.width, rect.height);
    let mut offscreen = Buffer::empty(local);
    offscreen.set_style(local, Style::default().bg(Color::Black).fg(Color::Gray));

    let buttons: Vec<_> = control_regions(&geometry, record.controls(), chrome)
        .into_iter()
        .map(|(action, region)| {
            let cells = scale.to_cells(region);
            let x = (cells.x - rect.x).max(0) as u16;
            let y = (cells.y - rect.y).max(0) as u16;
            (action, Rect::new(x, y, cells.width, cells.height))
        })
        .collect();
    decorator.render_window(
        &mut offscreen,
        local,
        record.title(),
        &buttons,
        focused,
        record.is_maximized(),
    );

    let body_row = rect.height / 2;
    let size_label = format!("{:.0} x {:.0}", geometry.width, geometry.height);
    for (row, text, style) in [
        (body_row, record.title(), Style::default().fg(Color::White)),
        (
            body_row + 1,
            size_label.as_str(),
            Style::default().fg(Color::DarkGray),
        ),
    ] {
        let width = text.chars().count() as u16;
        let x = rect.width.saturating_sub(width) / 2;
        if row + 1 < rect.height {
            safe_set_string(
                &mut offscreen,
                Rect::new(1, 0, rect.width.saturating_sub(2), rect.height),
                x.max(1),
                row,
                text,
                style,
            );
        }
    }

    if matches!(
        record.visibility(),
        Visibility::Closing { .. } | Visibility::Minimizing { .. }
    ) {
        offscreen.set_style(local, Style::default().add_modifier(Modifier::DIM));
    }

    let skew = record.presentation().skew_degrees;
    frame.blit_sheared(&offscreen, rect, |row| {
        scale.shear_shift(row, rect.height, skew)
    });
}

fn render_taskbar(frame: &mut UiFrame<'_>, desktop: &Desktop) {
    let area = frame.area();
    let wm = desktop.window_manager();
    let config = wm.config();
    let scale = desktop.scale();
    let taskbar = desktop.taskbar();

    let strip = scale.to_cells(taskbar.strip(config)).clip(area);
    if strip.height == 0 {
        return;
    }
    frame.buffer_mut().set_style(
        strip,
        Style::default().bg(Color::Rgb(20, 20, 28)).fg(Color::Gray),
    );
    let label_row = strip.y + strip.height / 2;

    let start = scale.to_cells(taskbar.start_button(config)).clip(area);
    let start_style = if desktop.launcher().is_open() {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default().fg(Color::White)
    }
    .add_modifier(Modifier::BOLD);
    frame.buffer_mut().set_style(start, start_style);
    safe_set_string(
        frame.buffer_mut(),
        start,
        start.x + 1,
        label_row,
        "≡ Start",
        start_style,
    );

    for button in taskbar.buttons(config) {
        let cells = scale.to_cells(button.region).clip(area);
        if cells.width < 3 {
            continue;
        }
        let style = match Taskbar::indicator(wm, button.app.id) {
            Indicator::Active => Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            Indicator::Running => Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::UNDERLINED),
            Indicator::Idle => Style::default().fg(Color::DarkGray),
        };
        frame.buffer_mut().set_style(cells, style);
        let inner = Rect::new(cells.x + 1, cells.y, cells.width - 2, cells.height);
        safe_set_string(
            frame.buffer_mut(),
            inner,
            inner.x,
            label_row,
            button.app.name,
            style,
        );
    }
}

fn render_launcher(frame: &mut UiFrame<'_>, desktop: &Desktop) {
    let area = frame.area();
    let launcher = desktop.launcher();
    let results = launcher.results(desktop.taskbar().apps());
    let rect = launcher_rect(area, taskbar_top(desktop, area), results.apps.len());
    if rect.height < 4 || rect.width < 4 {
        return;
    }
    frame.render_widget(Clear, rect);
    let block = Block::bordered()
        .title(" Start ")
        .style(Style::default().bg(Color::Rgb(36, 36, 48)).fg(Color::White));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let buffer = frame.buffer_mut();
    safe_set_string(
        buffer,
        inner,
        inner.x,
        inner.y,
        &format!("Search: {}_", launcher.query()),
        Style::default().fg(Color::White),
    );
    safe_set_string(
        buffer,
        inner,
        inner.x,
        inner.y + 1,
        results.heading.label(),
        Style::default().fg(Color::DarkGray),
    );
    for (idx, app) in results.apps.iter().enumerate() {
        let row = inner.y + 2 + idx as u16;
        let style = if idx == launcher.selected() {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        safe_set_string(buffer, inner, inner.x, row, &format!(" {} ", app.name), style);
    }
}

fn render_help(frame: &mut UiFrame<'_>) {
    let area = frame.area();
    let lines = HELP_TEXT.lines().count() as u16;
    let width = 64.min(area.width);
    let height = (lines + 2).min(area.height);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(HELP_TEXT).block(Block::bordered().title(" Help ")),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taskbar::DEFAULT_APPS;

    #[test]
    fn scale_maps_cell_centres() {
        let scale = CellScale::default();
        assert_eq!(scale.to_logical(0, 0), Point::new(4.0, 8.0));
        assert_eq!(scale.to_logical(10, 2), Point::new(84.0, 40.0));
        let ws = scale.workspace_for(160, 50);
        assert_eq!((ws.width, ws.height), (1280.0, 800.0));
    }

    #[test]
    fn regions_round_to_cell_lines() {
        let scale = CellScale::default();
        let rect = scale.to_cells(Region::new(50.0, 50.0, 800.0, 600.0));
        // 50/8 = 6.25, 850/8 = 106.25, 50/16 = 3.125, 650/16 = 40.625
        assert_eq!(
            rect,
            CellRect {
                x: 6,
                y: 3,
                width: 100,
                height: 38
            }
        );
        let negative = scale.to_cells(Region::new(-40.0, 0.0, 400.0, 300.0));
        assert_eq!(negative.x, -5);
    }

    #[test]
    fn terminal_chrome_keeps_buttons_clear_of_the_east_band() {
        let scale = CellScale::default();
        let chrome = scale.chrome();
        assert_eq!(chrome.header_height, 32.0);
        assert_eq!(chrome.resize_handle_thickness, 16.0);
        let config = scale.wm_config(scale.workspace_for(100, 30));
        assert_eq!(config.taskbar_height, 48.0);
        assert_eq!(config.usable_area().height, 27.0 * 16.0);
    }

    #[test]
    fn shear_leans_rows_about_the_centre() {
        let scale = CellScale::default();
        assert_eq!(scale.shear_shift(0, 10, 0.0), 0);
        let top = scale.shear_shift(0, 20, -15.0);
        let bottom = scale.shear_shift(19, 20, -15.0);
        assert!(top > 0);
        assert!(bottom < 0);
        assert_eq!(top, -bottom);
    }

    #[test]
    fn blit_sheared_offsets_rows_and_clips() {
        let frame_area = Rect::new(0, 0, 6, 3);
        let mut dest = Buffer::empty(frame_area);
        let mut frame = UiFrame::from_parts(frame_area, &mut dest);
        let mut src = Buffer::empty(Rect::new(0, 0, 2, 3));
        for y in 0..3u16 {
            for x in 0..2u16 {
                src[(x, y)].set_symbol("#");
            }
        }
        frame.blit_sheared(
            &src,
            CellRect {
                x: 1,
                y: 0,
                width: 2,
                height: 3,
            },
            |row| row as i32 - 1,
        );
        assert_eq!(dest[(0u16, 0u16)].symbol(), "#");
        assert_eq!(dest[(2u16, 0u16)].symbol(), " ");
        assert_eq!(dest[(1u16, 1u16)].symbol(), "#");
        assert_eq!(dest[(3u16, 2u16)].symbol(), "#");
        assert_eq!(dest[(1u16, 2u16)].symbol(), " ");
    }

    #[test]
    fn blit_ignores_rects_entirely_off_frame() {
        let frame_area = Rect::new(0, 0, 3, 3);
        let mut dest = Buffer::empty(frame_area);
        let mut frame = UiFrame::from_parts(frame_area, &mut dest);
        let mut src = Buffer::empty(Rect::new(0, 0, 2, 2));
        src[(0u16, 0u16)].set_symbol("#");
        frame.blit_sheared(
            &src,
            CellRect {
                x: -5,
                y: -5,
                width: 2,
                height: 2,
            },
            |_| 0,
        );
        assert!(dest.content.iter().all(|cell| cell.symbol() == " "));
    }

    #[test]
    fn cell_rect_clip() {
        let bounds = Rect::new(0, 0, 10, 5);
        let rect = CellRect {
            x: -2,
            y: 3,
            width: 5,
            height: 4,
        };
        assert_eq!(rect.clip(bounds), Rect::new(0, 3, 3, 2));
        let outside = CellRect {
            x: 20,
            y: 0,
            width: 2,
            height: 2,
        };
        assert_eq!(outside.clip(bounds).width, 0);
    }

    #[test]
    fn launcher_rows_map_to_items() {
        let rect = launcher_rect(Rect::new(0, 0, 80, 30), 27, 7);
        assert_eq!(rect, Rect::new(0, 16, 36, 11));
        assert_eq!(launcher_item_at(rect, 7, 5, 19), Some(0));
        assert_eq!(launcher_item_at(rect, 7, 5, 25), Some(6));
        assert_eq!(launcher_item_at(rect, 7, 5, 18), None);
        assert_eq!(launcher_item_at(rect, 7, 0, 19), None);
    }

    #[test]
    fn icons_are_drawn_under_windows() {
        let mut desktop = Desktop::new(CellScale::default(), 100, 30, &DEFAULT_APPS).unwrap();
        let area = Rect::new(0, 0, 100, 30);
        let mut buffer = Buffer::empty(area);
        render_desktop(&mut UiFrame::from_parts(area, &mut buffer), &desktop);
        // first tile spans cols 1..13, label on row 2
        let row: String = (1..13u16).map(|x| buffer[(x, 2u16)].symbol()).collect();
        assert!(row.contains("Google Chrom"));

        desktop.window_manager_mut().open("chrome");
        let mut buffer = Buffer::empty(area);
        render_desktop(&mut UiFrame::from_parts(area, &mut buffer), &desktop);
        let row: String = (1..13u16).map(|x| buffer[(x, 2u16)].symbol()).collect();
        assert!(!row.contains("Google Chrom"));
    }

    #[test]
    fn truncate_to_width_short_and_long() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }
}
