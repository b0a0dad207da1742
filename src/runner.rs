use std::io;
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::desktop::Desktop;
use crate::drivers::InputDriver;
use crate::event_loop::{ControlFlow, EventLoop, LoopEvent};
use crate::ui::UiFrame;

/// Drive `desktop` from `driver` until it asks to quit.
///
/// Input is applied as it arrives; the idle step of every loop iteration
/// settles timed transitions and redraws only when something changed.
pub fn run_desktop<B, D>(
    terminal: &mut Terminal<B>,
    driver: D,
    desktop: &mut Desktop,
    poll_interval: Duration,
) -> io::Result<()>
where
    B: Backend,
    D: InputDriver,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;
    let size = terminal
        .size()
        .map_err(|err| io::Error::other(err.to_string()))?;
    desktop.resize(size.width, size.height);

    let result = event_loop.run(|_, event| match event {
        LoopEvent::Input(event) => Ok(desktop.handle_event(&event)),
        LoopEvent::Idle(now) => {
            desktop.tick(now);
            if desktop.take_dirty() {
                draw_desktop(terminal, desktop)?;
            }
            Ok(ControlFlow::Continue)
        }
    });
    event_loop.driver().set_mouse_capture(false)?;
    result
}

pub fn draw_desktop<B: Backend>(terminal: &mut Terminal<B>, desktop: &Desktop) -> io::Result<()> {
    terminal
        .draw(|frame| {
            let mut ui = UiFrame::new(frame);
            desktop.draw(&mut ui);
        })
        .map(|_| ())
        .map_err(|err| io::Error::other(err.to_string()))
}
