// SPDX-License-Identifier: GPL-3.0-only

//! Terminal display
//!
//! Renders RGB images to the terminal using Unicode half-block characters
//! for improved vertical resolution. Hosts the event loops of the viewer and
//! the live capture tool.

use crate::app::{self, Flow, Message, Scheduler, Session};
use crate::backends::sensor::DepthSensor;
use crate::constants::{threshold::STEP_MM, tilt::STEP_DEGREES, timing::INPUT_POLL};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::info;

type TermResult<T> = Result<T, Box<dyn std::error::Error>>;
type Term = Terminal<CrosstermBackend<io::Stdout>>;

const LIVE_INSTRUCTIONS: &str =
    "space: take shot | +/-: threshold | up/down: tilt | q: quit";

/// Show a still image until the user quits
pub fn run_viewer(image: &RgbImage, file_name: &str, quit: &AtomicBool) -> TermResult<()> {
    with_terminal(|terminal| {
        let status = format!("File: {}", file_name);
        while !quit.load(Ordering::Relaxed) {
            terminal.draw(|f| {
                let [image_area, status_area] = split_status(f.area());
                f.render_widget(FrameWidget::new(Some(image)), image_area);
                f.render_widget(StatusBar { message: &status }, status_area);
            })?;

            if let Some(key) = next_key()?
                && is_quit_key(&key)
            {
                break;
            }
        }
        Ok(())
    })
}

/// Run the live capture loop until the user quits
///
/// The sensor must already be started; stopping it is left to the caller.
pub fn run_live(
    session: &mut Session,
    sensor: &mut dyn DepthSensor,
    quit: &AtomicBool,
) -> TermResult<()> {
    info!(sensor = sensor.name(), "Entering live view");
    let mut scheduler = Scheduler::new();

    let result = with_terminal(|terminal| {
        while !quit.load(Ordering::Relaxed) {
            if app::pump(session, &mut scheduler, sensor, Instant::now()) == Flow::Quit {
                break;
            }

            draw_live(terminal, session)?;

            if let Some(key) = next_key()?
                && let Some(message) = live_message(&key)
                && app::dispatch(session, &mut scheduler, sensor, message) == Flow::Quit
            {
                break;
            }
        }
        Ok(())
    });

    session.shutdown();
    result
}

fn draw_live(terminal: &mut Term, session: &Session) -> TermResult<()> {
    let status = session.status_text();
    terminal.draw(|f| {
        let area = f.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);
        let views = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let depth = session.depth_image().map(|image| image.as_rgb_image());
        f.render_widget(
            FrameWidget::new(depth).placeholder("Waiting for depth..."),
            views[0],
        );
        f.render_widget(
            FrameWidget::new(session.video_image()).placeholder("No video"),
            views[1],
        );
        f.render_widget(StatusBar { message: &status }, rows[1]);
        f.render_widget(
            StatusBar {
                message: LIVE_INSTRUCTIONS,
            },
            rows[2],
        );
    })?;
    Ok(())
}

/// Enter the alternate screen, run `body`, and always restore the terminal
fn with_terminal<F>(body: F) -> TermResult<()>
where
    F: FnOnce(&mut Term) -> TermResult<()>,
{
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = body(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Wait up to one input poll interval for a key press
fn next_key() -> TermResult<Option<KeyEvent>> {
    if event::poll(INPUT_POLL)?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(Some(key));
    }
    Ok(None)
}

fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Map a key press in the live view to a session message
pub fn live_message(key: &KeyEvent) -> Option<Message> {
    if is_quit_key(key) {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Char(' ') => Some(Message::TakeShot),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Message::AdjustThreshold(STEP_MM)),
        KeyCode::Char('-') => Some(Message::AdjustThreshold(-STEP_MM)),
        KeyCode::Up => Some(Message::AdjustTilt(STEP_DEGREES)),
        KeyCode::Down => Some(Message::AdjustTilt(-STEP_DEGREES)),
        _ => None,
    }
}

fn split_status(area: Rect) -> [Rect; 2] {
    let image = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    [image, status]
}

/// Largest size, in cells, that shows `width × height` pixels undistorted
///
/// Each cell holds two vertically stacked pixels.
pub fn fit_half_blocks(area_width: u16, area_height: u16, width: u32, height: u32) -> (u16, u16) {
    if width == 0 || height == 0 || area_width == 0 || area_height == 0 {
        return (0, 0);
    }

    let frame_aspect = width as f64 / height as f64;
    let term_width = area_width as f64;
    let term_height = area_height as f64 * 2.0;

    if term_width / term_height > frame_aspect {
        // Terminal is wider - fit to height
        let w = term_height * frame_aspect;
        ((w as u16).max(1), area_height)
    } else {
        // Terminal is taller - fit to width
        let h = term_width / frame_aspect;
        (area_width, ((h / 2.0) as u16).max(1))
    }
}

/// Renders an image using half-block characters, centred and aspect-preserving
struct FrameWidget<'a> {
    image: Option<&'a RgbImage>,
    placeholder: &'a str,
}

impl<'a> FrameWidget<'a> {
    fn new(image: Option<&'a RgbImage>) -> Self {
        Self {
            image,
            placeholder: "Waiting for frame...",
        }
    }

    fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(image) = self.image else {
            let msg = self.placeholder;
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        let (display_width, display_height) =
            fit_half_blocks(area.width, area.height, image.width(), image.height());
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = image.width() as f64 / display_width as f64;
        let y_scale = image.height() as f64 / (display_height as f64 * 2.0);

        // Upper half (▀) is the fg color, lower half the bg color
        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(sample_pixel(image, src_x, src_y_top));
                    cell.set_bg(sample_pixel(image, src_x, src_y_bottom));
                }
            }
        }
    }
}

fn sample_pixel(image: &RgbImage, x: u32, y: u32) -> Color {
    let x = x.min(image.width() - 1);
    let y = y.min(image.height() - 1);
    let [r, g, b] = image.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(
            area.x,
            area.y,
            text,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_live_key_mapping() {
        assert!(matches!(
            live_message(&key(KeyCode::Char(' '))),
            Some(Message::TakeShot)
        ));
        assert!(matches!(
            live_message(&key(KeyCode::Char('+'))),
            Some(Message::AdjustThreshold(100))
        ));
        assert!(matches!(
            live_message(&key(KeyCode::Char('-'))),
            Some(Message::AdjustThreshold(-100))
        ));
        assert!(matches!(
            live_message(&key(KeyCode::Down)),
            Some(Message::AdjustTilt(-5))
        ));
        assert!(live_message(&key(KeyCode::Char('x'))).is_none());
    }

    #[test]
    fn test_quit_keys() {
        assert!(matches!(live_message(&key(KeyCode::Esc)), Some(Message::Quit)));
        assert!(matches!(
            live_message(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Message::Quit)
        ));
        assert!(live_message(&key(KeyCode::Char('c'))).is_none());
    }

    #[test]
    fn test_fit_preserves_aspect() {
        // 640x480 in 80x24 cells: height bound, 48 pixel rows -> 64 columns
        assert_eq!(fit_half_blocks(80, 24, 640, 480), (64, 24));
        // Narrow area: width bound
        assert_eq!(fit_half_blocks(40, 100, 640, 480), (40, 15));
        assert_eq!(fit_half_blocks(0, 10, 640, 480), (0, 0));
    }

    #[test]
    fn test_frame_widget_renders_pixels() {
        let image = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        FrameWidget::new(Some(&image)).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn test_status_bar_truncates() {
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        StatusBar {
            message: "Threshold: 1500",
        }
        .render(area, &mut buf);
        assert_eq!(buf[(4, 0)].symbol(), "s");
    }
}
