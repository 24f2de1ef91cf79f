//! Console rendering, focus tracking and status output.

use std::cell::{Cell, RefCell};
use std::fmt::Write;
use std::rc::Rc;

use log::{error, info, warn};

use dirpane_core::PanelView;
use dirpane_core::config::{Theme, parse_hex_color};
use dirpane_core::directory::EntryKind;
use dirpane_core::notifier::{Status, StatusLevel, StatusNotifier};
use dirpane_core::surface::PanelSurface;

use crate::event::Side;

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    FileList(Side),
    Terminal(Side),
}

impl Focus {
    pub fn side(self) -> Side {
        match self {
            Focus::FileList(side) | Focus::Terminal(side) => side,
        }
    }
}

/// Surface of one panel on the console.
///
/// Redraw requests only mark the screen dirty; the main loop renders once
/// after draining its queue.
pub struct ConsoleSurface {
    side: Side,
    dirty: Rc<Cell<bool>>,
    focus: Rc<Cell<Focus>>,
}

impl ConsoleSurface {
    pub fn new(side: Side, dirty: Rc<Cell<bool>>, focus: Rc<Cell<Focus>>) -> Self {
        Self { side, dirty, focus }
    }
}

impl PanelSurface for ConsoleSurface {
    fn request_redraw(&mut self) {
        self.dirty.set(true);
    }

    fn focus_file_list(&mut self) {
        self.focus.set(Focus::FileList(self.side));
        self.dirty.set(true);
    }
}

/// Keeps the latest status for the status line and logs every message.
#[derive(Default)]
pub struct ConsoleNotifier {
    latest: RefCell<Option<Status>>,
}

impl ConsoleNotifier {
    pub fn latest(&self) -> Option<Status> {
        self.latest.borrow().clone()
    }
}

impl StatusNotifier for ConsoleNotifier {
    fn notify(&self, status: Status) {
        match status.level {
            StatusLevel::Info => info!("{}", status.message),
            StatusLevel::Warning => warn!("{}", status.message),
            StatusLevel::Error => error!("{}", status.message),
        }
        *self.latest.borrow_mut() = Some(status);
    }
}

/// Maximum number of entries printed per panel.
const MAX_ROWS: usize = 40;

/// Render one panel as text.
pub fn render_panel(view: &PanelView<'_>, theme: &Theme, focus: Focus, color: bool) -> String {
    let mut out = String::new();
    let side_focused = focus.side().id() == view.id;

    let marker = if view.is_selected_pane { '*' } else { ' ' };
    let header = format!("{marker} [{}] {}", view.id, view.path.display());
    let header_color = if view.is_selected_pane { &theme.selected } else { &theme.foreground };
    let _ = writeln!(out, "{}", paint(&header, header_color, color));

    if let Some(err) = view.listing_error {
        let _ = writeln!(out, "  {}", paint(&format!("<{err}>"), &theme.error, color));
    } else if view.is_loading {
        let _ = writeln!(out, "  <loading>");
    } else if view.entries.is_empty() {
        let _ = writeln!(out, "  <empty>");
    }

    for entry in view.entries.iter().take(MAX_ROWS) {
        let line = match entry.kind {
            EntryKind::Directory => paint(&format!("{}/", entry.name), &theme.directory, color),
            EntryKind::Symlink => format!("{}@", entry.name),
            EntryKind::File => format!("{:<40} {:>10}", entry.name, entry.size),
        };
        let _ = writeln!(out, "  {line}");
    }
    if view.entries.len() > MAX_ROWS {
        let _ = writeln!(out, "  ... {} more", view.entries.len() - MAX_ROWS);
    }

    if let Some(area) = view.layout.terminal {
        let focused = side_focused && matches!(focus, Focus::Terminal(_));
        let _ = writeln!(
            out,
            "  [terminal: {} {}x{}{}]",
            view.shell_name,
            area.width,
            area.height,
            if focused { ", focused" } else { "" }
        );
    }
    out
}

/// Render the status line.
pub fn render_status(status: Option<&Status>, theme: &Theme, color: bool) -> String {
    match status {
        Some(status) if status.level == StatusLevel::Error => {
            paint(&status.to_string(), &theme.error, color)
        },
        Some(status) => status.to_string(),
        None => String::new(),
    }
}

/// Wrap `text` in a 24-bit foreground colour escape.
fn paint(text: &str, hex: &str, color: bool) -> String {
    match parse_hex_color(hex) {
        Ok((r, g, b)) if color => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        _ => text.to_owned(),
    }
}
