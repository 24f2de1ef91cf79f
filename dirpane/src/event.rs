//! Events delivered to the main loop.

use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use dirpane_core::directory::ListingResponse;

/// Which of the two panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Panel id, used to namespace persisted state.
    pub fn id(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug)]
pub enum Event {
    /// A directory listing for a panel finished.
    Listing { side: Side, response: ListingResponse },
    /// One line of user input.
    Input(String),
    /// Standard input was closed.
    InputClosed,
    /// The contents of a watched directory changed.
    DirectoryChanged(PathBuf),
    /// A panel asked to become the selected one.
    SelectPane(Side),
}

/// Cloneable handle for posting events from any thread.
#[derive(Debug, Clone)]
pub struct EventProxy {
    sender: Sender<Event>,
}

impl EventProxy {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { sender }
    }

    /// Post an event. Events sent after the loop exited are dropped.
    pub fn send_event(&self, event: Event) {
        let _ = self.sender.send(event);
    }
}
