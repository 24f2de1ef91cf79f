//! Integrated terminal contract.
//!
//! The shell session and its emulator live in the host. A panel only sees
//! this capability set, which keeps shell backends swappable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rect::Rect;

/// The display region a terminal is opened into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalContainer {
    /// Id of the panel owning the container.
    pub panel_id: String,
    /// Region in cells.
    pub area: Rect,
}

/// A handle over one interactive shell session.
///
/// None of these calls report completion; they are hints to the session.
pub trait IntegratedTerminal {
    /// Name of the shell backing the session.
    fn shell_name(&self) -> &str;

    /// Bind the session to `container`.
    ///
    /// May be called again with a different container, e.g. after a remount.
    fn open_in(&mut self, container: &TerminalContainer);

    /// Resize the session's display buffer to its container.
    ///
    /// A no-op while no session is open.
    fn fit(&mut self);

    /// Ask the shell to change its working directory.
    fn change_directory(&mut self, path: &Path);

    /// Release the container after the terminal is hidden.
    fn detach(&mut self) {}
}

/// Mount state of a panel's terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TerminalLifecycle {
    /// Not mounted in any container.
    #[default]
    Closed,
    /// Mounted in `container`.
    Open(TerminalContainer),
}

impl TerminalLifecycle {
    pub fn is_open(&self) -> bool {
        matches!(self, TerminalLifecycle::Open(_))
    }

    pub fn container(&self) -> Option<&TerminalContainer> {
        match self {
            TerminalLifecycle::Open(container) => Some(container),
            TerminalLifecycle::Closed => None,
        }
    }
}
