//! Division of a panel into its file list and terminal regions.

use serde::{Deserialize, Serialize};

use crate::rect::Rect;

/// Screen regions of a panel for one terminal visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelLayout {
    /// Region occupied by the file list.
    pub file_list: Rect,
    /// Region hosting the integrated terminal, when it is open.
    pub terminal: Option<Rect>,
}

impl PanelLayout {
    /// Compute the layout of a panel.
    ///
    /// `terminal_ratio` is the share of the height given to the terminal,
    /// which always sits below the file list.
    pub fn compute(area: Rect, terminal_open: bool, terminal_ratio: f32) -> Self {
        if !terminal_open {
            return Self { file_list: area, terminal: None };
        }

        let (file_list, terminal) = area.split_horizontal(1.0 - terminal_ratio);
        Self { file_list, terminal: Some(terminal) }
    }
}
