//! The panel's primary interactive surface.

/// Rendering and focus hooks of the element hosting a panel's file list.
pub trait PanelSurface {
    /// Schedule one redraw of the panel.
    fn request_redraw(&mut self);

    /// Move keyboard focus to the file list.
    fn focus_file_list(&mut self);
}
