//! Panel state and its transition function.
//!
//! [`PanelState::update`] applies one [`PanelEvent`] and describes the
//! resulting side effects as [`Effect`]s without touching any collaborator.
//! The controller runs the effects afterwards, in order.

use std::path::{Path, PathBuf};

use log::debug;

use crate::command::PanelAction;
use crate::config::Settings;
use crate::directory::{
    DirEntry, ListOptions, ListingError, ListingRequest, ListingResponse, RequestToken,
};
use crate::layout::PanelLayout;
use crate::notifier::Status;
use crate::persistence::terminal_open_key;
use crate::rect::Rect;

/// Something that happened to a panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// First mount. `persisted_open` is the stored terminal visibility.
    Mount { persisted_open: Option<bool>, default_open: bool },
    /// Navigate to a path.
    SetPath(PathBuf),
    /// A bound action was triggered.
    Action(PanelAction),
    /// A listing request resolved.
    ListingFinished(ListingResponse),
    /// The shell reported a new working directory.
    TerminalDirectoryChanged(PathBuf),
    /// The panel's area changed.
    Resized(Rect),
    /// The enclosing shell changed which panel is selected.
    SetSelected(bool),
    /// The user interacted with the panel.
    Activate,
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand a listing request to the directory manager.
    RequestListing(ListingRequest),
    /// Write the terminal visibility flag.
    Persist { key: String, value: bool },
    /// Mount the terminal into the panel's terminal region.
    OpenTerminal,
    /// Unmount the terminal.
    CloseTerminal,
    /// Fit the terminal to its (possibly resized) region.
    FitTerminal,
    /// Send the shell to a directory.
    ChangeDirectory(PathBuf),
    /// Move focus back to the file list.
    FocusFileList,
    /// Push a status message.
    Notify(Status),
    /// Ask the enclosing shell to select this panel.
    SelectPane,
}

/// Outcome of one transition.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transition {
    pub effects: Vec<Effect>,
    /// Whether the panel needs one redraw.
    pub redraw: bool,
}

impl Transition {
    fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

/// Mutable state of one panel.
#[derive(Debug, Clone)]
pub struct PanelState {
    id: String,
    current_path: PathBuf,
    is_terminal_open: bool,
    entries: Vec<DirEntry>,
    listing_error: Option<ListingError>,
    is_selected_pane: bool,
    options: ListOptions,
    area: Rect,
    terminal_ratio: f32,
    follow_navigation: bool,
    /// Directory the shell was last sent to or reported.
    terminal_cwd: Option<PathBuf>,
    /// Latest issued listing that has not resolved yet.
    pending: Option<RequestToken>,
    last_token: u64,
}

impl PanelState {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        is_selected_pane: bool,
        area: Rect,
        settings: &Settings,
    ) -> Self {
        Self {
            id: id.into(),
            current_path: path.into(),
            is_terminal_open: false,
            entries: Vec::new(),
            listing_error: None,
            is_selected_pane,
            options: (&settings.listing).into(),
            area,
            terminal_ratio: settings.terminal.height_ratio,
            follow_navigation: settings.terminal.follow_panel_navigation,
            terminal_cwd: None,
            pending: None,
            last_token: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn is_terminal_open(&self) -> bool {
        self.is_terminal_open
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn listing_error(&self) -> Option<&ListingError> {
        self.listing_error.as_ref()
    }

    pub fn is_selected_pane(&self) -> bool {
        self.is_selected_pane
    }

    pub fn options(&self) -> ListOptions {
        self.options
    }

    /// Whether a listing for the current path is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<RequestToken> {
        self.pending
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn layout(&self) -> PanelLayout {
        PanelLayout::compute(self.area, self.is_terminal_open, self.terminal_ratio)
    }

    /// Apply `event`, returning the side effects to perform.
    pub fn update(&mut self, event: PanelEvent) -> Transition {
        let mut t = Transition::default();
        match event {
            PanelEvent::Mount { persisted_open, default_open } => {
                self.is_terminal_open = persisted_open.unwrap_or(default_open);
                self.issue_listing(&mut t);
                if self.is_terminal_open {
                    self.open_terminal(&mut t);
                }
                t.redraw = true;
            },
            PanelEvent::SetPath(path) => self.navigate(path, true, &mut t),
            PanelEvent::Action(action) => self.perform(action, &mut t),
            PanelEvent::ListingFinished(response) => self.apply_listing(response, &mut t),
            PanelEvent::TerminalDirectoryChanged(path) => {
                self.terminal_cwd = Some(path.clone());
                if path != self.current_path {
                    self.navigate(path, false, &mut t);
                }
            },
            PanelEvent::Resized(area) => {
                if area != self.area {
                    self.area = area;
                    if self.is_terminal_open {
                        t.push(Effect::FitTerminal);
                    }
                    t.redraw = true;
                }
            },
            PanelEvent::SetSelected(selected) => {
                if selected != self.is_selected_pane {
                    self.is_selected_pane = selected;
                    t.redraw = true;
                }
            },
            PanelEvent::Activate => {
                if !self.is_selected_pane {
                    t.push(Effect::SelectPane);
                }
            },
        }
        t
    }

    fn perform(&mut self, action: PanelAction, t: &mut Transition) {
        match action {
            PanelAction::ToggleIntegratedTerminal => self.toggle_terminal(t),
            PanelAction::NavigateToParent => {
                if let Some(parent) = self.current_path.parent() {
                    let parent = parent.to_path_buf();
                    self.navigate(parent, true, t);
                }
            },
            PanelAction::Refresh => {
                self.issue_listing(t);
                t.redraw = true;
            },
            PanelAction::ToggleHiddenFiles => {
                self.options.show_hidden = !self.options.show_hidden;
                self.issue_listing(t);
                t.redraw = true;
            },
        }
    }

    fn toggle_terminal(&mut self, t: &mut Transition) {
        self.is_terminal_open = !self.is_terminal_open;
        t.push(Effect::Persist { key: terminal_open_key(&self.id), value: self.is_terminal_open });

        if self.is_terminal_open {
            self.open_terminal(t);
        } else {
            t.push(Effect::CloseTerminal);
            t.push(Effect::FocusFileList);
        }
        t.redraw = true;
    }

    fn open_terminal(&mut self, t: &mut Transition) {
        t.push(Effect::OpenTerminal);
        t.push(Effect::FitTerminal);
        self.sync_terminal_cwd(t);
    }

    /// Point the shell at the current path if it follows navigation and is
    /// elsewhere. A closed terminal is synced when it next opens.
    fn sync_terminal_cwd(&mut self, t: &mut Transition) {
        if !self.is_terminal_open || !self.follow_navigation {
            return;
        }
        if self.terminal_cwd.as_ref() != Some(&self.current_path) {
            self.terminal_cwd = Some(self.current_path.clone());
            t.push(Effect::ChangeDirectory(self.current_path.clone()));
        }
    }

    fn navigate(&mut self, path: PathBuf, sync_terminal: bool, t: &mut Transition) {
        self.current_path = path;
        self.entries.clear();
        self.listing_error = None;
        self.issue_listing(t);
        if sync_terminal {
            self.sync_terminal_cwd(t);
        }
        t.redraw = true;
    }

    fn issue_listing(&mut self, t: &mut Transition) {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.pending = Some(token);
        t.push(Effect::RequestListing(ListingRequest {
            token,
            path: self.current_path.clone(),
            options: self.options,
        }));
    }

    fn apply_listing(&mut self, response: ListingResponse, t: &mut Transition) {
        if self.pending != Some(response.token) || response.path != self.current_path {
            debug!(
                "Discarding stale listing {} for {} in panel {}",
                response.token,
                response.path.display(),
                self.id
            );
            return;
        }

        self.pending = None;
        match response.result {
            Ok(entries) => {
                self.entries = entries;
                self.listing_error = None;
            },
            Err(err) => {
                self.entries.clear();
                t.push(Effect::Notify(Status::error(format!(
                    "Cannot list {}: {err}",
                    response.path.display()
                ))));
                self.listing_error = Some(err);
            },
        }
        t.redraw = true;
    }
}
