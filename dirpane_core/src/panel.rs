//! Directory panel controller.
//!
//! Owns one panel's [`PanelState`], runs the effects of every transition
//! against the injected collaborators and keeps the terminal lifecycle in
//! step with the visibility flag.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info, warn};

use crate::command::{Handlers, PanelAction};
use crate::config::SettingsManager;
use crate::directory::{DirEntry, DirectoryManager, ListingError, ListingResponse};
use crate::error::{PanelError, PanelResult};
use crate::layout::PanelLayout;
use crate::notifier::StatusNotifier;
use crate::persistence::{Persister, PersisterExt, terminal_open_key};
use crate::rect::Rect;
use crate::state::{Effect, PanelEvent, PanelState};
use crate::surface::PanelSurface;
use crate::terminal::{IntegratedTerminal, TerminalContainer, TerminalLifecycle};

/// Construction parameters of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelProps {
    /// Panel identity, e.g. `left`. Prefixes every persisted key.
    pub id: String,
    /// Directory shown on mount.
    pub path: PathBuf,
    /// Whether the panel starts out selected.
    pub is_selected_pane: bool,
    /// Area of the panel in cells.
    pub area: Rect,
}

/// Everything a panel talks to.
///
/// The persister, directory manager, settings and notifier are shared
/// between panels. The terminal and surface belong to this panel alone.
pub struct Collaborators {
    pub persister: Rc<dyn Persister>,
    pub directory_manager: Rc<dyn DirectoryManager>,
    pub settings_manager: Rc<dyn SettingsManager>,
    pub status_notifier: Rc<dyn StatusNotifier>,
    pub integrated_terminal: Box<dyn IntegratedTerminal>,
    pub surface: Box<dyn PanelSurface>,
    /// Tells the enclosing shell this panel wants to be selected.
    pub send_selected_pane_up: Box<dyn FnMut()>,
}

/// Read-only snapshot of a panel for rendering.
#[derive(Debug, Clone, Copy)]
pub struct PanelView<'a> {
    pub id: &'a str,
    pub path: &'a Path,
    pub entries: &'a [DirEntry],
    pub listing_error: Option<&'a ListingError>,
    pub is_loading: bool,
    pub is_selected_pane: bool,
    pub is_terminal_open: bool,
    pub shell_name: &'a str,
    pub layout: PanelLayout,
}

/// Controller of one directory panel.
pub struct PanelController {
    state: PanelState,
    terminal: TerminalLifecycle,
    handlers: Handlers,
    key_bindings: HashMap<String, PanelAction>,
    collaborators: Collaborators,
}

impl PanelController {
    /// Mount a panel.
    ///
    /// Reads the persisted terminal visibility once, falling back to the
    /// settings default, and issues the first listing of `props.path`.
    pub fn mount(props: PanelProps, collaborators: Collaborators) -> Self {
        let settings = collaborators.settings_manager.settings();
        let default_open = settings.terminal.start_open;
        let key_bindings = settings.keybindings.to_bindings_map();
        let state = PanelState::new(
            props.id,
            props.path,
            props.is_selected_pane,
            props.area,
            settings,
        );

        let key = terminal_open_key(state.id());
        let persisted_open = match collaborators.persister.get::<bool>(&key) {
            Ok(value) => value,
            Err(err) => {
                warn!("Could not read {key}, using default: {err}");
                None
            },
        };

        info!(
            "Mounting panel {} at {} (shell: {})",
            state.id(),
            state.current_path().display(),
            collaborators.integrated_terminal.shell_name()
        );

        let mut controller = Self {
            state,
            terminal: TerminalLifecycle::Closed,
            handlers: Handlers::new(),
            key_bindings,
            collaborators,
        };
        controller.dispatch(PanelEvent::Mount { persisted_open, default_open });
        controller
    }

    /// Navigate to `path`, superseding any listing in flight.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.dispatch(PanelEvent::SetPath(path.into()));
    }

    /// Show or hide the integrated terminal.
    pub fn toggle_terminal(&mut self) {
        self.perform(PanelAction::ToggleIntegratedTerminal);
    }

    pub fn navigate_to_parent(&mut self) {
        self.perform(PanelAction::NavigateToParent);
    }

    pub fn refresh(&mut self) {
        self.perform(PanelAction::Refresh);
    }

    pub fn toggle_hidden_files(&mut self) {
        self.perform(PanelAction::ToggleHiddenFiles);
    }

    /// Enter the directory entry called `name`.
    ///
    /// Returns `false` when no such directory is listed.
    pub fn open_entry(&mut self, name: &str) -> bool {
        let is_dir = self.state.entries().iter().any(|e| e.name == name && e.is_dir());
        if is_dir {
            let path = self.state.current_path().join(name);
            self.set_path(path);
        }
        is_dir
    }

    /// Deliver a resolved listing. Results for superseded requests are
    /// dropped.
    pub fn on_directory_fetched(&mut self, response: ListingResponse) {
        self.dispatch(PanelEvent::ListingFinished(response));
    }

    /// The shell changed its working directory on its own.
    pub fn on_terminal_directory_changed(&mut self, path: impl Into<PathBuf>) {
        self.dispatch(PanelEvent::TerminalDirectoryChanged(path.into()));
    }

    /// Run the handler registered under `name`.
    pub fn on_keyboard_shortcut(&mut self, name: &str) -> PanelResult<()> {
        let action =
            self.handlers.get(name).ok_or_else(|| PanelError::UnknownAction(name.to_owned()))?;
        self.perform(action);
        Ok(())
    }

    /// Run the action bound to `key` in the settings, if any.
    pub fn on_key(&mut self, key: &str) -> bool {
        match self.key_bindings.get(key).copied() {
            Some(action) => {
                self.perform(action);
                true
            },
            None => false,
        }
    }

    pub fn perform(&mut self, action: PanelAction) {
        debug!("Panel {} performs {action}", self.state.id());
        self.dispatch(PanelEvent::Action(action));
    }

    /// The panel's area changed.
    pub fn resize(&mut self, area: Rect) {
        self.dispatch(PanelEvent::Resized(area));
    }

    /// Rebind an open terminal after the host recreated its surface.
    pub fn remount(&mut self) {
        if let TerminalLifecycle::Open(container) = &self.terminal {
            let terminal = &mut self.collaborators.integrated_terminal;
            terminal.open_in(container);
            terminal.fit();
        }
    }

    pub fn set_selected_pane(&mut self, selected: bool) {
        self.dispatch(PanelEvent::SetSelected(selected));
    }

    /// The user interacted with this panel.
    pub fn activate(&mut self) {
        self.dispatch(PanelEvent::Activate);
    }

    /// Handler table for the key-binding layer. Stable for the panel's
    /// lifetime.
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn terminal_lifecycle(&self) -> &TerminalLifecycle {
        &self.terminal
    }

    pub fn view(&self) -> PanelView<'_> {
        PanelView {
            id: self.state.id(),
            path: self.state.current_path(),
            entries: self.state.entries(),
            listing_error: self.state.listing_error(),
            is_loading: self.state.is_loading(),
            is_selected_pane: self.state.is_selected_pane(),
            is_terminal_open: self.state.is_terminal_open(),
            shell_name: self.collaborators.integrated_terminal.shell_name(),
            layout: self.state.layout(),
        }
    }

    fn dispatch(&mut self, event: PanelEvent) {
        let transition = self.state.update(event);
        for effect in transition.effects {
            self.run(effect);
        }
        if transition.redraw {
            self.collaborators.surface.request_redraw();
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::RequestListing(request) => {
                debug!(
                    "Panel {} requests listing {} of {}",
                    self.state.id(),
                    request.token,
                    request.path.display()
                );
                self.collaborators.directory_manager.list_directory(request);
            },
            Effect::Persist { key, value } => {
                if let Err(err) = self.collaborators.persister.set(&key, &value) {
                    warn!("Could not persist {key}={value}: {err}");
                }
            },
            Effect::OpenTerminal => {
                let container = self.terminal_container();
                self.collaborators.integrated_terminal.open_in(&container);
                self.terminal = TerminalLifecycle::Open(container);
            },
            Effect::CloseTerminal => {
                self.collaborators.integrated_terminal.detach();
                self.terminal = TerminalLifecycle::Closed;
            },
            Effect::FitTerminal => self.fit_terminal(),
            Effect::ChangeDirectory(path) => {
                if self.terminal.is_open() {
                    self.collaborators.integrated_terminal.change_directory(&path);
                }
            },
            Effect::FocusFileList => self.collaborators.surface.focus_file_list(),
            Effect::Notify(status) => self.collaborators.status_notifier.notify(status),
            Effect::SelectPane => (self.collaborators.send_selected_pane_up)(),
        }
    }

    /// Fit the open terminal, rebinding it first when its region moved.
    fn fit_terminal(&mut self) {
        let area = self.terminal_container().area;
        let TerminalLifecycle::Open(container) = &mut self.terminal else {
            return;
        };

        let terminal = &mut self.collaborators.integrated_terminal;
        if container.area != area {
            container.area = area;
            terminal.open_in(container);
        }
        terminal.fit();
    }

    fn terminal_container(&self) -> TerminalContainer {
        let layout = self.state.layout();
        TerminalContainer {
            panel_id: self.state.id().to_owned(),
            area: layout.terminal.unwrap_or(layout.file_list),
        }
    }
}

impl fmt::Debug for PanelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelController")
            .field("state", &self.state)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}
