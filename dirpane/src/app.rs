//! The dual-pane host: routes events to the two panels and renders them.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::error::Error;
use std::io::{self, IsTerminal, Write};
use std::path::{self, Component, Path, PathBuf};
use std::rc::Rc;

use log::{debug, info, warn};

use dirpane_core::config::{Settings, StaticSettings};
use dirpane_core::notifier::{Status, StatusNotifier};
use dirpane_core::persistence::{JsonFilePersister, MemoryPersister, Persister};
use dirpane_core::rect::Rect;
use dirpane_core::{Collaborators, PanelController, PanelProps};

use crate::cli::Options;
use crate::console::{self, ConsoleNotifier, ConsoleSurface, Focus};
use crate::event::{Event, EventProxy, Side};
use crate::input::InputCommand;
use crate::lister::ThreadedLister;
use crate::shell::{SharedShell, ShellInput, ShellTerminal};
use crate::watcher::DirectoryWatcher;

/// Size assumed until the user resizes.
const DEFAULT_COLUMNS: u16 = 160;
const DEFAULT_ROWS: u16 = 40;

struct Pane {
    controller: PanelController,
    /// Input side of the terminal the controller drives.
    shell: Rc<RefCell<dyn ShellInput>>,
}

pub struct App {
    left: Pane,
    right: Pane,
    selected: Side,
    focus: Rc<Cell<Focus>>,
    dirty: Rc<Cell<bool>>,
    notifier: Rc<ConsoleNotifier>,
    watcher: Option<DirectoryWatcher>,
    changed_directories: HashSet<PathBuf>,
    settings: Settings,
    color: bool,
}

impl App {
    pub fn new(
        options: &Options,
        settings: Settings,
        proxy: EventProxy,
    ) -> Result<Self, Box<dyn Error>> {
        let left_path = match &options.path {
            Some(path) => path::absolute(path)?,
            None => std::env::current_dir()?,
        };
        let right_path = match &options.right {
            Some(path) => path::absolute(path)?,
            None => left_path.clone(),
        };

        let persister = open_persister(options);
        let settings_manager = Rc::new(StaticSettings::new(settings.clone()));
        let notifier = Rc::new(ConsoleNotifier::default());
        let focus = Rc::new(Cell::new(Focus::FileList(Side::Left)));
        let dirty = Rc::new(Cell::new(true));

        let (left_area, right_area) = pane_areas(DEFAULT_COLUMNS, DEFAULT_ROWS);
        let mount = |side: Side, path: PathBuf, area: Rect| {
            let (terminal, shell) = SharedShell::new(ShellTerminal::new(&settings.terminal));
            let select_proxy = proxy.clone();
            let collaborators = Collaborators {
                persister: persister.clone(),
                directory_manager: Rc::new(ThreadedLister::new(side, proxy.clone())),
                settings_manager: settings_manager.clone(),
                status_notifier: notifier.clone(),
                integrated_terminal: Box::new(terminal),
                surface: Box::new(ConsoleSurface::new(side, dirty.clone(), focus.clone())),
                send_selected_pane_up: Box::new(move || {
                    select_proxy.send_event(Event::SelectPane(side))
                }),
            };
            let props = PanelProps {
                id: side.id().to_owned(),
                path,
                is_selected_pane: side == Side::Left,
                area,
            };
            Pane { controller: PanelController::mount(props, collaborators), shell }
        };
        let left = mount(Side::Left, left_path, left_area);
        let right = mount(Side::Right, right_path, right_area);

        let watcher = match DirectoryWatcher::new(proxy) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                warn!("Directory watching disabled: {err}");
                None
            },
        };

        let mut app = Self {
            left,
            right,
            selected: Side::Left,
            focus,
            dirty,
            notifier,
            watcher,
            changed_directories: HashSet::new(),
            settings,
            color: io::stdout().is_terminal(),
        };
        app.sync_watches();
        Ok(app)
    }

    /// Handle one event. Returns `false` when the program should exit.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Listing { side, response } => {
                self.pane_mut(side).controller.on_directory_fetched(response);
            },
            Event::Input(line) => return self.handle_input(&line),
            Event::InputClosed => return false,
            Event::DirectoryChanged(path) => {
                self.changed_directories.insert(path);
            },
            Event::SelectPane(side) => self.select(side),
        }
        true
    }

    /// Refresh panels whose directory changed since the last call.
    pub fn flush_directory_changes(&mut self) {
        let changed = std::mem::take(&mut self.changed_directories);
        for side in Side::ALL {
            let controller = &mut self.pane_mut(side).controller;
            if changed.contains(controller.state().current_path()) {
                debug!("Directory of panel {side} changed on disk");
                controller.refresh();
            }
        }
    }

    /// Print both panels if anything changed.
    pub fn render(&mut self) {
        if !self.dirty.replace(false) {
            return;
        }

        let theme = &self.settings.theme;
        let focus = self.focus.get();
        let mut out = String::new();
        for side in Side::ALL {
            let view = self.pane(side).controller.view();
            out.push_str(&console::render_panel(&view, theme, focus, self.color));
            out.push('\n');
        }
        let status = self.notifier.latest();
        out.push_str(&console::render_status(status.as_ref(), theme, self.color));
        out.push_str("\n> ");

        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(out.as_bytes());
        let _ = stdout.flush();
    }

    fn handle_input(&mut self, line: &str) -> bool {
        let command = match InputCommand::parse(line) {
            Ok(command) => command,
            Err(message) => {
                self.notifier.notify(Status::warning(message));
                self.dirty.set(true);
                return true;
            },
        };

        let side = self.selected;
        match command {
            InputCommand::Nothing => self.dirty.set(true),
            InputCommand::Quit => return false,
            InputCommand::Key(key) => self.handle_key(side, &key),
            InputCommand::Handler(name) => {
                let was_open = self.is_terminal_open(side);
                if let Err(err) = self.pane_mut(side).controller.on_keyboard_shortcut(&name) {
                    self.notifier.notify(Status::warning(err.to_string()));
                    self.dirty.set(true);
                }
                self.focus_opened_terminal(side, was_open);
            },
            InputCommand::ChangeDirectory(path) => {
                let controller = &mut self.pane_mut(side).controller;
                let target = resolve_directory(controller.state().current_path(), &path);
                controller.set_path(target);
            },
            InputCommand::Open(name) => {
                if !self.pane_mut(side).controller.open_entry(&name) {
                    self.notifier.notify(Status::warning(format!("{name} is not a directory")));
                    self.dirty.set(true);
                }
            },
            InputCommand::OtherPanel => self.pane_mut(side.other()).controller.activate(),
            InputCommand::Resize(columns, rows) => {
                let (left, right) = pane_areas(columns, rows);
                self.left.controller.resize(left);
                self.right.controller.resize(right);
            },
        }

        self.sync_watches();
        true
    }

    /// Bound keys go to the panel; other input goes to a focused terminal.
    fn handle_key(&mut self, side: Side, key: &str) {
        let was_open = self.is_terminal_open(side);
        if self.pane_mut(side).controller.on_key(key) {
            self.focus_opened_terminal(side, was_open);
            return;
        }

        let shell = &self.pane(side).shell;
        if self.focus.get() == Focus::Terminal(side) && shell.borrow().is_attached() {
            shell.borrow_mut().send_line(key);
        } else {
            self.notifier.notify(Status::warning(format!("{key} is not bound")));
            self.dirty.set(true);
        }
    }

    fn focus_opened_terminal(&mut self, side: Side, was_open: bool) {
        if !was_open && self.is_terminal_open(side) {
            self.focus.set(Focus::Terminal(side));
        }
    }

    fn select(&mut self, side: Side) {
        info!("Selecting panel {side}");
        self.selected = side;
        self.left.controller.set_selected_pane(side == Side::Left);
        self.right.controller.set_selected_pane(side == Side::Right);
        self.focus.set(Focus::FileList(side));
        self.dirty.set(true);
    }

    fn is_terminal_open(&self, side: Side) -> bool {
        self.pane(side).controller.state().is_terminal_open()
    }

    fn sync_watches(&mut self) {
        let Some(watcher) = &mut self.watcher else {
            return;
        };
        for side in Side::ALL {
            let pane = match side {
                Side::Left => &self.left,
                Side::Right => &self.right,
            };
            watcher.watch(side, pane.controller.state().current_path());
        }
    }

    fn pane(&self, side: Side) -> &Pane {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn pane_mut(&mut self, side: Side) -> &mut Pane {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

fn open_persister(options: &Options) -> Rc<dyn Persister> {
    let opened = match &options.state_file {
        Some(path) => JsonFilePersister::open(path),
        None => JsonFilePersister::open_default(),
    };
    match opened {
        Ok(persister) => {
            info!("Persisting panel state to {}", persister.path().display());
            Rc::new(persister)
        },
        Err(err) => {
            warn!("Panel state will not survive this session: {err}");
            Rc::new(MemoryPersister::new())
        },
    }
}

/// Join `target` onto `base`, folding `.` and `..` lexically.
fn resolve_directory(base: &Path, target: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in base.join(target).components() {
        match component {
            Component::CurDir => (),
            Component::ParentDir => {
                resolved.pop();
            },
            component => resolved.push(component),
        }
    }
    resolved
}

/// Side-by-side areas of the two panels.
fn pane_areas(columns: u16, rows: u16) -> (Rect, Rect) {
    let left_width = columns / 2;
    let left = Rect::new(0, 0, left_width, rows);
    let right = Rect::new(left_width, 0, columns - left_width, rows);
    (left, right)
}
