//! Recording test doubles for panel collaborators.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::Value;

use dirpane_core::config::{Settings, StaticSettings};
use dirpane_core::directory::{
    DirEntry, DirectoryManager, EntryKind, ListingError, ListingRequest, ListingResponse,
};
use dirpane_core::error::{PanelError, PanelResult};
use dirpane_core::notifier::{Status, StatusNotifier};
use dirpane_core::persistence::Persister;
use dirpane_core::rect::Rect;
use dirpane_core::surface::PanelSurface;
use dirpane_core::terminal::{IntegratedTerminal, TerminalContainer};
use dirpane_core::{Collaborators, PanelController, PanelProps};

/// Persister recording every read and write.
#[derive(Default)]
pub struct RecordingPersister {
    pub values: RefCell<HashMap<String, Value>>,
    pub gets: RefCell<Vec<String>>,
    pub sets: RefCell<Vec<(String, Value)>>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
}

impl RecordingPersister {
    pub fn with(key: &str, value: bool) -> Self {
        let persister = Self::default();
        persister.values.borrow_mut().insert(key.into(), Value::Bool(value));
        persister
    }

    pub fn sets_for(&self, key: &str) -> Vec<Value> {
        self.sets.borrow().iter().filter(|(k, _)| k == key).map(|(_, v)| v.clone()).collect()
    }

    pub fn gets_for(&self, key: &str) -> usize {
        self.gets.borrow().iter().filter(|k| *k == key).count()
    }
}

impl Persister for RecordingPersister {
    fn get_value(&self, key: &str) -> PanelResult<Option<Value>> {
        self.gets.borrow_mut().push(key.into());
        if self.fail_reads.get() {
            return Err(PanelError::PersistenceError("store unavailable".into()));
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_value(&self, key: &str, value: Value) -> PanelResult<()> {
        self.sets.borrow_mut().push((key.into(), value.clone()));
        if self.fail_writes.get() {
            return Err(PanelError::PersistenceError("store unavailable".into()));
        }
        self.values.borrow_mut().insert(key.into(), value);
        Ok(())
    }
}

/// Directory manager that only records requests; tests resolve them.
#[derive(Default)]
pub struct RecordingLister {
    pub requests: RefCell<Vec<ListingRequest>>,
}

impl RecordingLister {
    pub fn count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last(&self) -> ListingRequest {
        self.requests.borrow().last().cloned().expect("no listing requested")
    }

    pub fn nth(&self, n: usize) -> ListingRequest {
        self.requests.borrow()[n].clone()
    }
}

impl DirectoryManager for RecordingLister {
    fn list_directory(&self, request: ListingRequest) {
        self.requests.borrow_mut().push(request);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub statuses: RefCell<Vec<Status>>,
}

impl StatusNotifier for RecordingNotifier {
    fn notify(&self, status: Status) {
        self.statuses.borrow_mut().push(status);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCall {
    OpenIn(TerminalContainer),
    Fit,
    ChangeDirectory(PathBuf),
    Detach,
}

pub struct RecordingTerminal {
    pub calls: Rc<RefCell<Vec<TerminalCall>>>,
}

impl IntegratedTerminal for RecordingTerminal {
    fn shell_name(&self) -> &str {
        "bash"
    }

    fn open_in(&mut self, container: &TerminalContainer) {
        self.calls.borrow_mut().push(TerminalCall::OpenIn(container.clone()));
    }

    fn fit(&mut self) {
        self.calls.borrow_mut().push(TerminalCall::Fit);
    }

    fn change_directory(&mut self, path: &Path) {
        self.calls.borrow_mut().push(TerminalCall::ChangeDirectory(path.to_path_buf()));
    }

    fn detach(&mut self) {
        self.calls.borrow_mut().push(TerminalCall::Detach);
    }
}

pub struct RecordingSurface {
    pub redraws: Rc<Cell<usize>>,
    pub focus_calls: Rc<Cell<usize>>,
}

impl PanelSurface for RecordingSurface {
    fn request_redraw(&mut self) {
        self.redraws.set(self.redraws.get() + 1);
    }

    fn focus_file_list(&mut self) {
        self.focus_calls.set(self.focus_calls.get() + 1);
    }
}

/// All doubles for one panel plus handles to inspect them.
pub struct Harness {
    pub settings: Settings,
    pub persister: Rc<RecordingPersister>,
    pub lister: Rc<RecordingLister>,
    pub notifier: Rc<RecordingNotifier>,
    pub terminal_calls: Rc<RefCell<Vec<TerminalCall>>>,
    pub redraws: Rc<Cell<usize>>,
    pub focus_calls: Rc<Cell<usize>>,
    pub select_requests: Rc<Cell<usize>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            persister: Rc::new(RecordingPersister::default()),
            lister: Rc::new(RecordingLister::default()),
            notifier: Rc::new(RecordingNotifier::default()),
            terminal_calls: Rc::new(RefCell::new(Vec::new())),
            redraws: Rc::new(Cell::new(0)),
            focus_calls: Rc::new(Cell::new(0)),
            select_requests: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_persister(mut self, persister: RecordingPersister) -> Self {
        self.persister = Rc::new(persister);
        self
    }

    pub fn collaborators(&self) -> Collaborators {
        let select_requests = self.select_requests.clone();
        Collaborators {
            persister: self.persister.clone(),
            directory_manager: self.lister.clone(),
            settings_manager: Rc::new(StaticSettings::new(self.settings.clone())),
            status_notifier: self.notifier.clone(),
            integrated_terminal: Box::new(RecordingTerminal { calls: self.terminal_calls.clone() }),
            surface: Box::new(RecordingSurface {
                redraws: self.redraws.clone(),
                focus_calls: self.focus_calls.clone(),
            }),
            send_selected_pane_up: Box::new(move || select_requests.set(select_requests.get() + 1)),
        }
    }

    pub fn mount(&self, id: &str, path: &str) -> PanelController {
        let props = PanelProps {
            id: id.into(),
            path: path.into(),
            is_selected_pane: true,
            area: Rect::new(0, 0, 80, 30),
        };
        PanelController::mount(props, self.collaborators())
    }

    pub fn terminal_calls(&self) -> Vec<TerminalCall> {
        self.terminal_calls.borrow().clone()
    }

    pub fn clear_terminal_calls(&self) {
        self.terminal_calls.borrow_mut().clear();
    }
}

pub fn entries(names: &[&str]) -> Vec<DirEntry> {
    names
        .iter()
        .map(|name| match name.strip_suffix('/') {
            Some(dir) => DirEntry::new(dir, EntryKind::Directory, 0),
            None => DirEntry::new(*name, EntryKind::File, 1),
        })
        .collect()
}

pub fn resolve(request: &ListingRequest, names: &[&str]) -> ListingResponse {
    ListingResponse::for_request(request, Ok(entries(names)))
}

pub fn fail(request: &ListingRequest, err: ListingError) -> ListingResponse {
    ListingResponse::for_request(request, Err(err))
}
