//! Integrated terminal backed by a shell process.
//!
//! The shell reads commands from a pipe and writes to the host's stdout.
//! The session is spawned on the first `open_in` and survives being hidden,
//! so reopening the terminal keeps the shell's state. A session that exited
//! is respawned on the next `open_in`, in the last directory the panel sent
//! it to.

use std::cell::RefCell;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::rc::Rc;

use log::{debug, error, info, warn};

use dirpane_core::config::TerminalSettings;
use dirpane_core::terminal::{IntegratedTerminal, TerminalContainer};

#[cfg(not(windows))]
const DEFAULT_SHELL: &str = "/bin/sh";
#[cfg(windows)]
const DEFAULT_SHELL: &str = "cmd.exe";

/// A shell session driven through its standard input.
pub struct ShellTerminal {
    program: String,
    args: Vec<String>,
    name: String,
    session: Option<Session>,
    container: Option<TerminalContainer>,
    /// Last directory requested through `change_directory`.
    cwd: Option<PathBuf>,
}

struct Session {
    child: Child,
    stdin: ChildStdin,
}

impl ShellTerminal {
    pub fn new(settings: &TerminalSettings) -> Self {
        let program = settings
            .shell
            .clone()
            .or_else(|| env::var("SHELL").ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| DEFAULT_SHELL.to_owned());
        let name = shell_name(&program);
        Self {
            program,
            args: settings.shell_args.clone(),
            name,
            session: None,
            container: None,
            cwd: None,
        }
    }

    /// Whether a shell process is alive.
    pub fn is_running(&mut self) -> bool {
        match &mut self.session {
            Some(session) => matches!(session.child.try_wait(), Ok(None)),
            None => false,
        }
    }

    fn spawn(&mut self) -> io::Result<()> {
        if let Some(mut exited) = self.session.take() {
            let _ = exited.child.wait();
        }

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(cwd) = self.cwd.as_ref().filter(|cwd| cwd.is_dir()) {
            command.current_dir(cwd);
        }
        let mut child = command.spawn()?;
        let stdin = child.stdin.take().ok_or_else(|| io::Error::other("shell stdin missing"))?;

        info!("Spawned {} (pid {})", self.program, child.id());
        if let Some(cwd) = &self.cwd {
            debug!("{} starts in {}", self.name, cwd.display());
        }
        self.session = Some(Session { child, stdin });
        Ok(())
    }

    /// Write a line to the shell, dropping the session if it went away.
    fn write_line(&mut self, line: &str) {
        let Some(session) = &mut self.session else {
            return;
        };

        debug!("{} <- {line}", self.name);
        let written = writeln!(session.stdin, "{line}").and_then(|_| session.stdin.flush());
        if let Err(err) = written {
            warn!("{} session ended: {err}", self.name);
            self.session = None;
        }
    }
}

impl IntegratedTerminal for ShellTerminal {
    fn shell_name(&self) -> &str {
        &self.name
    }

    fn open_in(&mut self, container: &TerminalContainer) {
        self.container = Some(container.clone());
        if self.is_running() {
            return;
        }
        if let Err(err) = self.spawn() {
            error!("Unable to spawn shell {}: {err}", self.program);
        }
    }

    fn fit(&mut self) {
        let Some(area) = self.container.as_ref().map(|c| c.area) else {
            return;
        };
        if let Some(line) = resize_command(area.width, area.height) {
            self.write_line(&line);
        }
    }

    fn change_directory(&mut self, path: &Path) {
        self.cwd = Some(path.to_path_buf());
        self.write_line(&cd_command(path));
    }

    fn detach(&mut self) {
        self.container = None;
    }
}

/// Raw input path into a terminal, used by the host next to the panel's own
/// [`IntegratedTerminal`] handle.
pub trait ShellInput {
    /// Whether the terminal is shown in a container.
    fn is_attached(&self) -> bool;

    /// Forward one line of input to the shell.
    fn send_line(&mut self, line: &str);
}

impl ShellInput for ShellTerminal {
    fn is_attached(&self) -> bool {
        self.container.is_some()
    }

    fn send_line(&mut self, line: &str) {
        if self.session.is_none() {
            warn!("{} terminal is not running", self.name);
            return;
        }
        self.write_line(line);
    }
}

/// Panel-side handle of a [`ShellTerminal`] whose input the host also
/// writes to.
pub struct SharedShell {
    name: String,
    inner: Rc<RefCell<ShellTerminal>>,
}

impl SharedShell {
    pub fn new(terminal: ShellTerminal) -> (Self, Rc<RefCell<ShellTerminal>>) {
        let name = terminal.name.clone();
        let inner = Rc::new(RefCell::new(terminal));
        (Self { name, inner: inner.clone() }, inner)
    }
}

impl IntegratedTerminal for SharedShell {
    fn shell_name(&self) -> &str {
        &self.name
    }

    fn open_in(&mut self, container: &TerminalContainer) {
        self.inner.borrow_mut().open_in(container);
    }

    fn fit(&mut self) {
        self.inner.borrow_mut().fit();
    }

    fn change_directory(&mut self, path: &Path) {
        self.inner.borrow_mut().change_directory(path);
    }

    fn detach(&mut self) {
        self.inner.borrow_mut().detach();
    }
}

impl Drop for ShellTerminal {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            let _ = session.child.kill();
            let _ = session.child.wait();
        }
    }
}

/// File name of the shell program, e.g. `bash` for `/usr/bin/bash`.
fn shell_name(program: &str) -> String {
    Path::new(program)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_owned())
}

#[cfg(not(windows))]
fn cd_command(path: &Path) -> String {
    format!("cd -- {}", shell_words::quote(&path.to_string_lossy()))
}

#[cfg(windows)]
fn cd_command(path: &Path) -> String {
    format!("cd /d \"{}\"", path.display())
}

#[cfg(not(windows))]
fn resize_command(columns: u16, lines: u16) -> Option<String> {
    Some(format!("export COLUMNS={columns} LINES={lines}"))
}

#[cfg(windows)]
fn resize_command(_columns: u16, _lines: u16) -> Option<String> {
    None
}
