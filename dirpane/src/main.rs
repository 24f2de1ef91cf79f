//! Dual-pane directory browser with an integrated terminal per panel.

#![warn(rust_2018_idioms, future_incompatible)]

use std::error::Error;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use clap::Parser;
use log::{info, warn};

mod app;
mod cli;
mod config;
mod console;
mod event;
mod input;
mod lister;
mod logging;
mod shell;
mod watcher;

use crate::app::App;
use crate::cli::Options;
use crate::event::{Event, EventProxy};

fn main() -> Result<(), Box<dyn Error>> {
    let options = Options::parse();
    logging::initialize(&options)?;

    info!("Welcome to dirpane {}", env!("CARGO_PKG_VERSION"));

    let settings = config::load(&options);
    let (sender, receiver) = mpsc::channel();
    let proxy = EventProxy::new(sender);

    let mut app = App::new(&options, settings, proxy.clone())?;
    spawn_input_reader(proxy)?;
    app.render();

    'event_loop: while let Ok(event) = receiver.recv() {
        let mut running = app.handle_event(event);

        // Drain whatever else is queued so it renders once.
        while running {
            match receiver.try_recv() {
                Ok(event) => running = app.handle_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    running = false;
                },
            }
        }

        app.flush_directory_changes();
        app.render();

        if !running {
            break 'event_loop;
        }
    }

    info!("Goodbye");
    Ok(())
}

/// Forward stdin lines to the event loop.
fn spawn_input_reader(proxy: EventProxy) -> io::Result<()> {
    thread::Builder::new().name("input reader".into()).spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => proxy.send_event(Event::Input(line)),
                Err(err) => {
                    warn!("Reading input failed: {err}");
                    break;
                },
            }
        }
        proxy.send_event(Event::InputClosed);
    })?;
    Ok(())
}
