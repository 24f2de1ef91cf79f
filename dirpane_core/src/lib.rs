//! Directory panel core.
//!
//! This crate owns the state of one panel of a dual-pane directory browser:
//! the displayed path and its listing, the visibility of the panel's
//! integrated terminal, and the persisted UI flags. Listing, storage,
//! settings, the shell session and rendering are reached only through
//! traits so that the core can be tested in isolation.

pub mod command;
pub mod config;
pub mod directory;
pub mod error;
pub mod layout;
pub mod notifier;
pub mod panel;
pub mod persistence;
pub mod rect;
pub mod state;
pub mod surface;
pub mod terminal;

pub use panel::{Collaborators, PanelController, PanelProps, PanelView};
