//! Command line options.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};
use log::LevelFilter;

/// CLI options for the main dirpane executable.
#[derive(Parser, Default, Debug)]
#[clap(author, about, version = env!("CARGO_PKG_VERSION"))]
pub struct Options {
    /// Directory the left panel starts in [default: current directory].
    #[clap(value_hint = ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Directory the right panel starts in [default: same as the left panel].
    #[clap(long, value_hint = ValueHint::DirPath)]
    pub right: Option<PathBuf>,

    /// Specify alternative configuration file [default:
    /// $XDG_CONFIG_HOME/dirpane/dirpane.toml].
    #[clap(long, env = "DIRPANE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// File persisting panel state [default:
    /// $XDG_DATA_HOME/dirpane/state.json].
    #[clap(long, value_hint = ValueHint::FilePath)]
    pub state_file: Option<PathBuf>,

    /// Also write log messages to this file.
    #[clap(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Reduces the level of verbosity (the min level is -qq).
    #[clap(short, conflicts_with("verbose"), action = ArgAction::Count)]
    quiet: u8,

    /// Increases the level of verbosity (the max level is -vvv).
    #[clap(short, conflicts_with("quiet"), action = ArgAction::Count)]
    verbose: u8,
}

impl Options {
    /// Log level derived from the verbosity flags.
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (2.., _) => LevelFilter::Off,
            (1, _) => LevelFilter::Error,
            (0, 0) => LevelFilter::Warn,
            (0, 1) => LevelFilter::Info,
            (0, 2) => LevelFilter::Debug,
            (0, 3..) => LevelFilter::Trace,
        }
    }
}
