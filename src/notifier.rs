//! Unified logging and progress UI.
//!
//! [`Notifier`] wraps `env_logger` (text logs) and `indicatif` (spinner) under a single
//! verbosity switch:
//! - [`VerbosityLevel::Quiet`] → only warnings are logged; a live spinner names the entry
//!   currently being encoded.
//! - [`VerbosityLevel::Info`]/[`VerbosityLevel::Debug`]/[`VerbosityLevel::Trace`] → standard logs.
//!
//! Status lines ([`Notifier::status`]) are the user-facing progress report and are printed
//! to stdout at every level, above the spinner when it is active.
//!
//! The notifier's logger is the only one the binary installs, so every diagnostic goes
//! through it and is drawn above the spinner instead of across it.

use env_logger::Env;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerbosityLevel {
    Quiet = 0, // Spinner, warnings only
    Info = 1,  // Text logs at info level
    Debug = 2, // Text logs at debug level
    Trace = 3, // Text logs at trace level
}

impl From<u8> for VerbosityLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => VerbosityLevel::Quiet,
            1 => VerbosityLevel::Info,
            2 => VerbosityLevel::Debug,
            _ => VerbosityLevel::Trace,
        }
    }
}

impl VerbosityLevel {
    pub fn to_log_level(self) -> LevelFilter {
        match self {
            VerbosityLevel::Quiet => LevelFilter::Warn,
            VerbosityLevel::Info => LevelFilter::Info,
            VerbosityLevel::Debug => LevelFilter::Debug,
            VerbosityLevel::Trace => LevelFilter::Trace,
        }
    }
}

pub struct Notifier {
    verbosity: VerbosityLevel,
    logger: env_logger::Logger,
    multi_progress: Option<MultiProgress>,
    active_spinner: RefCell<Option<ProgressBar>>,
}

impl Notifier {
    pub fn new(verbosity_level: u8) -> Self {
        let verbosity = VerbosityLevel::from(verbosity_level);

        let logger = env_logger::Builder::from_env(Env::default())
            .filter_level(verbosity.to_log_level())
            .build();

        let multi_progress = if verbosity == VerbosityLevel::Quiet {
            Some(MultiProgress::new())
        } else {
            None
        };

        Self {
            verbosity,
            logger,
            multi_progress,
            active_spinner: RefCell::new(None),
        }
    }

    /// A notifier that prints status lines but never draws a spinner.
    pub fn plain(verbosity_level: u8) -> Self {
        let mut notifier = Self::new(verbosity_level);
        notifier.multi_progress = None;
        notifier
    }

    /// Prints a user-facing progress line to stdout.
    pub fn status(&self, message: &str) {
        match self.active_spinner.borrow().as_ref() {
            Some(spinner) => spinner.suspend(|| println!("{}", message)),
            None => println!("{}", message),
        }
    }

    /// Names the step in progress: the spinner message in Quiet mode, a debug log otherwise.
    pub fn progress(&self, message: &str) {
        match (&self.multi_progress, self.verbosity) {
            (Some(multi_progress), VerbosityLevel::Quiet) => {
                // Lazy initialize spinner on first progress call
                if self.active_spinner.borrow().is_none() {
                    let spinner = multi_progress.add(ProgressBar::new_spinner());
                    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                        spinner.set_style(style);
                    }
                    spinner.enable_steady_tick(Duration::from_millis(100));
                    *self.active_spinner.borrow_mut() = Some(spinner);
                }
                if let Some(spinner) = self.active_spinner.borrow().as_ref() {
                    spinner.set_message(message.to_string());
                }
            }
            _ => self.debug(message),
        }
    }

    /// Stops and clears the spinner, if any.
    pub fn finish(&self) {
        if let Some(spinner) = self.active_spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    /// Whether a message at `level` would be printed.
    pub fn enabled(&self, level: Level) -> bool {
        self.logger
            .enabled(&Metadata::builder().level(level).target(module_path!()).build())
    }

    fn log(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let emit = || {
            self.logger.log(
                &Record::builder()
                    .args(format_args!("{}", message))
                    .level(level)
                    .target(module_path!())
                    .build(),
            )
        };
        match self.active_spinner.borrow().as_ref() {
            Some(spinner) => spinner.suspend(emit),
            None => emit(),
        }
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.finish();
    }
}
