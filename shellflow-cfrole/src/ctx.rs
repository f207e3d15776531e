//! Per-cycle context shared by the processes of a shell interface.

use shellflow::Monitor;

use crate::{ShellError, Stats};

/// Per-cycle context.
#[derive(Debug)]
pub struct Ctx<'a> {
    /// Enable signal from the shell.
    pub enable: bool,

    /// Fault sink.
    pub monitor: &'a mut Monitor<ShellError>,

    /// Activity counters.
    pub stats: &'a mut Stats,
}

impl<'a> Ctx<'a> {
    /// Reports a fault at warning level.
    pub fn warn(&mut self, origin: &'static str, error: ShellError) {
        self.monitor.report(origin, log::Level::Warn, error);
    }

    /// Reports a fault at error level.
    pub fn error(&mut self, origin: &'static str, error: ShellError) {
        self.monitor.report(origin, log::Level::Error, error);
    }
}
