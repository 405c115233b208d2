use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Local;
use log::Level;

use crate::config::Logging;
use crate::error::UpdateError;

/// Mirrors run events to an append-only log file when one is configured.
/// Every event still goes through the normal `log` macros either way.
#[derive(Debug)]
pub(crate) struct RunLog {
    sink: Option<File>,
}

impl RunLog {
    pub fn open(settings: &Logging) -> Result<RunLog, UpdateError> {
        let sink = match &settings.file {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };
        Ok(RunLog { sink })
    }

    pub fn info(&mut self, message: &str) {
        log::info!("{}", message);
        self.append(Level::Info, message);
    }

    pub fn warn(&mut self, message: &str) {
        log::warn!("{}", message);
        self.append(Level::Warn, message);
    }

    pub fn error(&mut self, message: &str) {
        log::error!("{}", message);
        self.append(Level::Error, message);
    }

    // The mirror must never abort a run, so write failures are dropped.
    fn append(&mut self, level: Level, message: &str) {
        if let Some(file) = &mut self.sink {
            let _ = writeln!(
                file,
                "{} {:<5} {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                level,
                message
            );
        }
    }
}
