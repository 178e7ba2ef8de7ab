/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ansi_term::Colour;
use log::{Level, LevelFilter};

use crate::FailResult;

/// Builder-style setup for logging.
#[derive(Debug, Clone, Default)]
pub struct GlobalLogger {
    path: Option<PathBuf>,
    verbosity: Verbosity,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity { Quiet, Default, Loud }

impl Default for Verbosity {
    fn default() -> Self { Verbosity::Default }
}

impl GlobalLogger {
    pub fn new() -> Self { Default::default() }

    /// Also append log messages to this file.
    pub fn path(&mut self, path: impl AsRef<Path>) -> &mut Self
    { self.path = Some(path.as_ref().to_owned()); self }

    /// Negative is quiet, positive is loud. Any integer is accepted.
    pub fn verbosity(&mut self, level: i32) -> &mut Self {
        self.verbosity = match level {
            l if l < 0 => Verbosity::Quiet,
            0 => Verbosity::Default,
            _ => Verbosity::Loud,
        };
        self
    }

    fn workspace_level(&self) -> LevelFilter {
        match self.verbosity {
            Verbosity::Quiet => LevelFilter::Warn,
            Verbosity::Default => LevelFilter::Debug,
            Verbosity::Loud => LevelFilter::Trace,
        }
    }

    /// Install the global logger. This can only succeed once per process.
    pub fn apply(&mut self) -> FailResult<()> {
        let start = Instant::now();
        let workspace_level = self.workspace_level();

        let mut fern = {
            fern::Dispatch::new()
                .format(move |out, message, record| {
                    let t = start.elapsed();
                    out.finish(format_args!(
                        "[{:>4}.{:03}s][{}][{}] {}",
                        t.as_secs(),
                        t.subsec_millis(),
                        record.target(),
                        ColorizedLevel(record.level()),
                        message,
                    ))
                })
                .level(LevelFilter::Info)
                .level_for("mmdiff", workspace_level)
                .level_for("mmdiff_potentials", workspace_level)
                .level_for("mmdiff_structure", workspace_level)
                .level_for("mmdiff_config", workspace_level)
                .chain(std::io::stdout())
        };

        if let Some(path) = &self.path {
            fern = fern.chain(fern::log_file(path)?);
        }

        fern.apply()?;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ColorizedLevel(pub Level);

impl fmt::Display for ColorizedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = match self.0 {
            Level::Error => Colour::Red.bold(),
            Level::Warn  => Colour::Red.normal(),
            Level::Info  => Colour::Cyan.bold(),
            Level::Debug => Colour::Yellow.dimmed(),
            Level::Trace => Colour::Cyan.normal(),
        };
        write!(f, "{}", style.paint(format!("{:<5}", self.0)))
    }
}
