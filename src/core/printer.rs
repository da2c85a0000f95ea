//! Console printers
//!
//! A [`Printer`] renders an already formatted record on the caller's thread.
//! The strategy is chosen once by [`detect_printer`]: ANSI colours on an
//! interactive terminal, the native console mode on Windows, plain text
//! everywhere else.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use std::io::{IsTerminal, Write};

/// Synchronous, level-aware console renderer
pub trait Printer: Send + Sync {
    /// Print one record; `line` carries its trailing newline
    fn print(&self, level: LogLevel, line: &str) -> Result<()>;

    fn name(&self) -> &str;
}

fn write_stdout(text: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| LoggerError::printer(format!("stdout write failed: {}", e)))
}

/// Writes records as-is
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainPrinter;

impl PlainPrinter {
    pub fn new() -> Self {
        Self
    }
}

impl Printer for PlainPrinter {
    fn print(&self, _level: LogLevel, line: &str) -> Result<()> {
        write_stdout(line)
    }

    fn name(&self) -> &str {
        "plain"
    }
}

/// Bold, level-coloured records using ANSI escape sequences
#[cfg(feature = "console")]
#[derive(Debug, Default, Clone, Copy)]
pub struct AnsiPrinter;

#[cfg(feature = "console")]
impl AnsiPrinter {
    pub fn new() -> Self {
        Self
    }

    /// Colour the record body and keep the newline outside the escape codes
    pub fn paint(level: LogLevel, line: &str) -> String {
        use colored::Colorize;

        let body = line.trim_end_matches('\n');
        format!("{}\n", body.color(level.color_code()).bold())
    }
}

#[cfg(feature = "console")]
impl Printer for AnsiPrinter {
    fn print(&self, level: LogLevel, line: &str) -> Result<()> {
        write_stdout(&Self::paint(level, line))
    }

    fn name(&self) -> &str {
        "ansi"
    }
}

/// Windows console: enables virtual-terminal processing through the native
/// console API and prints plain text if the console refuses it
#[cfg(all(windows, feature = "console"))]
#[derive(Debug)]
pub struct WindowsConsolePrinter {
    virtual_terminal: bool,
}

#[cfg(all(windows, feature = "console"))]
impl WindowsConsolePrinter {
    pub fn new() -> Self {
        Self {
            virtual_terminal: colored::control::set_virtual_terminal(true).is_ok(),
        }
    }
}

#[cfg(all(windows, feature = "console"))]
impl Printer for WindowsConsolePrinter {
    fn print(&self, level: LogLevel, line: &str) -> Result<()> {
        if self.virtual_terminal {
            write_stdout(&AnsiPrinter::paint(level, line))
        } else {
            write_stdout(line)
        }
    }

    fn name(&self) -> &str {
        "windows-console"
    }
}

#[cfg(all(windows, feature = "console"))]
fn terminal_printer() -> Box<dyn Printer> {
    Box::new(WindowsConsolePrinter::new())
}

#[cfg(all(not(windows), feature = "console"))]
fn terminal_printer() -> Box<dyn Printer> {
    Box::new(AnsiPrinter)
}

#[cfg(not(feature = "console"))]
fn terminal_printer() -> Box<dyn Printer> {
    Box::new(PlainPrinter)
}

/// Pick the printer for this process
pub fn detect_printer() -> Box<dyn Printer> {
    if std::io::stdout().is_terminal() {
        terminal_printer()
    } else {
        Box::new(PlainPrinter)
    }
}
