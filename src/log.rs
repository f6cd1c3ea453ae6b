/// Simple logging module with macros. Everything goes to STDERR so it never
/// mixes with what the program itself prints.
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::tty::IsTty;
use crossterm::QueueableCommand;
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// Log level for filtering messages.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Trace => write!(f, "TRACE"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

pub static SHOW_TRACE: AtomicBool = AtomicBool::new(false);
pub static SHOW_TIMESTAMP: AtomicBool = AtomicBool::new(true);

static START: OnceLock<Instant> = OnceLock::new();

/// seconds since the first log line (or since `init`)
fn uptime() -> f64 {
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// start the log clock; `trace` turns on per-instruction output
pub fn init(trace: bool) {
    START.get_or_init(Instant::now);
    SHOW_TRACE.store(trace, Ordering::Relaxed);
}

pub fn enabled(level: Level) -> bool {
    level > Level::Trace || SHOW_TRACE.load(Ordering::Relaxed)
}

fn colour(level: Level) -> Option<Color> {
    match level {
        Level::Trace => Some(Color::DarkGrey),
        Level::Info => None,
        Level::Warn => Some(Color::Yellow),
        Level::Error => Some(Color::Red),
    }
}

fn format_line(level: Level, message: &str, timestamp: bool) -> String {
    if timestamp {
        format!("[{:10.4}] [{:5}] {}", uptime(), level, message)
    } else {
        format!("[{:5}] {}", level, message)
    }
}

/// Internal logging function. Use the `info!`, `warn!`, `error!` or `trace!`
/// macros instead.
#[doc(hidden)]
pub fn log(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    let line = format_line(level, message, SHOW_TIMESTAMP.load(Ordering::Relaxed));
    let mut stderr = io::stderr();
    let _ = write_line(&mut stderr, level, &line);
}

fn write_line(stderr: &mut io::Stderr, level: Level, line: &str) -> io::Result<()> {
    let styled = stderr.is_tty();
    if styled {
        if let Some(c) = colour(level) {
            stderr.queue(SetForegroundColor(c))?;
        }
        if level == Level::Error {
            stderr.queue(SetAttribute(Attribute::Bold))?;
        }
    }
    stderr.queue(Print(line))?;
    if styled {
        stderr.queue(ResetColor)?;
        stderr.queue(SetAttribute(Attribute::Reset))?;
    }
    stderr.queue(Print("\n"))?;
    stderr.flush()
}

/// Logs a per-instruction trace message, only shown with tracing on.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) && $crate::log::enabled($crate::log::Level::Trace) {
            $crate::log::log($crate::log::Level::Trace, &format!($($arg)*));
        }
    }};
}

/// Logs an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::log::log($crate::log::Level::Info, &format!($($arg)*));
        }
    }};
}

/// Logs a warning-level message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::log::log($crate::log::Level::Warn, &format!($($arg)*))
        }
    }};
}

/// Logs an error-level message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::log::log($crate::log::Level::Error, &format!($($arg)*))
        }
    }};
}
