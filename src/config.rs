use crate::interrupt::TIMER_LINE;
use crate::memory::RAM_SIZE_BYTES;
use std::time::Duration;

/// Knobs for a run of the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// bytes of RAM, at most 256
    pub memory_size: usize,
    /// wallclock time per CPU cycle; zero runs flat out
    pub tick: Duration,
    /// how often the timer raises its line; zero disables the timer
    pub timer_period: Duration,
    pub timer_line: u8,
    /// log every instruction as it executes
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            memory_size: RAM_SIZE_BYTES,
            tick: Duration::from_millis(1),
            timer_period: Duration::from_secs(1),
            timer_line: TIMER_LINE,
            trace: false,
        }
    }
}
