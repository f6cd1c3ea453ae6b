/// Periodic drivers.
///
/// The [`Clock`] runs the CPU one cycle per tick on the calling thread. The
/// [`TimerDriver`] runs on its own thread at a much lower rate and does
/// nothing but set a bit in the CPU's interrupt latch, so at most one cycle is
/// ever in flight and nothing outside the CPU touches PC or the stack.
use crate::cpu::{Cpu, CpuState};
use crate::error::CpuError;
use crate::interrupt::InterruptLatch;
use crate::memory::Memory;
use crate::output::Output;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// longest the timer sleeps before rechecking whether it should stop
const TIMER_POLL: Duration = Duration::from_millis(10);

pub struct Clock {
    tick: Duration,
}

impl Clock {
    pub fn new(tick: Duration) -> Self {
        Clock { tick }
    }

    /// Cycle the CPU until it halts. Returns the cycle count on a normal halt;
    /// a fatal error stops the clock for good.
    pub fn run<M: Memory, O: Output>(&self, cpu: &mut Cpu<M, O>) -> Result<u64, CpuError> {
        let mut next = Instant::now();
        loop {
            if cpu.cycle()? == CpuState::Halted {
                return Ok(cpu.cycles());
            }
            if self.tick.is_zero() {
                continue;
            }
            next += self.tick;
            let now = Instant::now();
            if next > now {
                spin_sleep::sleep(next - now);
            } else {
                // running behind; don't try to catch up with a burst
                next = now;
            }
        }
    }
}

/// Raises one interrupt line at a fixed period until stopped or dropped.
pub struct TimerDriver {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TimerDriver {
    pub fn spawn(latch: InterruptLatch, line: u8, period: Duration) -> Result<Self, io::Error> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("ls8-timer".into())
            .spawn(move || {
                let mut next = Instant::now() + period;
                while !flag.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now >= next {
                        latch.assert_line(line);
                        next += period;
                    } else {
                        spin_sleep::sleep((next - now).min(TIMER_POLL));
                    }
                }
            })?;
        Ok(TimerDriver {
            stop,
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(h) = self.handle.take() {
            if h.join().is_err() {
                crate::warn!("timer thread panicked");
            }
        }
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
