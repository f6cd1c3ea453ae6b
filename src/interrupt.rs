/// Interrupt plumbing.
///
/// Hardware (e.g. the timer) never touches the CPU directly. It sets bits in
/// an [`InterruptLatch`]; the CPU folds the latch into IS at the start of each
/// cycle and only then asks the [`InterruptController`] whether to take one.
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// number of interrupt lines, one per bit of IS/IM
pub const LINE_COUNT: u8 = 8;

/// line the periodic timer raises
pub const TIMER_LINE: u8 = 0;

/// Pending-bit latch shared between the CPU and whatever raises interrupts.
#[derive(Debug, Clone, Default)]
pub struct InterruptLatch {
    bits: Arc<AtomicU8>,
}

impl InterruptLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// mark `line` pending; lines >= 8 are ignored
    pub fn assert_line(&self, line: u8) {
        if line < LINE_COUNT {
            self.bits.fetch_or(1 << line, Ordering::AcqRel);
        }
    }

    /// hand over everything latched so far and clear the latch
    pub fn take(&self) -> u8 {
        self.bits.swap(0, Ordering::AcqRel)
    }

    pub fn peek(&self) -> u8 {
        self.bits.load(Ordering::Acquire)
    }
}

/// Decides which interrupt, if any, fires this cycle.
pub struct InterruptController;

impl InterruptController {
    /// lowest-numbered line that is both pending and unmasked
    pub fn poll(status: u8, mask: u8, enabled: bool) -> Option<u8> {
        if !enabled {
            return None;
        }
        let pending = status & mask;
        if pending == 0 {
            None
        } else {
            Some(pending.trailing_zeros() as u8)
        }
    }

    /// where the handler address for `line` lives
    pub fn vector_for(line: u8) -> u8 {
        crate::memory::VECTOR_TABLE_ADDR + line
    }
}
