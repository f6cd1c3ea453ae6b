/// # LS-8
///
/// ## Design
///
/// * an 8-bit machine: 256 bytes of RAM, eight registers, PC and IR
/// * one instruction (or one interrupt entry) per cycle; the CPU has no
///   notion of wallclock time, the clock driver supplies it
/// * abstract memory and output so tests can plug in alternatives
/// * interrupts are raised by setting bits in a latch; the CPU only looks at
///   them at cycle boundaries, so handlers always run to completion
///
/// Model
///
/// Environment (main)
///  |-- config, memory(config), output
///  |-- loader: program text -> memory
///  |-- cpu(memory, output)
///  |    |-- register file + flags
///  |    |-- dispatch table, built once
///  |    `-- interrupt latch
///  |-- timer driver(latch) -- own thread, sets IS bit 0 once a second
///  `-- clock: loop {
///        |-- state = cpu.cycle()?;
///        |-- if state is Halted { break }
///        `-- sleep until the next tick
///      }
pub mod alu;
pub mod clock;
pub mod config;
pub mod cpu;
pub mod error;
pub mod instruction;
pub mod interrupt;
pub mod loader;
pub mod log;
pub mod memory;
pub mod output;
pub mod registers;

pub use config::Config;
pub use cpu::{Cpu, CpuState};
pub use error::{CpuError, LoadError, Ls8Error, MemoryError, Result};
pub use memory::{Memory, Ram};
pub use output::{BufferOutput, Output, StdoutOutput};
