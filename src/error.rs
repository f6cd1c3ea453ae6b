use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Ls8Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("address 0x{address:02x} is outside memory of {capacity} bytes")]
    OutOfRange { address: usize, capacity: usize },
    #[error("memory capacity must be 1..=256 bytes, got {0}")]
    BadCapacity(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("line {line}: malformed instruction {text:?}")]
    Malformed { line: usize, text: String },
    #[error("program of {len} bytes does not fit in {capacity} bytes of memory")]
    TooLarge { len: usize, capacity: usize },
}

#[derive(Debug, Error)]
pub enum CpuError {
    #[error("invalid instruction at {address}: {opcode:#010b}")]
    InvalidOpcode { address: u8, opcode: u8 },
    #[error("invalid register R{index} in instruction at {address}")]
    InvalidRegister { address: u8, index: u8 },
    #[error("memory fault: {0}")]
    Memory(#[from] MemoryError),
    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum Ls8Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("{0}")]
    Cpu(#[from] CpuError),
    #[error("{0}")]
    Memory(#[from] MemoryError),
}
