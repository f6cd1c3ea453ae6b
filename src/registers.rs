/// # registers
///
/// The LS-8 has eight 8bit general purpose registers, R0-R7:
///  0-4. free for programs
///  5. IM, interrupt mask                       -- bit n enables line n
///  6. IS, interrupt status                     -- bit n means line n is pending
///  7. SP, stack pointer                        -- 0xf8, grows downward
/// it also has:
///  PC (8bit) address of the next instruction to fetch
///  IR (8bit) the opcode being executed this cycle
/// ... PC and IR are not addressable by instructions, so they live outside
/// the array.
use crate::error::CpuError;
use crate::memory::STACK_INIT;

pub const GPR_COUNT: usize = 8;
pub const IM: u8 = 5;
pub const IS: u8 = 6;
pub const SP: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    gpr: [u8; GPR_COUNT],
    pub pc: u8,
    pub ir: u8,
}

impl RegisterFile {
    pub fn new() -> Self {
        let mut gpr = [0u8; GPR_COUNT];
        gpr[SP as usize] = STACK_INIT;
        RegisterFile { gpr, pc: 0, ir: 0 }
    }

    /// read a register named by an operand byte
    pub fn get(&self, index: u8) -> Result<u8, CpuError> {
        self.gpr
            .get(index as usize)
            .copied()
            .ok_or(CpuError::InvalidRegister {
                address: self.pc,
                index,
            })
    }

    /// write a register named by an operand byte
    pub fn set(&mut self, index: u8, value: u8) -> Result<(), CpuError> {
        let pc = self.pc;
        let slot = self
            .gpr
            .get_mut(index as usize)
            .ok_or(CpuError::InvalidRegister { address: pc, index })?;
        *slot = value;
        Ok(())
    }

    pub fn sp(&self) -> u8 {
        self.gpr[SP as usize]
    }

    pub fn set_sp(&mut self, value: u8) {
        self.gpr[SP as usize] = value;
    }

    pub fn im(&self) -> u8 {
        self.gpr[IM as usize]
    }

    pub fn is(&self) -> u8 {
        self.gpr[IS as usize]
    }

    pub fn set_is(&mut self, value: u8) {
        self.gpr[IS as usize] = value;
    }

    /// snapshot of R0-R7
    pub fn gpr(&self) -> [u8; GPR_COUNT] {
        self.gpr
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Flags persist across cycles until overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub interrupts_enabled: bool,
    /// result of the most recent CMP
    pub equal: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            interrupts_enabled: true,
            equal: false,
        }
    }
}
