use crate::error::MemoryError;
use crate::memory::Memory;

/// The LS-8 instruction set. Operand bytes follow the opcode at PC+1, PC+2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Ldi = 0b0000_0100,
    Mul = 0b0000_0101,
    Prn = 0b0000_0110,
    Pra = 0b0000_0111,
    St = 0b0000_1001,
    Push = 0b0000_1010,
    Pop = 0b0000_1011,
    Add = 0b0000_1100,
    Call = 0b0000_1111,
    Ret = 0b0001_0000,
    Jmp = 0b0001_0001,
    Jeq = 0b0001_0011,
    Jne = 0b0001_0100,
    Cmp = 0b0001_0110,
    Int = 0b0001_1001,
    Iret = 0b0001_1010,
    Hlt = 0b0001_1011,
}

pub const ALL_OPCODES: [Opcode; 17] = [
    Opcode::Hlt,
    Opcode::Ldi,
    Opcode::Add,
    Opcode::Mul,
    Opcode::Prn,
    Opcode::Pra,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Call,
    Opcode::Ret,
    Opcode::Jmp,
    Opcode::St,
    Opcode::Cmp,
    Opcode::Jeq,
    Opcode::Jne,
    Opcode::Int,
    Opcode::Iret,
];

impl Opcode {
    /// number of operand bytes following the opcode
    pub fn operand_count(self) -> u8 {
        match self {
            Opcode::Hlt | Opcode::Ret | Opcode::Iret => 0,
            Opcode::Prn
            | Opcode::Pra
            | Opcode::Push
            | Opcode::Pop
            | Opcode::Call
            | Opcode::Jmp
            | Opcode::Jeq
            | Opcode::Jne
            | Opcode::Int => 1,
            Opcode::Ldi | Opcode::Add | Opcode::Mul | Opcode::St | Opcode::Cmp => 2,
        }
    }

    /// encoded size of the instruction in bytes
    pub fn width(self) -> u8 {
        1 + self.operand_count()
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ldi => "LDI",
            Opcode::Add => "ADD",
            Opcode::Mul => "MUL",
            Opcode::Prn => "PRN",
            Opcode::Pra => "PRA",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Jmp => "JMP",
            Opcode::St => "ST",
            Opcode::Cmp => "CMP",
            Opcode::Jeq => "JEQ",
            Opcode::Jne => "JNE",
            Opcode::Int => "INT",
            Opcode::Iret => "IRET",
        }
    }
}

/// Opcode byte -> handler, resolved once when the CPU is built.
///
/// The top two bits of an LS-8 opcode byte are its operand-count field and
/// the low six identify the instruction. Widths are fixed per instruction
/// here, so each instruction answers to all four prefixes.
pub struct DispatchTable {
    entries: [Option<Opcode>; 256],
}

impl DispatchTable {
    pub fn new() -> Self {
        let mut entries = [None; 256];
        for op in ALL_OPCODES {
            for prefix in 0..4usize {
                entries[(prefix << 6) | op as usize] = Some(op);
            }
        }
        DispatchTable { entries }
    }

    pub fn lookup(&self, opcode: u8) -> Option<Opcode> {
        self.entries[opcode as usize]
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

/// render the instruction at `addr` as e.g. `LDI R0,8`
pub fn disassemble(
    table: &DispatchTable,
    memory: &impl Memory,
    addr: u8,
) -> Result<String, MemoryError> {
    let byte = memory.read(addr)?;
    let op = match table.lookup(byte) {
        Some(op) => op,
        None => return Ok(format!("??? {:#010b}", byte)),
    };
    let a = || memory.read_at(addr as usize + 1);
    let b = || memory.read_at(addr as usize + 2);
    Ok(match op {
        Opcode::Hlt | Opcode::Ret | Opcode::Iret => op.mnemonic().to_string(),
        Opcode::Ldi => format!("LDI R{},{}", a()?, b()?),
        Opcode::Add | Opcode::Mul | Opcode::St | Opcode::Cmp => {
            format!("{} R{},R{}", op.mnemonic(), a()?, b()?)
        }
        _ => format!("{} R{}", op.mnemonic(), a()?),
    })
}
