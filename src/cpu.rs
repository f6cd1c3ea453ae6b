/// # cpu
///
/// Each cycle, in order:
///  1. fold latched interrupt lines into IS
///  2. if interrupts are enabled and IS & IM is nonzero, enter the handler for
///     the lowest pending line and end the cycle there
///  3. fetch the byte at PC into IR
///  4. look IR up in the dispatch table; an unknown opcode is fatal
///  5. run the handler, which owns moving PC on
///
/// The stack is a convention over memory: SP (R7) points at the lowest
/// occupied byte, push decrements then writes, pop reads then increments.
/// Nothing checks for overflow.
use crate::alu::AluOp;
use crate::error::{CpuError, MemoryError};
use crate::instruction::{disassemble, DispatchTable, Opcode};
use crate::interrupt::{InterruptController, InterruptLatch};
use crate::log::{self, Level};
use crate::memory::Memory;
use crate::output::Output;
use crate::registers::{Flags, RegisterFile, GPR_COUNT, SP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Running,
    Halted,
}

pub struct Cpu<M: Memory, O: Output> {
    memory: M,
    output: O,
    regs: RegisterFile,
    flags: Flags,
    table: DispatchTable,
    latch: InterruptLatch,
    state: CpuState,
    cycles: u64,
}

impl<M: Memory, O: Output> Cpu<M, O> {
    pub fn new(memory: M, output: O) -> Self {
        Cpu {
            memory,
            output,
            regs: RegisterFile::new(),
            flags: Flags::default(),
            table: DispatchTable::new(),
            latch: InterruptLatch::new(),
            state: CpuState::Running,
            cycles: 0,
        }
    }

    /// handle for anything that wants to raise interrupts, e.g. the timer
    pub fn interrupt_latch(&self) -> InterruptLatch {
        self.latch.clone()
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    /// cycles run so far, interrupt entries included
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advance one cycle. Once halted (normally or by a fatal error) this
    /// does nothing and keeps returning `Halted`.
    pub fn cycle(&mut self) -> Result<CpuState, CpuError> {
        if self.state == CpuState::Halted {
            return Ok(CpuState::Halted);
        }
        self.cycles += 1;
        match self.step() {
            Ok(()) => Ok(self.state),
            Err(e) => {
                self.state = CpuState::Halted;
                Err(e)
            }
        }
    }

    /// run until HLT, an error, or `limit` cycles
    pub fn run(&mut self, limit: u64) -> Result<CpuState, CpuError> {
        for _ in 0..limit {
            if self.cycle()? == CpuState::Halted {
                break;
            }
        }
        Ok(self.state)
    }

    fn step(&mut self) -> Result<(), CpuError> {
        let latched = self.latch.take();
        if latched != 0 {
            self.regs.set_is(self.regs.is() | latched);
        }
        if let Some(line) = InterruptController::poll(
            self.regs.is(),
            self.regs.im(),
            self.flags.interrupts_enabled,
        ) {
            return self.enter_interrupt(line);
        }

        let pc = self.regs.pc;
        self.regs.ir = self.memory.read(pc)?;
        let op = self
            .table
            .lookup(self.regs.ir)
            .ok_or(CpuError::InvalidOpcode {
                address: pc,
                opcode: self.regs.ir,
            })?;
        if log::enabled(Level::Trace) {
            crate::trace!("{:3}: {}", pc, disassemble(&self.table, &self.memory, pc)?);
        }
        self.execute(op)
    }

    fn enter_interrupt(&mut self, line: u8) -> Result<(), CpuError> {
        crate::info!("handling interrupt {}", line);
        self.flags.interrupts_enabled = false;
        self.regs.set_is(self.regs.is() & !(1 << line));
        self.push(self.regs.pc.wrapping_add(2))?;
        for r in 0..GPR_COUNT as u8 {
            let v = self.regs.get(r)?;
            self.push(v)?;
        }
        self.regs.pc = self
            .memory
            .read(InterruptController::vector_for(line))?;
        Ok(())
    }

    /// `dest <- dest op src`
    pub fn alu(&mut self, op: AluOp, dest: u8, src: u8) -> Result<(), CpuError> {
        let a = self.regs.get(dest)?;
        let b = self.regs.get(src)?;
        self.regs.set(dest, op.apply(a, b))
    }

    pub fn push(&mut self, value: u8) -> Result<(), CpuError> {
        let sp = self.regs.sp().wrapping_sub(1);
        self.regs.set_sp(sp);
        self.memory.write(sp, value)?;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u8, CpuError> {
        let sp = self.regs.sp();
        let value = self.memory.read(sp)?;
        self.regs.set_sp(sp.wrapping_add(1));
        Ok(value)
    }

    /// operand byte `n` places after the opcode; no wrapping past the end
    fn operand(&self, n: u8) -> Result<u8, CpuError> {
        Ok(self.memory.read_at(self.regs.pc as usize + n as usize)?)
    }

    /// step PC over the instruction; running off the end of memory is fatal
    fn advance(&mut self, op: Opcode) -> Result<(), CpuError> {
        let next = self.regs.pc as usize + op.width() as usize;
        self.regs.pc = u8::try_from(next).map_err(|_| MemoryError::OutOfRange {
            address: next,
            capacity: self.memory.capacity(),
        })?;
        Ok(())
    }

    fn execute(&mut self, op: Opcode) -> Result<(), CpuError> {
        match op {
            Opcode::Hlt => {
                self.state = CpuState::Halted;
            }
            Opcode::Ldi => {
                let r = self.operand(1)?;
                let imm = self.operand(2)?;
                self.regs.set(r, imm)?;
                self.advance(op)?;
            }
            Opcode::Add | Opcode::Mul => {
                let a = self.operand(1)?;
                let b = self.operand(2)?;
                let alu_op = if op == Opcode::Add {
                    AluOp::Add
                } else {
                    AluOp::Mul
                };
                self.alu(alu_op, a, b)?;
                self.advance(op)?;
            }
            Opcode::Prn => {
                let v = self.regs.get(self.operand(1)?)?;
                self.output.print_number(v)?;
                self.advance(op)?;
            }
            Opcode::Pra => {
                let v = self.regs.get(self.operand(1)?)?;
                self.output.print_char(v)?;
                self.advance(op)?;
            }
            Opcode::Push => {
                let v = self.regs.get(self.operand(1)?)?;
                self.push(v)?;
                self.advance(op)?;
            }
            Opcode::Pop => {
                // assign before SP moves, so POP R7 leaves SP one past the popped byte
                let r = self.operand(1)?;
                let sp = self.regs.sp();
                let v = self.memory.read(sp)?;
                self.regs.set(r, v)?;
                self.regs.set_sp(self.regs.sp().wrapping_add(1));
                self.advance(op)?;
            }
            Opcode::Call => {
                let r = self.operand(1)?;
                self.push(self.regs.pc.wrapping_add(2))?;
                self.regs.pc = self.regs.get(r)?;
            }
            Opcode::Ret => {
                self.regs.pc = self.pop()?;
            }
            Opcode::Jmp => {
                self.regs.pc = self.regs.get(self.operand(1)?)?;
            }
            Opcode::St => {
                let addr = self.regs.get(self.operand(1)?)?;
                let v = self.regs.get(self.operand(2)?)?;
                self.memory.write(addr, v)?;
                self.advance(op)?;
            }
            Opcode::Cmp => {
                let a = self.regs.get(self.operand(1)?)?;
                let b = self.regs.get(self.operand(2)?)?;
                self.flags.equal = a == b;
                self.advance(op)?;
            }
            Opcode::Jeq | Opcode::Jne => {
                let target = self.regs.get(self.operand(1)?)?;
                if self.flags.equal == (op == Opcode::Jeq) {
                    self.regs.pc = target;
                } else {
                    self.advance(op)?;
                }
            }
            Opcode::Int => {
                // software interrupts have no defined effect yet; validate and skip
                self.regs.get(self.operand(1)?)?;
                self.advance(op)?;
            }
            Opcode::Iret => {
                for r in (0..GPR_COUNT as u8).rev() {
                    let v = self.pop()?;
                    // the saved SP is implied by the pops themselves
                    if r != SP {
                        self.regs.set(r, v)?;
                    }
                }
                self.regs.pc = self.pop()?;
                self.flags.interrupts_enabled = true;
            }
        }
        Ok(())
    }
}
