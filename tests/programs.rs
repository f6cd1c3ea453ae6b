use ls8::loader::load_program;
use ls8::registers::{IM, IS};
use ls8::{BufferOutput, Cpu, CpuError, CpuState, Ls8Error, Ram};

const HLT: u8 = 0b0001_1011;
const LDI: u8 = 0b0000_0100;
const ADD: u8 = 0b0000_1100;
const MUL: u8 = 0b0000_0101;
const PRN: u8 = 0b0000_0110;
const PRA: u8 = 0b0000_0111;
const PUSH: u8 = 0b0000_1010;
const POP: u8 = 0b0000_1011;
const CALL: u8 = 0b0000_1111;
const RET: u8 = 0b0001_0000;
const ST: u8 = 0b0000_1001;
const IRET: u8 = 0b0001_1010;

/// render bytes the way a .ls8 file holds them
fn ls8_text(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:08b}\n", b)).collect()
}

fn boot(text: &str) -> Result<Cpu<Ram, BufferOutput>, Ls8Error> {
    let mut ram = Ram::default();
    load_program(&mut ram, text)?;
    Ok(Cpu::new(ram, BufferOutput::new()))
}

#[test]
fn print8() -> Result<(), Ls8Error> {
    let mut cpu = boot("00000100\n00000000\n00001000\n01000110\n00000000\n00011011")?;
    assert_eq!(cpu.run(1_000)?, CpuState::Halted);
    assert_eq!(cpu.output().lines(), vec!["8"]);
    Ok(())
}

#[test]
fn mult_with_comments() -> Result<(), Ls8Error> {
    let text = "\
# mult.ls8
00000100 # LDI R0,8
00000000
00001000
00000100 # LDI R1,9
00000001
00001001
00000101 # MUL R0,R1
00000000
00000001
00000110 # PRN R0
00000000
00011011 # HLT
";
    let mut cpu = boot(text)?;
    cpu.run(1_000)?;
    assert_eq!(cpu.output().text(), "72\n");
    Ok(())
}

#[test]
fn arithmetic_wraps() -> Result<(), Ls8Error> {
    let mut cpu = boot(&ls8_text(&[
        LDI, 0, 200, LDI, 1, 100, ADD, 0, 1, PRN, 0, LDI, 2, 16, MUL, 2, 2, PRN, 2, HLT,
    ]))?;
    cpu.run(1_000)?;
    assert_eq!(cpu.output().lines(), vec!["44", "0"]);
    Ok(())
}

#[test]
fn stack_reverses() -> Result<(), Ls8Error> {
    let mut cpu = boot(&ls8_text(&[
        LDI, 0, 1, LDI, 1, 2, PUSH, 0, PUSH, 1, POP, 0, POP, 1, PRN, 0, PRN, 1, HLT,
    ]))?;
    cpu.run(1_000)?;
    assert_eq!(cpu.output().lines(), vec!["2", "1"]);
    assert_eq!(cpu.registers().sp(), 0xf8);
    Ok(())
}

#[test]
fn call_subroutine() -> Result<(), Ls8Error> {
    #[rustfmt::skip]
    let program = [
        LDI, 0, 10,     // 0
        LDI, 1, 14,     // 3
        CALL, 1,        // 6
        PRN, 0,         // 8
        HLT,            // 10
        0, 0, 0,        // 11
        ADD, 0, 0,      // 14: double R0
        RET,            // 17
    ];
    let mut cpu = boot(&ls8_text(&program))?;
    cpu.run(1_000)?;
    assert_eq!(cpu.output().text(), "20\n");
    assert_eq!(cpu.registers().sp(), 0xf8);
    Ok(())
}

#[test]
fn software_raised_interrupt() -> Result<(), Ls8Error> {
    #[rustfmt::skip]
    let program = [
        LDI, 0, 32,     // 0
        LDI, 1, 0xf8,   // 3
        ST, 1, 0,       // 6: vector 0 -> 32
        LDI, IM, 1,     // 9
        LDI, IS, 1,     // 12: line 0 pending
        PRN, 0,         // 15: skipped, entry saves PC+2
        LDI, 3, 7,      // 17
        PRN, 3,         // 20
        HLT,            // 22
        0, 0, 0, 0, 0, 0, 0, 0, 0,
        LDI, 0, b'A',   // 32: handler clobbers R0
        PRA, 0,         // 35
        IRET,           // 37
    ];
    let mut cpu = boot(&ls8_text(&program))?;
    cpu.run(1_000)?;
    assert_eq!(cpu.output().lines(), vec!["A", "7"]);
    assert_eq!(cpu.registers().get(0)?, 32);
    assert_eq!(cpu.registers().is(), 0);
    assert_eq!(cpu.registers().sp(), 0xf8);
    assert!(cpu.flags().interrupts_enabled);
    Ok(())
}

#[test]
fn timer_latch_interrupt() -> Result<(), Ls8Error> {
    #[rustfmt::skip]
    let program = [
        LDI, 0, 16,     // 0
        LDI, 1, 0xf8,   // 3
        ST, 1, 0,       // 6
        LDI, IM, 1,     // 9
        HLT,            // 12: never reached
        0, 0, 0,
        LDI, 2, b'T',   // 16
        PRA, 2,         // 19
        HLT,            // 21
    ];
    let mut cpu = boot(&ls8_text(&program))?;
    cpu.run(4)?;
    cpu.interrupt_latch().assert_line(0);
    cpu.run(1_000)?;
    assert_eq!(cpu.output().text(), "T\n");
    assert_eq!(cpu.registers().pc, 21);
    Ok(())
}

#[test]
fn invalid_instruction_reports_and_halts() -> Result<(), Ls8Error> {
    let mut cpu = boot("00000100\n00000000\n00000001\n11111111\n00011011\n")?;
    let err = cpu.run(1_000).unwrap_err();
    assert!(matches!(
        err,
        CpuError::InvalidOpcode {
            address: 3,
            opcode: 0xff
        }
    ));
    assert_eq!(err.to_string(), "invalid instruction at 3: 0b11111111");
    assert_eq!(cpu.state(), CpuState::Halted);
    assert_eq!(cpu.cycles(), 2);
    assert_eq!(cpu.run(10)?, CpuState::Halted);
    assert_eq!(cpu.cycles(), 2);
    Ok(())
}

#[test]
fn malformed_program_is_rejected() {
    let mut ram = Ram::default();
    let err = load_program(&mut ram, "00000100\n0000000\n").unwrap_err();
    assert_eq!(err.to_string(), "load error: line 2: malformed instruction \"0000000\"");
}
