/// Operations the ALU knows about. Results are the low 8 bits of the true
/// result; nothing saturates or traps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Mul,
}

impl AluOp {
    pub fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Mul => a.wrapping_mul(b),
        }
    }
}
