use std::fmt;

use crate::parser::BinaryOp;

/// Virtual register index
pub type Register = usize;

/// Instructions of the target register machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `MOV r0 5`
    LoadImmediate { dst: Register, value: i32 },
    /// `MOV r0 [4]`
    Load { dst: Register, address: usize },
    /// `MOV [4] r0`
    Store { address: usize, src: Register },
    /// `MOV r1 r0`
    Move { dst: Register, src: Register },
    /// `ADD r0 r1`, result lands in `dst`
    Arith { op: BinaryOp, dst: Register, src: Register },
    /// `EXIT 0`
    Exit(i32),
}

impl BinaryOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinaryOp::Add => "ADD",
            BinaryOp::Sub => "SUB",
            BinaryOp::Mul => "MUL",
            BinaryOp::Div => "DIV",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Xor => "XOR",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::LoadImmediate { dst, value } => write!(f, "MOV r{} {}", dst, value),
            Instruction::Load { dst, address } => write!(f, "MOV r{} [{}]", dst, address),
            Instruction::Store { address, src } => write!(f, "MOV [{}] r{}", address, src),
            Instruction::Move { dst, src } => write!(f, "MOV r{} r{}", dst, src),
            Instruction::Arith { op, dst, src } => write!(f, "{} r{} r{}", op.mnemonic(), dst, src),
            Instruction::Exit(code) => write!(f, "EXIT {}", code),
        }
    }
}
