pub mod builder;
pub mod opcode;
pub mod operand;

use std::ops::Range;

use crate::instruction::opcode::Opcode;
use crate::instruction::operand::Operand;

/// A single validated instruction line.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// 1-based execution order, unique across the program.
    pub order: u32,
    pub opcode: Opcode,
    /// Operands in slot order; always as many as the opcode's signature has slots.
    pub arguments: Vec<Argument>,
    /// Byte span of the line content (comment and surrounding whitespace excluded).
    pub span: Range<usize>,
}

/// A classified operand together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub operand: Operand,
    pub span: Range<usize>,
}

impl Instruction {
    pub fn span(&self) -> &Range<usize> {
        &self.span
    }
}
