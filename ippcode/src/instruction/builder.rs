use std::ops::Range;

use log::debug;

use crate::Program;
use crate::instruction::opcode::Opcode;
use crate::instruction::{Argument, Instruction};

/// Accumulates validated instructions and hands out their execution order.
///
/// Only fully classified instructions reach `append`, so the order sequence
/// stays gapless. Nothing is visible to the caller until `finish`.
pub struct ProgramBuilder {
    next_order: u32,
    instructions: Vec<Instruction>,
    source_id: usize,
}

impl ProgramBuilder {
    pub fn new(source_id: usize) -> Self {
        ProgramBuilder {
            next_order: 1,
            instructions: Vec::new(),
            source_id,
        }
    }

    /// Record an instruction and return the order it was assigned.
    pub fn append(&mut self, opcode: Opcode, arguments: Vec<Argument>, span: Range<usize>) -> u32 {
        debug_assert_eq!(arguments.len(), opcode.arity());

        let order = self.next_order;
        self.next_order += 1;
        debug!("instruction {} {} ({} operands)", order, opcode, arguments.len());
        self.instructions.push(Instruction {
            order,
            opcode,
            arguments,
            span,
        });
        order
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn finish(self) -> Program {
        Program {
            instructions: self.instructions,
            source_id: self.source_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::operand::{Frame, Operand};

    fn var(name: &str) -> Argument {
        Argument {
            operand: Operand::Variable {
                frame: Frame::Global,
                name: name.to_string(),
            },
            span: 0..0,
        }
    }

    #[test]
    fn orders_start_at_one_and_increase() {
        let mut builder = ProgramBuilder::new(3);
        assert!(builder.is_empty());
        assert_eq!(builder.append(Opcode::CreateFrame, vec![], 0..11), 1);
        assert_eq!(builder.append(Opcode::DefVar, vec![var("a")], 12..24), 2);
        assert_eq!(builder.append(Opcode::Break, vec![], 25..30), 3);
        assert_eq!(builder.len(), 3);

        let program = builder.finish();
        assert_eq!(program.source_id, 3);
        let orders: Vec<u32> = program.instructions.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(program.instructions[1].opcode, Opcode::DefVar);
    }
}
