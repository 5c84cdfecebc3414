use log::debug;

use crate::instruction::builder::ProgramBuilder;
use crate::instruction::opcode::Opcode;
use crate::instruction::Argument;
use crate::parser::error::ParseError;
use crate::parser::line::{self, Line};
use crate::parser::operand;
use crate::{HEADER, Program};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a whole source text into a program.
pub fn parse_program(source: &str, file_id: usize) -> Result<Program, ParseError> {
    let mut state = ParseState::new(file_id);
    for line in line::lines(source) {
        state.process_line(&line)?;
    }
    state.finalize(source)
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    AwaitingHeader,
    ParsingBody,
}

struct ParseState {
    stage: Stage,
    file_id: usize,
    builder: ProgramBuilder,
}

impl ParseState {
    fn new(file_id: usize) -> Self {
        ParseState {
            stage: Stage::AwaitingHeader,
            file_id,
            builder: ProgramBuilder::new(file_id),
        }
    }

    fn process_line(&mut self, line: &Line<'_>) -> Result<(), ParseError> {
        match self.stage {
            Stage::AwaitingHeader => {
                self.accept_header(line)?;
                self.stage = Stage::ParsingBody;
                Ok(())
            }
            Stage::ParsingBody => self.accept_instruction(line),
        }
    }

    fn accept_header(&self, line: &Line<'_>) -> Result<(), ParseError> {
        let head = line.head();
        if !head.text.eq_ignore_ascii_case(HEADER) {
            return Err(ParseError::header(
                format!("unexpected header `{}`", head.text),
                head.span.clone(),
                self.file_id,
            )
            .with_note(format!("the first line must be `{}`", HEADER)));
        }
        if let Some(extra) = line.operands().first() {
            return Err(ParseError::header(
                format!("unexpected `{}` after the header", extra.text),
                extra.span.start..line.span().end,
                self.file_id,
            )
            .with_note(format!("the header line holds only `{}`", HEADER)));
        }
        debug!("header accepted on line {}", line.number);
        Ok(())
    }

    fn accept_instruction(&mut self, line: &Line<'_>) -> Result<(), ParseError> {
        let head = line.head();
        let opcode = Opcode::from_name(head.text).ok_or_else(|| {
            ParseError::opcode(
                format!("opcode `{}` does not exist", head.text.to_ascii_uppercase()),
                head.span.clone(),
                self.file_id,
            )
        })?;

        let signature = opcode.signature();
        let operands = line.operands();
        if operands.len() != signature.len() {
            let span = match operands.get(signature.len()) {
                Some(extra) => extra.span.start..line.span().end,
                None => line.span(),
            };
            return Err(ParseError::syntax(
                format!(
                    "wrong number of operands for {}: expected {}, got {}",
                    opcode,
                    signature.len(),
                    operands.len()
                ),
                span,
                self.file_id,
            )
            .with_note(format!("usage: {}", opcode.usage())));
        }

        let mut arguments = Vec::with_capacity(signature.len());
        for (slot, (token, expected)) in operands.iter().zip(signature).enumerate() {
            let operand = operand::classify(token.text, *expected).map_err(|e| {
                ParseError::syntax(
                    format!("invalid operand {} of {}: {}", slot + 1, opcode, e),
                    token.span.clone(),
                    self.file_id,
                )
                .with_note(format!("usage: {}", opcode.usage()))
            })?;
            arguments.push(Argument {
                operand,
                span: token.span.clone(),
            });
        }

        self.builder.append(opcode, arguments, line.span());
        Ok(())
    }

    fn finalize(self, source: &str) -> Result<Program, ParseError> {
        if self.stage == Stage::AwaitingHeader {
            let end = source.len();
            return Err(ParseError::header("missing header", end..end, self.file_id)
                .with_note(format!("the first line must be `{}`", HEADER)));
        }
        debug!("parsed {} instructions", self.builder.len());
        Ok(self.builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::error::ErrorKind;

    fn parse(source: &str) -> Result<Program, ParseError> {
        parse_program(source, 0)
    }

    #[test]
    fn header_only_program_is_empty() {
        let program = parse(".IPPcode22\n").unwrap();
        assert!(program.instructions.is_empty());
    }

    #[test]
    fn header_may_follow_comments() {
        let program = parse("# intro\n\n   .ippCODE22   # header\nBREAK").unwrap();
        assert_eq!(program.instructions.len(), 1);
    }

    #[test]
    fn header_with_operands_is_rejected() {
        let error = parse(".IPPcode22 extra\n").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Header);
        assert_eq!(error.span, 11..16);
    }

    #[test]
    fn empty_input_has_no_header() {
        let error = parse("").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Header);
        assert_eq!(error.message, "missing header");
    }

    #[test]
    fn instruction_before_header() {
        let error = parse("WRITE int@1\n.IPPcode22\n").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Header);
        assert_eq!(error.span, 0..5);
    }

    #[test]
    fn second_header_is_an_unknown_opcode() {
        let error = parse(".IPPcode22\n.IPPcode22\n").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Opcode);
    }

    #[test]
    fn operand_error_names_slot_and_opcode() {
        let source = ".IPPcode22\nADD GF@x int@1 int@x\n";
        let error = parse(source).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Syntax);
        assert!(error.message.contains("operand 3 of ADD"), "{}", error.message);
        assert_eq!(&source[error.span.clone()], "int@x");
        assert_eq!(error.notes, vec!["usage: ADD <var> <symb> <symb>".to_string()]);
    }

    #[test]
    fn extra_operands_point_at_the_first_extra_token() {
        let source = ".IPPcode22\nWRITE int@1 int@2 int@3\n";
        let error = parse(source).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Syntax);
        assert_eq!(&source[error.span.clone()], "int@2 int@3");
    }
}
