pub mod document;
pub mod instruction;
pub mod parser;

use crate::document::Document;
use crate::instruction::Instruction;
use crate::parser::ParseError;

/// Language name written to the `language` attribute of the document root.
pub const LANGUAGE: &str = "IPPcode22";

/// Marker that must open every source file (matched case-insensitively).
pub const HEADER: &str = ".IPPcode22";

/// A parsed IPPcode22 program.
#[derive(Debug, Clone)]
pub struct Program {
    /// Instructions in source order; `order` runs 1..=len without gaps.
    pub instructions: Vec<Instruction>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Program {
    /// Build the XML tree handed to the interpreter.
    pub fn to_document(&self) -> Document {
        Document::from(self)
    }

    /// Serialize the program as a complete XML document.
    pub fn to_xml(&self) -> String {
        self.to_document().to_string()
    }
}

/// Parse a source text that is not backed by a file database.
pub fn parse_str(source: &str) -> Result<Program, ParseError> {
    parser::Parser::new(source.to_string(), 0).parse()
}
