pub mod error;
pub mod line;
pub mod operand;
mod program;

pub use error::{ErrorKind, ParseError};

use crate::Program;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse IPPcode22 source into a complete Program.
    ///
    /// Stops at the first invalid line; no partial program is returned.
    pub fn parse(&self) -> Result<Program, ParseError> {
        program::parse_program(&self.source, self.file_id)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
