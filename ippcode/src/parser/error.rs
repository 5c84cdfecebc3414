use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// Which stage of validation rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed `.IPPcode22` header.
    Header,
    /// Unknown instruction name.
    Opcode,
    /// Wrong operand count or an operand that fails its slot's grammar.
    Syntax,
}

impl ErrorKind {
    /// Process exit status reported for this kind of failure.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Header => 21,
            ErrorKind::Opcode => 22,
            ErrorKind::Syntax => 23,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Header => "header",
            ErrorKind::Opcode => "opcode",
            ErrorKind::Syntax => "syntax",
        }
    }

    pub fn from_name(name: &str) -> Option<ErrorKind> {
        match name {
            "header" => Some(ErrorKind::Header),
            "opcode" => Some(ErrorKind::Opcode),
            "syntax" => Some(ErrorKind::Syntax),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse errors with source location information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub notes: Vec<String>,
}

impl ParseError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        span: Range<usize>,
        file_id: usize,
    ) -> Self {
        ParseError {
            kind,
            message: message.into(),
            span,
            file_id,
            notes: Vec::new(),
        }
    }

    pub fn header(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        Self::new(ErrorKind::Header, message, span, file_id)
    }

    pub fn opcode(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        Self::new(ErrorKind::Opcode, message, span, file_id)
    }

    pub fn syntax(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        Self::new(ErrorKind::Syntax, message, span, file_id)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(&self.message)
            .with_code(format!("E{}", self.exit_code()))
            .with_labels(vec![
                Label::primary(self.file_id, self.span.clone())
                    .with_message(format!("{} error", self.kind)),
            ])
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}
