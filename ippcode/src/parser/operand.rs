//! Operand classification.
//!
//! An operand token is either a bare word (labels and type names) or a
//! `prefix@value` pair where the prefix is a frame tag (`GF`, `LF`, `TF`) or
//! a constant type (`int`, `bool`, `string`, `nil`). Each form has its own
//! lexical grammar, and the resulting concrete type must fit the slot.

use std::fmt;

use log::trace;

use crate::instruction::operand::{DataType, Frame, Operand, OperandKind, TypeName};

/// Why a token was rejected for a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum OperandError {
    /// Bare word in a `<label>` slot that is not an identifier.
    InvalidLabel(String),
    /// Bare word in a `<type>` slot that is not a type name.
    InvalidTypeName(String),
    /// Bare word where a variable or constant is required.
    MissingPrefix { expected: OperandKind },
    /// Variable name after the frame tag is not an identifier.
    InvalidVariableName(String),
    InvalidInt(String),
    InvalidBool(String),
    InvalidNil(String),
    InvalidEscape { value: String, problem: EscapeProblem },
    /// The part before `@` is neither a frame tag nor a constant type.
    UnknownPrefix(String),
    /// Well-formed operand of a type the slot does not take.
    Mismatch { expected: OperandKind, found: DataType },
}

/// What is wrong with a `\ddd` escape inside a string constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeProblem {
    /// Backslash at this byte offset is not followed by three digits.
    Incomplete { at: usize },
    /// The escape at this byte offset encodes a value above 255.
    OutOfRange { at: usize, code: u32 },
}

impl fmt::Display for OperandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandError::InvalidLabel(word) => write!(f, "`{}` is not a legal label", word),
            OperandError::InvalidTypeName(word) => {
                write!(f, "`{}` is not a type name (expected int, string or bool)", word)
            }
            OperandError::MissingPrefix { expected } => {
                write!(f, "expected {}, got a bare word without `@`", expected)
            }
            OperandError::InvalidVariableName(name) => {
                write!(f, "`{}` is not a legal variable identifier", name)
            }
            OperandError::InvalidInt(value) => write!(f, "int cannot have `{}` value", value),
            OperandError::InvalidBool(value) => write!(f, "bool cannot have `{}` value", value),
            OperandError::InvalidNil(value) => {
                write!(f, "`{}` is not a legal value of nil type", value)
            }
            OperandError::InvalidEscape { value, problem } => match problem {
                EscapeProblem::Incomplete { at } => write!(
                    f,
                    "bad escape sequence in string `{}`: backslash at offset {} must be followed by three digits",
                    value, at
                ),
                EscapeProblem::OutOfRange { at, code } => write!(
                    f,
                    "bad escape sequence in string `{}`: `\\{:03}` at offset {} is above 255",
                    value, code, at
                ),
            },
            OperandError::UnknownPrefix(prefix) => {
                write!(f, "data type `{}` not supported", prefix)
            }
            OperandError::Mismatch { expected, found } => {
                write!(f, "expected {}, got {}", expected, found)
            }
        }
    }
}

impl std::error::Error for OperandError {}

/// Classify `token` against the slot kind `expected`.
pub fn classify(token: &str, expected: OperandKind) -> Result<Operand, OperandError> {
    let operand = match token.split_once('@') {
        None => classify_bare(token, expected)?,
        Some((prefix, value)) => classify_prefixed(prefix, value)?,
    };

    let found = operand.data_type();
    if !expected.accepts(found) {
        return Err(OperandError::Mismatch { expected, found });
    }
    trace!("operand `{}` -> {} `{}`", token, found, operand);
    Ok(operand)
}

fn classify_bare(word: &str, expected: OperandKind) -> Result<Operand, OperandError> {
    match expected {
        OperandKind::Label => {
            if is_identifier(word) {
                Ok(Operand::Label(word.to_string()))
            } else {
                Err(OperandError::InvalidLabel(word.to_string()))
            }
        }
        OperandKind::Type => TypeName::from_name(word)
            .map(Operand::Type)
            .ok_or_else(|| OperandError::InvalidTypeName(word.to_string())),
        OperandKind::Var | OperandKind::Symb => Err(OperandError::MissingPrefix { expected }),
    }
}

fn classify_prefixed(prefix: &str, value: &str) -> Result<Operand, OperandError> {
    if let Some(frame) = Frame::from_tag(prefix) {
        if !is_identifier(value) {
            return Err(OperandError::InvalidVariableName(value.to_string()));
        }
        return Ok(Operand::Variable {
            frame,
            name: value.to_string(),
        });
    }

    match prefix {
        "int" => {
            if is_integer(value) {
                Ok(Operand::Int(value.to_string()))
            } else {
                Err(OperandError::InvalidInt(value.to_string()))
            }
        }
        "bool" => {
            if value.eq_ignore_ascii_case("true") {
                Ok(Operand::Bool(true))
            } else if value.eq_ignore_ascii_case("false") {
                Ok(Operand::Bool(false))
            } else {
                Err(OperandError::InvalidBool(value.to_string()))
            }
        }
        "string" => match check_escapes(value) {
            Ok(()) => Ok(Operand::String(value.to_string())),
            Err(problem) => Err(OperandError::InvalidEscape {
                value: value.to_string(),
                problem,
            }),
        },
        "nil" => {
            if value == "nil" {
                Ok(Operand::Nil)
            } else {
                Err(OperandError::InvalidNil(value.to_string()))
            }
        }
        _ => Err(OperandError::UnknownPrefix(prefix.to_string())),
    }
}

/// Identifier grammar shared by labels and variable names: a letter or one of
/// `-_$&%*!?`, followed by any of those or decimal digits.
pub fn is_identifier(word: &str) -> bool {
    let mut bytes = word.bytes();
    match bytes.next() {
        Some(first) if is_identifier_start(first) => {
            bytes.all(|b| is_identifier_start(b) || b.is_ascii_digit())
        }
        _ => false,
    }
}

fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'-' | b'_' | b'$' | b'&' | b'%' | b'*' | b'!' | b'?')
}

/// Optional sign followed by one or more decimal digits.
fn is_integer(value: &str) -> bool {
    let digits = value
        .strip_prefix('+')
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Every backslash must open a `\ddd` escape whose value fits in a byte.
fn check_escapes(value: &str) -> Result<(), EscapeProblem> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let digits = match bytes.get(i + 1..i + 4) {
            Some(digits) if digits.iter().all(u8::is_ascii_digit) => digits,
            _ => return Err(EscapeProblem::Incomplete { at: i }),
        };
        let code = digits
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
        if code > 255 {
            return Err(EscapeProblem::OutOfRange { at: i, code });
        }
        i += 4;
    }
    Ok(())
}
