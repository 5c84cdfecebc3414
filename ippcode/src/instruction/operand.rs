use std::fmt;

/// What a signature slot expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// A variable that can be written to.
    Var,
    /// Any value: a variable or a constant.
    Symb,
    Label,
    /// One of the type names `int`, `string`, `bool`.
    Type,
}

impl OperandKind {
    /// Whether an operand of concrete type `data_type` may fill this slot.
    pub fn accepts(self, data_type: DataType) -> bool {
        match self {
            OperandKind::Var => data_type == DataType::Var,
            OperandKind::Symb => matches!(
                data_type,
                DataType::Var | DataType::Int | DataType::Bool | DataType::String | DataType::Nil
            ),
            OperandKind::Label => data_type == DataType::Label,
            OperandKind::Type => data_type == DataType::Type,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperandKind::Var => "var",
            OperandKind::Symb => "symb",
            OperandKind::Label => "label",
            OperandKind::Type => "type",
        }
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The concrete type an operand resolved to; written to the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Var,
    Int,
    Bool,
    String,
    Nil,
    Label,
    Type,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Var => "var",
            DataType::Int => "int",
            DataType::Bool => "bool",
            DataType::String => "string",
            DataType::Nil => "nil",
            DataType::Label => "label",
            DataType::Type => "type",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variable storage scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    Global,
    Local,
    Temporary,
}

impl Frame {
    /// Resolve a frame tag (`GF`, `LF`, `TF`); tags are case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Frame> {
        match tag {
            "GF" => Some(Frame::Global),
            "LF" => Some(Frame::Local),
            "TF" => Some(Frame::Temporary),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Frame::Global => "GF",
            Frame::Local => "LF",
            Frame::Temporary => "TF",
        }
    }
}

/// Type names accepted by `<type>` slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    Int,
    String,
    Bool,
}

impl TypeName {
    pub fn from_name(name: &str) -> Option<TypeName> {
        match name {
            "int" => Some(TypeName::Int),
            "string" => Some(TypeName::String),
            "bool" => Some(TypeName::Bool),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::Int => "int",
            TypeName::String => "string",
            TypeName::Bool => "bool",
        }
    }
}

/// A classified operand.
///
/// Literal payloads keep their source spelling: integers are not re-formatted
/// and string escapes (`\ddd`) are validated but left undecoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Variable { frame: Frame, name: String },
    Int(String),
    Bool(bool),
    String(String),
    Nil,
    Label(String),
    Type(TypeName),
}

impl Operand {
    pub fn data_type(&self) -> DataType {
        match self {
            Operand::Variable { .. } => DataType::Var,
            Operand::Int(_) => DataType::Int,
            Operand::Bool(_) => DataType::Bool,
            Operand::String(_) => DataType::String,
            Operand::Nil => DataType::Nil,
            Operand::Label(_) => DataType::Label,
            Operand::Type(_) => DataType::Type,
        }
    }

    /// Text content of the operand's `argN` element.
    pub fn normalized(&self) -> String {
        match self {
            Operand::Variable { frame, name } => format!("{}@{}", frame.tag(), name),
            Operand::Int(digits) => digits.clone(),
            Operand::Bool(true) => "true".to_string(),
            Operand::Bool(false) => "false".to_string(),
            Operand::String(text) => text.clone(),
            Operand::Nil => "nil".to_string(),
            Operand::Label(name) => name.clone(),
            Operand::Type(type_name) => type_name.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized())
    }
}
