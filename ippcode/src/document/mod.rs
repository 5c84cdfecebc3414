pub mod escape;

use std::fmt;

use crate::instruction::{Argument, Instruction};
use crate::{LANGUAGE, Program};

/// An XML document: the declaration followed by a single root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}<{}", "", self.name, indent = depth)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, escape::attribute(value))?;
        }

        if self.children.is_empty() {
            return writeln!(f, "/>");
        }

        // Text-only elements stay on one line.
        if self.children.iter().all(|node| matches!(node, Node::Text(_))) {
            return writeln!(f, ">{}</{}>", escape::text(&self.text()), self.name);
        }

        writeln!(f, ">")?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write(f, depth + 1)?,
                Node::Text(text) => {
                    writeln!(f, "{:indent$}{}", "", escape::text(text), indent = depth + 1)?
                }
            }
        }
        writeln!(f, "{:indent$}</{}>", "", self.name, indent = depth)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        self.root.write(f, 0)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0)
    }
}

/// `argN` element for the operand in 1-based slot `position`.
fn argument_element(position: usize, argument: &Argument) -> Element {
    Element::new(format!("arg{}", position))
        .with_attribute("type", argument.operand.data_type().as_str())
        .with_text(argument.operand.normalized())
}

impl From<&Instruction> for Element {
    fn from(instruction: &Instruction) -> Self {
        instruction.arguments.iter().enumerate().fold(
            Element::new("instruction")
                .with_attribute("order", instruction.order.to_string())
                .with_attribute("opcode", instruction.opcode.name()),
            |element, (i, argument)| element.with_child(argument_element(i + 1, argument)),
        )
    }
}

impl From<&Program> for Document {
    fn from(program: &Program) -> Self {
        let root = program.instructions.iter().fold(
            Element::new("program").with_attribute("language", LANGUAGE),
            |root, instruction| root.with_child(Element::from(instruction)),
        );
        Document { root }
    }
}
