//! Indentation and line-ending inference.

use crate::xml::{Document, Element};

/// Indentation unit used when the document gives no hint.
pub const DEFAULT_INDENT: &str = "    ";

/// Whitespace conventions of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// One level of indentation
    pub unit: String,
    /// Line terminator
    pub newline: &'static str,
}

impl Style {
    /// Infer the style of `document` from the indentation of the root's children.
    #[must_use]
    pub fn infer(document: &Document) -> Self {
        let root = document.root();
        let unit = root
            .child_elements()
            .find_map(|(index, _)| root.indent_before(index))
            .filter(|indent| !indent.is_empty())
            .unwrap_or_else(|| DEFAULT_INDENT.to_string());

        Self {
            unit,
            newline: document.newline(),
        }
    }

    /// `indent` plus one unit.
    #[must_use]
    pub fn deeper(&self, indent: &str) -> String {
        format!("{indent}{}", self.unit)
    }

    /// A line break followed by `indent`.
    #[must_use]
    pub fn line(&self, indent: &str) -> String {
        format!("{}{indent}", self.newline)
    }
}

/// Indentation of the last child element of `parent`, if it starts its own line.
#[must_use]
pub fn last_child_indent(parent: &Element) -> Option<String> {
    let (index, _) = parent.child_elements().last()?;
    parent.indent_before(index)
}

/// Indentation of the first child element of `parent`, if it starts its own line.
#[must_use]
pub fn first_child_indent(parent: &Element) -> Option<String> {
    let (index, _) = parent.child_elements().next()?;
    parent.indent_before(index)
}
