//! Lossless XML tree for descriptor editing.
//!
//! A [`Document`] keeps the exact source text of every markup token and every run
//! of character data, so serializing an untouched document reproduces the input
//! byte for byte: attribute order and quoting, whitespace between elements,
//! comments, processing instructions, DOCTYPE, CDATA sections and self-closing
//! versus explicit-empty style all survive. Edits replace or insert individual
//! nodes; nothing is regenerated wholesale.
//!
//! Elements are addressed by [`NodePath`], the sequence of child indices from the
//! root element. The structured view records these paths so the patcher can find
//! the exact node that a decision refers to.
//!
//! # Example
//!
//! ```rust,no_run
//! use pomup_cli::xml::Document;
//!
//! let source = "<project>\n  <!-- keep me -->\n  <version>1.0</version>\n</project>\n";
//! let doc = Document::parse(source, "pom.xml")?;
//! assert_eq!(doc.serialize(), source);
//! assert_eq!(doc.root().child("version").map(|(_, e)| e.text()), Some("1.0".to_string()));
//! # Ok::<(), pomup_cli::core::PomError>(())
//! ```

mod parser;

use quick_xml::escape::{partial_escape, unescape};
use std::fmt;

pub use parser::parse;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// A parsed descriptor that serializes back to its exact source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    bom: bool,
    nodes: Vec<Node>,
    root: usize,
}

/// One node of the lossless tree. Every variant except [`Node::Element`] stores
/// its raw source text verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with its raw start/end tags and children
    Element(Element),
    /// Character data exactly as written (entities unexpanded)
    Text(String),
    /// A complete `<![CDATA[...]]>` section
    CData(String),
    /// A complete `<!-- ... -->` comment
    Comment(String),
    /// XML declaration, processing instruction or DOCTYPE
    Markup(String),
}

/// An element whose tags are kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    qname: String,
    start_tag: String,
    end_tag: Option<String>,
    children: Vec<Node>,
}

/// Child-index path from the root element to a descendant element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The path of the root element itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the child at `index` below this path.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent element, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Index of this node within its parent, `None` for the root.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Raw child indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("/"))
    }
}

impl Document {
    /// Parse descriptor text; `label` names the source in error messages.
    pub fn parse(source: &str, label: &str) -> Result<Self, crate::core::PomError> {
        parser::parse(source, label)
    }

    /// Parse raw bytes, rejecting input that is not valid UTF-8.
    pub fn parse_bytes(bytes: &[u8], label: &str) -> Result<Self, crate::core::PomError> {
        let source = std::str::from_utf8(bytes).map_err(|e| {
            crate::core::PomError::parse(
                label,
                format!("descriptor is not valid UTF-8: {e}"),
                Some(e.valid_up_to()),
            )
        })?;
        parser::parse(source, label)
    }

    pub(crate) fn from_parts(bom: bool, nodes: Vec<Node>, root: usize) -> Self {
        Self {
            bom,
            nodes,
            root,
        }
    }

    /// The document element.
    #[must_use]
    pub fn root(&self) -> &Element {
        match &self.nodes[self.root] {
            Node::Element(element) => element,
            _ => unreachable!("root index always points at an element"),
        }
    }

    /// Mutable access to the document element.
    pub fn root_mut(&mut self) -> &mut Element {
        match &mut self.nodes[self.root] {
            Node::Element(element) => element,
            _ => unreachable!("root index always points at an element"),
        }
    }

    /// Element at `path`, if every step lands on an element.
    #[must_use]
    pub fn element(&self, path: &NodePath) -> Option<&Element> {
        let mut current = self.root();
        for &index in path.indices() {
            match current.children.get(index)? {
                Node::Element(child) => current = child,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Mutable element at `path`.
    pub fn element_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        let mut current = self.root_mut();
        for &index in path.indices() {
            match current.children.get_mut(index)? {
                Node::Element(child) => current = child,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Line terminator used by the document (`\r\n` if any line uses it).
    #[must_use]
    pub fn newline(&self) -> &'static str {
        if self.serialize().contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Re-emit the document text.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push('\u{feff}');
        }
        for node in &self.nodes {
            node.write_to(&mut out);
        }
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl Node {
    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_to(out),
            Node::Text(raw) | Node::CData(raw) | Node::Comment(raw) | Node::Markup(raw) => {
                out.push_str(raw);
            }
        }
    }

    /// Whether this node is character data consisting only of whitespace.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(raw) if raw.trim().is_empty())
    }
}

impl Element {
    /// A new `<name></name>` element in the same namespace prefix as `self`.
    ///
    /// `<m:dependencies>` yields `<m:dependency>`; an unprefixed element yields
    /// an unprefixed one.
    #[must_use]
    pub fn new_like(&self, name: &str) -> Self {
        Self::qualified(self.prefix(), name)
    }

    /// Like [`Element::new_like`], containing escaped `text`.
    #[must_use]
    pub fn text_like(&self, name: &str, text: &str) -> Self {
        self.new_like(name).containing(text)
    }

    fn qualified(prefix: Option<&str>, name: &str) -> Self {
        let qname = match prefix {
            Some(prefix) => format!("{prefix}:{name}"),
            None => name.to_string(),
        };
        Self {
            name: name.to_string(),
            start_tag: format!("<{qname}>"),
            end_tag: Some(format!("</{qname}>")),
            qname,
            children: Vec::new(),
        }
    }

    fn containing(mut self, text: &str) -> Self {
        self.children.push(Node::Text(partial_escape(text).into_owned()));
        self
    }

    /// Namespace prefix of the tag name, if it has one.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.qname.split_once(':').map(|(prefix, _)| prefix)
    }

    pub(crate) fn from_tags(
        name: String,
        qname: String,
        start_tag: String,
        end_tag: Option<String>,
    ) -> Self {
        Self {
            name,
            qname,
            start_tag,
            end_tag,
            children: Vec::new(),
        }
    }

    pub(crate) fn qname(&self) -> &str {
        &self.qname
    }

    pub(crate) fn close(&mut self, end_tag: String) {
        self.end_tag = Some(end_tag);
    }

    /// Local name (namespace prefix stripped).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the element was written as `<name/>`.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.end_tag.is_none()
    }

    /// All child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements with their indices.
    pub fn child_elements(&self) -> impl Iterator<Item = (usize, &Element)> {
        self.children.iter().enumerate().filter_map(|(index, node)| match node {
            Node::Element(element) => Some((index, element)),
            _ => None,
        })
    }

    /// First child element named `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<(usize, &Element)> {
        self.child_elements().find(|(_, element)| element.name == name)
    }

    /// Mutable access to the first child element named `name`.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Trimmed text of a child element, `None` if the child is absent.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|(_, element)| element.text())
    }

    /// Concatenated, unescaped character data of the element, trimmed.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(raw) => match unescape(raw) {
                    Ok(value) => text.push_str(&value),
                    Err(_) => text.push_str(raw),
                },
                Node::CData(raw) => text.push_str(cdata_inner(raw)),
                _ => {}
            }
        }
        text.trim().to_string()
    }

    /// Replace the element's character data with `value`.
    ///
    /// When the element holds a single run of text, only the non-whitespace part of
    /// that run changes; padding inside the tags is kept. Otherwise the content is
    /// replaced by one text node.
    pub fn set_text(&mut self, value: &str) {
        let escaped = partial_escape(value).into_owned();
        self.expand();

        let content: Vec<usize> = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node, Node::CData(_)) || is_content_text(node))
            .map(|(index, _)| index)
            .collect();

        if let [index] = content.as_slice()
            && let Node::Text(raw) = &mut self.children[*index]
        {
            let leading = raw.len() - raw.trim_start().len();
            let trailing = raw.trim_end().len();
            *raw = format!("{}{}{}", &raw[..leading], escaped, &raw[trailing..]);
            return;
        }

        self.children = vec![Node::Text(escaped)];
    }

    /// Turn `<name/>` into `<name></name>` so children can be added.
    pub fn expand(&mut self) {
        if self.end_tag.is_some() {
            return;
        }
        let body = self.start_tag.trim_end_matches('>').trim_end_matches('/').trim_end();
        self.start_tag = format!("{body}>");
        self.end_tag = Some(format!("</{}>", self.qname));
    }

    /// Insert `node` at `index` among the children.
    pub fn insert_child(&mut self, index: usize, node: Node) {
        self.expand();
        self.children.insert(index, node);
    }

    /// Append `node` after the last child.
    pub fn push_child(&mut self, node: Node) {
        self.expand();
        self.children.push(node);
    }

    /// Replace all children.
    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.expand();
        self.children = children;
    }

    /// Indentation of the line the child at `index` starts on, if the text before
    /// it ends with a line break followed by blanks.
    #[must_use]
    pub fn indent_before(&self, index: usize) -> Option<String> {
        let previous = index.checked_sub(1).and_then(|i| self.children.get(i))?;
        match previous {
            Node::Text(raw) => {
                let (_, tail) = raw.rsplit_once('\n')?;
                tail.chars().all(|c| c == ' ' || c == '\t').then(|| tail.to_string())
            }
            _ => None,
        }
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&self.start_tag);
        for child in &self.children {
            child.write_to(out);
        }
        if let Some(end_tag) = &self.end_tag {
            out.push_str(end_tag);
        }
    }
}

fn is_content_text(node: &Node) -> bool {
    matches!(node, Node::Text(raw) if !raw.trim().is_empty())
}

fn cdata_inner(raw: &str) -> &str {
    raw.strip_prefix(CDATA_OPEN)
        .and_then(|inner| inner.strip_suffix(CDATA_CLOSE))
        .unwrap_or(raw)
}
