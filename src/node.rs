use quick_xml::escape::escape;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute map of an element. Keys keep the casing they were written with;
/// lookups through [`Node::attr`] ignore ASCII case.
pub type Attributes = BTreeMap<String, String>;

/// A single element of a markup tree.
///
/// Nodes are kind-agnostic: `kind` is the element's local tag name and any
/// value is legal. Text and children may both be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub kind: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
    pub text: Option<String>,
}

impl Node {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, run: &str) -> Self {
        self.push_text(run);
        self
    }

    /// Value of an attribute, matching the key case-insensitively.
    ///
    /// When several keys differ only by case, the last one in key order wins.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if the node carries `name` in any casing.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs_named(name).next().is_some()
    }

    /// All values whose key equals `name` ignoring ASCII case, in key order.
    pub fn attrs_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Accumulated text content, or the empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Appends a text run. The run is trimmed; empty runs are dropped and
    /// consecutive runs are joined with a single space.
    pub fn push_text(&mut self, run: &str) {
        let run = run.trim();
        if run.is_empty() {
            return;
        }
        match &mut self.text {
            Some(text) => {
                text.push(' ');
                text.push_str(run);
            }
            None => self.text = Some(run.to_string()),
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{}<{}", indent, self.kind)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, escape(value.as_str()))?;
        }
        writeln!(f, ">")?;

        if let Some(text) = &self.text {
            writeln!(f, "{}  {}", indent, escape(text.as_str()))?;
        }

        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }

        writeln!(f, "{}</{}>", indent, self.kind)
    }
}

/// Indented markup, escaped so that it decodes back into an equal tree.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
