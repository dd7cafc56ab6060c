use quick_xml::errors::IllFormedError;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

use crate::error::{TmulError, TmulResult};
use crate::node::Node;

/// Deepest element nesting a document may have; the root is depth 1.
pub const MAX_NESTING_DEPTH: usize = 64;

// ─── Public decode functions ─────────────────────────────────────────────────

/// Decode a markup document into a tree.
pub fn decode(source: &str) -> TmulResult<Node> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::default();

    loop {
        let event = reader.read_event().map_err(|err| match err {
            quick_xml::Error::IllFormed(IllFormedError::UnmatchedEndTag(tag)) => {
                TmulError::UnbalancedEndTag { tag }
            }
            err => TmulError::Xml {
                position: reader.error_position() as u64,
                message: err.to_string(),
            },
        })?;

        match event {
            Event::Start(e) => {
                builder.open(element_node(&reader, &e)?)?;
            }
            Event::Empty(e) => {
                let node = element_node(&reader, &e)?;
                let tag = node.kind.clone();
                builder.open(node)?;
                builder.close(&tag)?;
            }
            Event::End(e) => {
                let local = e.local_name();
                let tag = std::str::from_utf8(local.as_ref())?;
                builder.close(tag)?;
            }
            Event::Text(e) => {
                let raw = std::str::from_utf8(e.as_ref())?;
                let text = unescape(raw).map_err(|err| TmulError::Xml {
                    position: reader.buffer_position() as u64,
                    message: err.to_string(),
                })?;
                builder.text(&text);
            }
            Event::GeneralRef(e) => {
                let name = std::str::from_utf8(e.as_ref())?;
                let entity = format!("&{};", name);
                let resolved = unescape(&entity).map_err(|err| TmulError::Xml {
                    position: reader.buffer_position() as u64,
                    message: err.to_string(),
                })?;
                builder.text(&resolved);
            }
            Event::CData(e) => {
                let raw = std::str::from_utf8(e.as_ref())?;
                builder.break_run();
                builder.text(raw);
                builder.break_run();
            }
            Event::Eof => break,
            // Comments, processing instructions and declarations end a text run
            _ => builder.break_run(),
        }
    }

    builder.finish()
}

/// Decode raw bytes. The source must be UTF-8.
pub fn decode_bytes(bytes: &[u8]) -> TmulResult<Node> {
    decode(std::str::from_utf8(bytes)?)
}

/// Read and decode a document from disk.
pub fn decode_file(path: impl AsRef<Path>) -> TmulResult<Node> {
    let bytes = fs::read(path)?;
    decode_bytes(&bytes)
}

// ─── Tree building ───────────────────────────────────────────────────────────

/// Builds the tree bottom-up: open elements are owned by the stack and are
/// attached to their parent only once closed.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Node>,
    root: Option<Node>,
    pending_text: String,
}

impl TreeBuilder {
    fn open(&mut self, node: Node) -> TmulResult<()> {
        self.break_run();
        if self.stack.is_empty() {
            if let Some(root) = &self.root {
                return Err(TmulError::MultipleRoots {
                    first: root.kind.clone(),
                    second: node.kind,
                });
            }
        }
        if self.stack.len() >= MAX_NESTING_DEPTH {
            return Err(TmulError::MaxNestingDepthExceeded {
                max_depth: MAX_NESTING_DEPTH,
            });
        }
        self.stack.push(node);
        Ok(())
    }

    /// The tokenizer already rejects end tags with no open element; the
    /// underflow check keeps the builder sound on its own.
    fn close(&mut self, tag: &str) -> TmulResult<()> {
        self.break_run();
        let node = self.stack.pop().ok_or_else(|| TmulError::UnbalancedEndTag {
            tag: tag.to_string(),
        })?;
        self.attach(node);
        Ok(())
    }

    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root = Some(node),
        }
    }

    fn text(&mut self, text: &str) {
        self.pending_text.push_str(text);
    }

    /// Flushes the pending run into the innermost open element. Text outside
    /// the root element is dropped.
    fn break_run(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let run = std::mem::take(&mut self.pending_text);
        if let Some(current) = self.stack.last_mut() {
            current.push_text(&run);
        }
    }

    fn finish(mut self) -> TmulResult<Node> {
        self.break_run();
        // Elements still open at end of input are closed implicitly
        while let Some(node) = self.stack.pop() {
            self.attach(node);
        }
        self.root.ok_or(TmulError::EmptyDocument)
    }
}

/// Build a childless node from a start tag: local names only, values unescaped.
fn element_node(reader: &Reader<&[u8]>, start: &BytesStart) -> TmulResult<Node> {
    let local = start.local_name();
    let kind = std::str::from_utf8(local.as_ref())?;
    let mut node = Node::new(kind);

    for attr in start.attributes() {
        let attr = attr.map_err(|err| TmulError::InvalidAttribute {
            position: reader.buffer_position() as u64,
            message: err.to_string(),
        })?;
        let local = attr.key.local_name();
        let key = std::str::from_utf8(local.as_ref())?.to_string();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| TmulError::InvalidAttribute {
                position: reader.buffer_position() as u64,
                message: err.to_string(),
            })?;
        node.attributes.insert(key, value.into_owned());
    }

    Ok(node)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
