use tracing::{trace, warn};

use crate::node::Node;
use crate::parser::MAX_NESTING_DEPTH;
use crate::resolver::resolve_node;
use crate::theme::StyleSheet;

/// Prefix of every list item.
pub const BULLET: &str = "• ";

/// How a node composes its own content and its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Styled text content; children are not rendered.
    Text,
    /// Children stacked vertically, the whole block styled once.
    Box,
    /// Children stacked vertically, each bulleted and styled on its own.
    List,
    /// Children stacked vertically with no styling. Any unrecognized kind.
    PassThrough,
}

impl Layout {
    /// Layout for a node kind. Matching is case-sensitive.
    pub fn of(kind: &str) -> Self {
        match kind {
            "text" => Layout::Text,
            "box" => Layout::Box,
            "list" => Layout::List,
            _ => Layout::PassThrough,
        }
    }
}

/// Renders markup trees against a style sheet. Rendering has no side
/// effects; the same tree always produces the same output.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'s> {
    sheet: &'s StyleSheet,
}

impl<'s> Renderer<'s> {
    pub fn new(sheet: &'s StyleSheet) -> Self {
        Self { sheet }
    }

    pub fn render(&self, node: &Node) -> String {
        self.render_at(node, 1)
    }

    /// Subtrees below [`MAX_NESTING_DEPTH`] render as empty blocks. Decoded
    /// trees never reach it; trees built by hand can.
    fn render_at(&self, node: &Node, depth: usize) -> String {
        if depth > MAX_NESTING_DEPTH {
            warn!(kind = %node.kind, depth, "nesting too deep, subtree skipped");
            return String::new();
        }
        let layout = Layout::of(&node.kind);
        trace!(kind = %node.kind, ?layout, children = node.children.len(), "render node");

        match layout {
            Layout::Text => {
                let style = resolve_node(self.sheet, node);
                style.render(node.text().trim())
            }
            Layout::Box => {
                let style = resolve_node(self.sheet, node);
                style.render(&self.render_children(node, depth).join("\n"))
            }
            Layout::List => {
                let style = resolve_node(self.sheet, node);
                self.render_children(node, depth)
                    .iter()
                    .map(|item| style.render(&format!("{}{}", BULLET, item)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Layout::PassThrough => self.render_children(node, depth).join("\n"),
        }
    }

    fn render_children(&self, node: &Node, depth: usize) -> Vec<String> {
        node.children
            .iter()
            .map(|child| self.render_at(child, depth + 1))
            .collect()
    }
}

/// Render a tree with the default style sheet.
pub fn render(node: &Node) -> String {
    Renderer::new(&StyleSheet::default()).render(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi;
    use crate::parser::decode;
    use crate::style::{Color, Style, MAX_DIMENSION};
    use crossterm::style::Stylize;
    use pretty_assertions::assert_eq;

    fn render_xml(xml: &str) -> String {
        render(&decode(xml).unwrap())
    }

    #[test]
    fn test_layout_dispatch() {
        assert_eq!(Layout::of("text"), Layout::Text);
        assert_eq!(Layout::of("box"), Layout::Box);
        assert_eq!(Layout::of("list"), Layout::List);
        assert_eq!(Layout::of("Box"), Layout::PassThrough);
        assert_eq!(Layout::of("table"), Layout::PassThrough);
    }

    #[test]
    fn test_box_with_text() {
        assert_eq!(render_xml("<box><text>Hi</text></box>"), "Hi");
    }

    #[test]
    fn test_list_items_are_bulleted() {
        assert_eq!(
            render_xml("<list><text>A</text><text>B</text></list>"),
            "• A\n• B"
        );
    }

    #[test]
    fn test_box_stacks_children() {
        assert_eq!(
            render_xml("<box><text>one</text><text>two</text></box>"),
            "one\ntwo"
        );
    }

    #[test]
    fn test_unknown_kind_passes_through_unstyled() {
        assert_eq!(
            render_xml(r#"<panel bold="true" border="rounded"><text>a</text><text>b</text></panel>"#),
            "a\nb"
        );
    }

    #[test]
    fn test_kind_matching_is_case_sensitive() {
        assert_eq!(render_xml(r#"<Text bold="true">Hi</Text>"#), "");
    }

    #[test]
    fn test_text_ignores_children() {
        assert_eq!(render_xml("<text>outer<text>inner</text></text>"), "outer");
    }

    #[test]
    fn test_empty_element_renders_empty() {
        assert_eq!(render(&Node::new("box")), "");
        assert_eq!(render(&Node::new("text")), "");
        assert_eq!(render(&Node::new("list")), "");
        assert_eq!(render(&Node::new("anything")), "");
    }

    #[test]
    fn test_bold_text() {
        assert_eq!(
            render_xml(r#"<text bold="true">Hi</text>"#),
            "Hi".bold().to_string()
        );
        assert_eq!(render_xml(r#"<text bold="yes">Hi</text>"#), "Hi");
    }

    #[test]
    fn test_unknown_border_is_normal() {
        assert_eq!(
            render_xml(r#"<box border="sideways"><text>Hi</text></box>"#),
            "┌──┐\n│Hi│\n└──┘"
        );
    }

    #[test]
    fn test_parent_style_wraps_child_output() {
        let out = render_xml(
            r#"<box border="rounded" paddingleft="1"><list><text>A</text><text>BB</text></list></box>"#,
        );
        assert_eq!(strip_ansi(&out), "╭─────╮\n│ • A │\n│ • BB│\n╰─────╯");
    }

    #[test]
    fn test_list_style_applies_per_item() {
        let out = render_xml(r#"<list border="normal"><text>A</text><text>B</text></list>"#);
        assert_eq!(out, "┌───┐\n│• A│\n└───┘\n┌───┐\n│• B│\n└───┘");
    }

    #[test]
    fn test_sheet_supplies_kind_defaults() {
        let sheet = StyleSheet::new().with_style(
            "text",
            Style {
                foreground: Some(Color::new("red")),
                ..Style::default()
            },
        );
        let tree = decode("<box><text>x</text></box>").unwrap();
        assert_eq!(Renderer::new(&sheet).render(&tree), "x".red().to_string());
    }

    #[test]
    fn test_attributes_override_sheet_defaults() {
        let sheet = StyleSheet::new().with_style(
            "text",
            Style {
                bold: true,
                ..Style::default()
            },
        );
        let tree = decode(r#"<text bold="false">x</text>"#).unwrap();
        assert_eq!(Renderer::new(&sheet).render(&tree), "x");
    }

    #[test]
    fn test_subtrees_past_max_depth_are_skipped() {
        let mut tree = Node::new("text").with_text("deep");
        for _ in 0..MAX_NESTING_DEPTH {
            tree = Node::new("box").with_child(tree);
        }
        assert_eq!(render(&tree), "");

        let mut tree = Node::new("text").with_text("deep");
        for _ in 1..MAX_NESTING_DEPTH {
            tree = Node::new("box").with_child(tree);
        }
        assert_eq!(render(&tree), "deep");
    }

    #[test]
    fn test_huge_attribute_values_render_clipped() {
        let out = render_xml(
            r#"<box border="normal"><text paddingtop="9223372036854775807" paddingleft="9223372036854775807">x</text></box>"#,
        );
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), MAX_DIMENSION);
        assert!(lines.iter().all(|l| crate::ansi::visible_width(l) <= MAX_DIMENSION));
    }

    #[test]
    fn test_render_is_idempotent() {
        let tree = decode(
            r#"<box border="double" padding="1" align="center" width="20"><text color="62">Title</text><list><text>a</text></list></box>"#,
        )
        .unwrap();
        assert_eq!(render(&tree), render(&tree));
    }
}
