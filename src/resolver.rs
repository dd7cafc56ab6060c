//! Attribute → style resolution.
//!
//! Resolution is total: a value that does not parse for its property is
//! ignored and the property keeps the value it had in the base style.

use crate::node::{Attributes, Node};
use crate::style::{Align, BorderKind, Color, Edges, Style, MAX_DIMENSION};
use crate::theme::StyleSheet;

type Setter = fn(&mut Style, &str);

/// Attribute keys (lowercase) and the mutation each one applies, in
/// application order. `border` precedes the border color entries; uniform
/// `padding`/`margin` precede their per-side variants.
const ATTRIBUTE_TABLE: &[(&str, Setter)] = &[
    // Emphasis: only the literal "true" enables a flag
    ("bold", |s: &mut Style, v: &str| s.bold = v == "true"),
    ("italic", |s: &mut Style, v: &str| s.italic = v == "true"),
    ("faint", |s: &mut Style, v: &str| s.faint = v == "true"),
    ("underline", |s: &mut Style, v: &str| s.underline = v == "true"),
    ("blink", |s: &mut Style, v: &str| s.blink = v == "true"),
    ("reverse", |s: &mut Style, v: &str| s.reverse = v == "true"),
    ("strikethrough", |s: &mut Style, v: &str| s.strikethrough = v == "true"),
    // Colors
    ("color", |s: &mut Style, v: &str| s.foreground = Some(Color::new(v))),
    ("foreground", |s: &mut Style, v: &str| s.foreground = Some(Color::new(v))),
    ("bg", |s: &mut Style, v: &str| s.background = Some(Color::new(v))),
    ("background", |s: &mut Style, v: &str| s.background = Some(Color::new(v))),
    // Padding: the bare attribute ignores its value
    ("padding", |s: &mut Style, _: &str| s.padding = Edges::uniform(1)),
    ("paddingtop", |s: &mut Style, v: &str| set_int(&mut s.padding.top, v)),
    ("paddingright", |s: &mut Style, v: &str| set_int(&mut s.padding.right, v)),
    ("paddingbottom", |s: &mut Style, v: &str| set_int(&mut s.padding.bottom, v)),
    ("paddingleft", |s: &mut Style, v: &str| set_int(&mut s.padding.left, v)),
    // Margin: same convention as padding
    ("margin", |s: &mut Style, _: &str| s.margin = Edges::uniform(1)),
    ("margintop", |s: &mut Style, v: &str| set_int(&mut s.margin.top, v)),
    ("marginright", |s: &mut Style, v: &str| set_int(&mut s.margin.right, v)),
    ("marginbottom", |s: &mut Style, v: &str| set_int(&mut s.margin.bottom, v)),
    ("marginleft", |s: &mut Style, v: &str| set_int(&mut s.margin.left, v)),
    // Border
    ("border", |s: &mut Style, v: &str| s.border = BorderKind::parse_or_normal(v)),
    ("borderforeground", |s: &mut Style, v: &str| {
        s.border_foreground = Some(Color::new(v))
    }),
    ("borderbackground", |s: &mut Style, v: &str| {
        s.border_background = Some(Color::new(v))
    }),
    // Dimensions
    ("width", |s: &mut Style, v: &str| set_opt_int(&mut s.width, v)),
    ("height", |s: &mut Style, v: &str| set_opt_int(&mut s.height, v)),
    ("maxwidth", |s: &mut Style, v: &str| set_opt_int(&mut s.max_width, v)),
    ("maxheight", |s: &mut Style, v: &str| set_opt_int(&mut s.max_height, v)),
    // Alignment: unknown values keep the current alignment
    ("align", |s: &mut Style, v: &str| {
        if let Some(align) = Align::parse(v) {
            s.align = align;
        }
    }),
];

/// Resolve `attributes` on top of `base`.
///
/// Table entries are applied in order; within an entry, every attribute whose
/// key matches ignoring ASCII case is applied in key order, so the last one
/// wins. Unknown attributes are ignored.
pub fn resolve(base: &Style, attributes: &Attributes) -> Style {
    let mut style = base.clone();
    for (name, apply) in ATTRIBUTE_TABLE {
        for (key, value) in attributes {
            if key.eq_ignore_ascii_case(name) {
                apply(&mut style, value);
            }
        }
    }
    style
}

/// Resolve a node's style against the sheet default for its kind.
pub fn resolve_node(sheet: &StyleSheet, node: &Node) -> Style {
    resolve(&sheet.base_style(&node.kind), &node.attributes)
}

/// Whether `key` is one of the attributes the resolver understands.
pub fn is_style_attribute(key: &str) -> bool {
    ATTRIBUTE_TABLE
        .iter()
        .any(|(name, _)| key.eq_ignore_ascii_case(name))
}

/// Signed decimal integer clamped to `0..=MAX_DIMENSION`.
fn parse_int(value: &str) -> Option<usize> {
    value
        .parse::<i64>()
        .ok()
        .and_then(|n| usize::try_from(n.max(0)).ok())
        .map(|n| n.min(MAX_DIMENSION))
}

fn set_int(target: &mut usize, value: &str) {
    if let Some(n) = parse_int(value) {
        *target = n;
    }
}

fn set_opt_int(target: &mut Option<usize>, value: &str) {
    if let Some(n) = parse_int(value) {
        *target = Some(n);
    }
}
