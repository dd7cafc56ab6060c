use crossterm::style::Color as TermColor;
use regex::Regex;
use std::sync::OnceLock;

/// A color exactly as written in a document.
///
/// Interpretation is deferred to paint time; a value the terminal cannot
/// express paints nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Terminal color for this value: an ANSI-256 index (`"0"`-`"255"`), a hex
    /// code (`#rgb` or `#rrggbb`), or a named color such as `red` or `dark_blue`.
    pub fn to_terminal(&self) -> Option<TermColor> {
        let value = self.0.trim();

        if let Ok(index) = value.parse::<u8>() {
            return Some(TermColor::AnsiValue(index));
        }

        static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
        let hex_regex = HEX_COLOR_REGEX
            .get_or_init(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());
        if hex_regex.is_match(value) {
            return parse_hex(&value[1..]);
        }

        TermColor::try_from(value.to_ascii_lowercase().as_str()).ok()
    }
}

fn parse_hex(digits: &str) -> Option<TermColor> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    if digits.len() == 3 {
        let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
        Some(TermColor::Rgb {
            r: expand(0)?,
            g: expand(1)?,
            b: expand(2)?,
        })
    } else {
        Some(TermColor::Rgb {
            r: channel(&digits[0..2])?,
            g: channel(&digits[2..4])?,
            b: channel(&digits[4..6])?,
        })
    }
}

/// Largest size, in columns or lines, any dimension of a styled block may
/// take. Numeric attributes are clamped to it and painted blocks are clipped
/// to it.
pub const MAX_DIMENSION: usize = 1024;

/// Spacing on the four sides of a block, in terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl Edges {
    pub const fn uniform(n: usize) -> Self {
        Self {
            top: n,
            right: n,
            bottom: n,
            left: n,
        }
    }

    pub fn horizontal(&self) -> usize {
        self.left + self.right
    }

    pub fn vertical(&self) -> usize {
        self.top + self.bottom
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorderKind {
    #[default]
    None,
    Normal,
    Rounded,
    Double,
    Thick,
    Hidden,
}

impl BorderKind {
    /// Parse a border name. Unknown names fall back to [`BorderKind::Normal`]
    /// instead of leaving the block unbordered.
    pub fn parse_or_normal(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "rounded" => BorderKind::Rounded,
            "double" => BorderKind::Double,
            "thick" => BorderKind::Thick,
            "hidden" => BorderKind::Hidden,
            _ => BorderKind::Normal,
        }
    }

    pub fn glyphs(&self) -> Option<&'static BorderGlyphs> {
        match self {
            BorderKind::None => None,
            BorderKind::Normal => Some(&NORMAL),
            BorderKind::Rounded => Some(&ROUNDED),
            BorderKind::Double => Some(&DOUBLE),
            BorderKind::Thick => Some(&THICK),
            BorderKind::Hidden => Some(&HIDDEN),
        }
    }
}

/// Box-drawing characters for one border kind.
#[derive(Debug, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top: &'static str,
    pub bottom: &'static str,
    pub left: &'static str,
    pub right: &'static str,
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
}

const NORMAL: BorderGlyphs = BorderGlyphs {
    top: "─",
    bottom: "─",
    left: "│",
    right: "│",
    top_left: "┌",
    top_right: "┐",
    bottom_left: "└",
    bottom_right: "┘",
};

const ROUNDED: BorderGlyphs = BorderGlyphs {
    top_left: "╭",
    top_right: "╮",
    bottom_left: "╰",
    bottom_right: "╯",
    ..NORMAL
};

const DOUBLE: BorderGlyphs = BorderGlyphs {
    top: "═",
    bottom: "═",
    left: "║",
    right: "║",
    top_left: "╔",
    top_right: "╗",
    bottom_left: "╚",
    bottom_right: "╝",
};

const THICK: BorderGlyphs = BorderGlyphs {
    top: "━",
    bottom: "━",
    left: "┃",
    right: "┃",
    top_left: "┏",
    top_right: "┓",
    bottom_left: "┗",
    bottom_right: "┛",
};

const HIDDEN: BorderGlyphs = BorderGlyphs {
    top: " ",
    bottom: " ",
    left: " ",
    right: " ",
    top_left: " ",
    top_right: " ",
    bottom_left: " ",
    bottom_right: " ",
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" => Some(Align::Right),
            _ => None,
        }
    }
}

/// Fully resolved presentation of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    // Emphasis
    pub bold: bool,
    pub italic: bool,
    pub faint: bool,
    pub underline: bool,
    pub blink: bool,
    pub reverse: bool,
    pub strikethrough: bool,

    // Colors
    pub foreground: Option<Color>,
    pub background: Option<Color>,

    // Spacing
    pub padding: Edges,
    pub margin: Edges,

    // Border
    pub border: BorderKind,
    pub border_foreground: Option<Color>,
    pub border_background: Option<Color>,

    // Dimensions
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub max_width: Option<usize>,
    pub max_height: Option<usize>,

    pub align: Align,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when rendering through this style leaves content untouched.
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }
}
