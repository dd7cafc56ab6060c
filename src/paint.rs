use crossterm::style::{Attribute, ContentStyle};
use textwrap::{wrap, Options, WordSplitter};

use crate::ansi::{balance_sgr, paint, spaces, truncate, visible_width};
use crate::style::{Align, Style, MAX_DIMENSION};

const TAB: &str = "    ";

impl Style {
    /// Apply this style to a block of text.
    ///
    /// Steps run in a fixed order: wrap, emphasis and colors, padding,
    /// height, alignment, border, margins, then max-width/max-height
    /// truncation. Content may already contain escape sequences; styling
    /// left open across a line break is closed and reopened per line.
    ///
    /// Both the wrapped content and the result are clipped to
    /// [`MAX_DIMENSION`] lines and columns.
    pub fn render(&self, content: &str) -> String {
        let content = content.replace('\t', TAB);
        if self.is_plain() {
            return content;
        }

        let text_style = self.text_style();
        let whitespace = self.whitespace_style();

        let mut lines = match self.width {
            Some(width) => wrap_lines(&content, width.saturating_sub(self.padding.horizontal()).max(1)),
            None => content.split('\n').map(str::to_string).collect(),
        };
        clip(&mut lines, MAX_DIMENSION, MAX_DIMENSION);
        balance_sgr(&mut lines);

        for line in lines.iter_mut() {
            *line = paint(line, &text_style);
        }

        self.apply_padding(&mut lines, &whitespace);

        if let Some(height) = self.height {
            while lines.len() < height {
                lines.push(String::new());
            }
        }

        if lines.len() > 1 || self.width.is_some() {
            align_lines(&mut lines, self.align, self.width.unwrap_or(0), &whitespace);
        }

        let lines = self.apply_border(lines);
        let mut lines = self.apply_margins(lines);

        let max_width = self.max_width.unwrap_or(MAX_DIMENSION).min(MAX_DIMENSION);
        let max_height = self.max_height.unwrap_or(MAX_DIMENSION).min(MAX_DIMENSION);
        clip(&mut lines, max_width, max_height);

        lines.join("\n")
    }

    fn text_style(&self) -> ContentStyle {
        let mut style = ContentStyle {
            foreground_color: self.foreground.as_ref().and_then(|c| c.to_terminal()),
            background_color: self.background.as_ref().and_then(|c| c.to_terminal()),
            ..ContentStyle::default()
        };
        let flags = [
            (self.bold, Attribute::Bold),
            (self.italic, Attribute::Italic),
            (self.faint, Attribute::Dim),
            (self.underline, Attribute::Underlined),
            (self.blink, Attribute::SlowBlink),
            (self.reverse, Attribute::Reverse),
            (self.strikethrough, Attribute::CrossedOut),
        ];
        for (enabled, attribute) in flags {
            if enabled {
                style.attributes.set(attribute);
            }
        }
        style
    }

    /// Padding and alignment fill carry the background color.
    fn whitespace_style(&self) -> ContentStyle {
        ContentStyle {
            background_color: self.background.as_ref().and_then(|c| c.to_terminal()),
            ..ContentStyle::default()
        }
    }

    fn border_style(&self) -> ContentStyle {
        ContentStyle {
            foreground_color: self.border_foreground.as_ref().and_then(|c| c.to_terminal()),
            background_color: self.border_background.as_ref().and_then(|c| c.to_terminal()),
            ..ContentStyle::default()
        }
    }

    fn apply_padding(&self, lines: &mut Vec<String>, whitespace: &ContentStyle) {
        let padding = self.padding;
        if padding.left > 0 || padding.right > 0 {
            let left = paint(&spaces(padding.left), whitespace);
            let right = paint(&spaces(padding.right), whitespace);
            for line in lines.iter_mut() {
                *line = format!("{}{}{}", left, line, right);
            }
        }
        if padding.top > 0 {
            let mut padded = vec![String::new(); padding.top];
            padded.append(lines);
            *lines = padded;
        }
        lines.extend(std::iter::repeat(String::new()).take(padding.bottom));
    }

    fn apply_border(&self, lines: Vec<String>) -> Vec<String> {
        let Some(glyphs) = self.border.glyphs() else {
            return lines;
        };
        let style = self.border_style();
        let width = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);

        let mut out = Vec::with_capacity(lines.len() + 2);
        out.push(paint(
            &format!("{}{}{}", glyphs.top_left, glyphs.top.repeat(width), glyphs.top_right),
            &style,
        ));
        let left = paint(glyphs.left, &style);
        let right = paint(glyphs.right, &style);
        for line in lines {
            let fill = spaces(width - visible_width(&line));
            out.push(format!("{}{}{}{}", left, line, fill, right));
        }
        out.push(paint(
            &format!(
                "{}{}{}",
                glyphs.bottom_left,
                glyphs.bottom.repeat(width),
                glyphs.bottom_right
            ),
            &style,
        ));
        out
    }

    fn apply_margins(&self, lines: Vec<String>) -> Vec<String> {
        let margin = self.margin;
        let mut out = Vec::with_capacity(lines.len() + margin.vertical());
        out.extend(std::iter::repeat(String::new()).take(margin.top));
        for line in lines {
            if margin.left > 0 || margin.right > 0 {
                out.push(format!("{}{}{}", spaces(margin.left), line, spaces(margin.right)));
            } else {
                out.push(line);
            }
        }
        out.extend(std::iter::repeat(String::new()).take(margin.bottom));
        out
    }
}

fn clip(lines: &mut Vec<String>, max_width: usize, max_height: usize) {
    lines.truncate(max_height);
    for line in lines.iter_mut() {
        if visible_width(line) > max_width {
            *line = truncate(line, max_width);
        }
    }
}

/// Word-wrap every line of `content` to `width` columns.
fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    let options = Options::new(width).word_splitter(WordSplitter::NoHyphenation);
    content
        .split('\n')
        .flat_map(|line| {
            wrap(line, &options)
                .into_iter()
                .map(|l| l.into_owned())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Pad every line to the width of the widest line (or `width` if larger).
fn align_lines(lines: &mut [String], align: Align, width: usize, whitespace: &ContentStyle) {
    let widest = lines
        .iter()
        .map(|l| visible_width(l))
        .max()
        .unwrap_or(0)
        .max(width);

    for line in lines.iter_mut() {
        let short = widest - visible_width(line);
        if short == 0 {
            continue;
        }
        *line = match align {
            Align::Left => format!("{}{}", line, paint(&spaces(short), whitespace)),
            Align::Right => format!("{}{}", paint(&spaces(short), whitespace), line),
            Align::Center => {
                let left = short / 2;
                let right = short - left;
                format!(
                    "{}{}{}",
                    paint(&spaces(left), whitespace),
                    line,
                    paint(&spaces(right), whitespace)
                )
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi;
    use crate::style::{BorderKind, Color, Edges};
    use crossterm::style::Stylize;
    use pretty_assertions::assert_eq;

    fn plain(rendered: &str) -> String {
        strip_ansi(rendered)
    }

    #[test]
    fn test_plain_style_is_identity() {
        assert_eq!(Style::new().render("Hi\nthere"), "Hi\nthere");
        assert_eq!(Style::new().render(""), "");
    }

    #[test]
    fn test_tabs_become_spaces() {
        assert_eq!(Style::new().render("a\tb"), "a    b");
    }

    #[test]
    fn test_bold_matches_crossterm_output() {
        let style = Style {
            bold: true,
            ..Style::default()
        };
        assert_eq!(style.render("Hi"), "Hi".bold().to_string());
    }

    #[test]
    fn test_each_line_is_styled_separately() {
        let style = Style {
            italic: true,
            ..Style::default()
        };
        // the short line is padded to the widest one, outside the styled span
        assert_eq!(style.render("a\nbb"), format!("{} \n{}", "a".italic(), "bb".italic()));
    }

    #[test]
    fn test_padding() {
        let style = Style {
            padding: Edges {
                top: 1,
                right: 2,
                bottom: 1,
                left: 1,
            },
            ..Style::default()
        };
        assert_eq!(style.render("Hi"), "     \n Hi  \n     ");
    }

    #[test]
    fn test_normal_border() {
        let style = Style {
            border: BorderKind::Normal,
            ..Style::default()
        };
        assert_eq!(style.render("Hi"), "┌──┐\n│Hi│\n└──┘");
    }

    #[test]
    fn test_rounded_border_pads_short_lines() {
        let style = Style {
            border: BorderKind::Rounded,
            ..Style::default()
        };
        assert_eq!(style.render("abc\nd"), "╭───╮\n│abc│\n│d  │\n╰───╯");
    }

    #[test]
    fn test_double_and_thick_borders() {
        let double = Style {
            border: BorderKind::Double,
            ..Style::default()
        };
        assert_eq!(double.render("x"), "╔═╗\n║x║\n╚═╝");
        let thick = Style {
            border: BorderKind::Thick,
            ..Style::default()
        };
        assert_eq!(thick.render("x"), "┏━┓\n┃x┃\n┗━┛");
    }

    #[test]
    fn test_hidden_border_keeps_geometry() {
        let style = Style {
            border: BorderKind::Hidden,
            ..Style::default()
        };
        assert_eq!(style.render("x"), "   \n x \n   ");
    }

    #[test]
    fn test_border_colors_only_touch_the_frame() {
        let style = Style {
            border: BorderKind::Normal,
            border_foreground: Some(Color::new("red")),
            ..Style::default()
        };
        let rendered = style.render("x");
        assert_eq!(plain(&rendered), "┌─┐\n│x│\n└─┘");
        assert!(rendered.contains(&"┌─┐".red().to_string()));
        assert!(rendered.contains(&format!("{}x{}", "│".red(), "│".red())));
    }

    #[test]
    fn test_width_wraps_and_pads() {
        let style = Style {
            width: Some(5),
            ..Style::default()
        };
        assert_eq!(style.render("aa bb cc"), "aa bb\ncc   ");
    }

    #[test]
    fn test_width_counts_padding() {
        let style = Style {
            width: Some(6),
            padding: Edges {
                left: 1,
                right: 1,
                ..Edges::default()
            },
            ..Style::default()
        };
        assert_eq!(style.render("aa bb"), " aa   \n bb   ");
    }

    #[test]
    fn test_alignment() {
        let center = Style {
            width: Some(6),
            align: Align::Center,
            ..Style::default()
        };
        assert_eq!(center.render("ab"), "  ab  ");

        let right = Style {
            width: Some(5),
            align: Align::Right,
            ..Style::default()
        };
        assert_eq!(right.render("ab"), "   ab");
    }

    #[test]
    fn test_height_adds_blank_lines() {
        let style = Style {
            height: Some(3),
            ..Style::default()
        };
        assert_eq!(style.render("ab"), "ab\n  \n  ");
    }

    #[test]
    fn test_margins_wrap_the_border() {
        let style = Style {
            border: BorderKind::Normal,
            margin: Edges {
                top: 1,
                left: 2,
                ..Edges::default()
            },
            ..Style::default()
        };
        assert_eq!(style.render("x"), "\n  ┌─┐\n  │x│\n  └─┘");
    }

    #[test]
    fn test_max_width_and_max_height() {
        let style = Style {
            max_width: Some(3),
            max_height: Some(2),
            ..Style::default()
        };
        assert_eq!(style.render("abcdef\nghijkl\nmnopqr"), "abc\nghi");
    }

    #[test]
    fn test_background_fills_padding() {
        let style = Style {
            background: Some(Color::new("blue")),
            padding: Edges {
                left: 1,
                ..Edges::default()
            },
            ..Style::default()
        };
        let rendered = style.render("x");
        assert_eq!(rendered, format!("{}{}", " ".on_blue(), "x".on_blue()));
    }

    #[test]
    fn test_unknown_color_paints_nothing() {
        let style = Style {
            foreground: Some(Color::new("chartreuse-ish")),
            ..Style::default()
        };
        assert_eq!(style.render("x"), "x");
    }

    #[test]
    fn test_wrapped_child_styling_is_closed_per_line() {
        let styled = "hello world foo bar".red().bold().to_string();
        let open = styled.split("hello").next().unwrap();
        let close = styled.rsplit("bar").next().unwrap();
        let style = Style {
            width: Some(8),
            ..Style::default()
        };
        let rendered = style.render(&styled);
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(
            lines,
            vec![
                format!("{}hello\x1b[0m   ", open),
                format!("{}world\x1b[0m   ", open),
                format!("{}foo bar{} ", open, close),
            ]
        );
    }

    #[test]
    fn test_border_after_wrap_is_unstyled() {
        let styled = "aa bb".red().to_string();
        let style = Style {
            width: Some(2),
            border: BorderKind::Normal,
            ..Style::default()
        };
        let rendered = style.render(&styled);
        assert_eq!(plain(&rendered), "┌──┐\n│aa│\n│bb│\n└──┘");
        for line in rendered.split('\n').skip(1).take(2) {
            assert!(line.ends_with("\x1b[0m│"), "border inherits styling: {:?}", line);
        }
    }

    #[test]
    fn test_huge_dimensions_are_clipped() {
        let style = Style {
            padding: Edges {
                top: MAX_DIMENSION,
                left: MAX_DIMENSION,
                ..Edges::default()
            },
            ..Style::default()
        };
        let rendered = style.render("x");
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(lines.len(), MAX_DIMENSION);
        assert!(lines.iter().all(|l| visible_width(l) <= MAX_DIMENSION));
    }

    #[test]
    fn test_long_content_is_clipped() {
        let style = Style {
            bold: true,
            ..Style::default()
        };
        let content = "x".repeat(MAX_DIMENSION + 10);
        assert_eq!(plain(&style.render(&content)).len(), MAX_DIMENSION);
    }

    #[test]
    fn test_empty_content_with_border() {
        let style = Style {
            border: BorderKind::Normal,
            ..Style::default()
        };
        assert_eq!(style.render(""), "┌┐\n││\n└┘");
    }
}
