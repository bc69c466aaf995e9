use crate::font::ResolvedFont;
use crate::units::Pt;

const TABSIZE: usize = 4;

/// Text broken into lines that each fit a column, along with the space it occupies.
/// Measuring and drawing both work from the same lines, so what is drawn is exactly
/// what was measured.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font: ResolvedFont,
    /// Width of the widest line, rounded up to a whole point
    pub width: Pt,
    /// Height of all lines, rounded up to a whole point
    pub height: Pt,
}

impl TextBlock {
    pub fn layout(text: &str, font: ResolvedFont, max_width: Pt) -> TextBlock {
        let lines = wrap_lines(text, &font, max_width);
        let width = lines
            .iter()
            .map(|line| font.width_of(line))
            .fold(Pt(0.0), Pt::max)
            .ceil();
        let height = (font.line_height() * lines.len() as f32).ceil();
        TextBlock {
            lines,
            font,
            width,
            height,
        }
    }

    /// Distance from the top of the block to the baseline of line `i`
    pub fn baseline(&self, i: usize) -> Pt {
        self.font.ascent() + self.font.line_height() * i as f32
    }
}

/// Height needed to set `text` in `font` without exceeding `max_width`, rounded up to the
/// next whole point
pub fn measure(text: &str, font: &ResolvedFont, max_width: Pt) -> Pt {
    let lines = wrap_lines(text, font, max_width);
    (font.line_height() * lines.len() as f32).ceil()
}

/// Width of the widest line once `text` is wrapped to `max_width`, rounded up
pub fn measure_width(text: &str, font: &ResolvedFont, max_width: Pt) -> Pt {
    wrap_lines(text, font, max_width)
        .iter()
        .map(|line| font.width_of(line))
        .fold(Pt(0.0), Pt::max)
        .ceil()
}

/// Break text into lines no wider than `max_width`.
///
/// Lines break at whitespace, keeping words intact. Newlines always start a new line and
/// tabs count as four spaces. A word that is wider than the column on its own is split
/// between characters, so nothing ever overflows horizontally. Empty text has no lines.
pub fn wrap_lines(text: &str, font: &ResolvedFont, max_width: Pt) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    // replace tabs with spaces
    let text = text.replace('\t', &" ".repeat(TABSIZE));
    // normalize newlines
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let space_width = font.width_of(" ");
    let mut lines: Vec<String> = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = Pt(0.0);

        for word in paragraph.split_whitespace() {
            let word_width = font.width_of(word);
            let candidate = if line.is_empty() {
                word_width
            } else {
                line_width + space_width + word_width
            };

            if candidate <= max_width {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
                line_width = candidate;
                continue;
            }

            // the word doesn't fit after what we have, start a new line
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = Pt(0.0);
            }

            if word_width <= max_width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            // no break point inside the word, force character breaks
            for ch in word.chars() {
                let mut buf = [0u8; 4];
                let char_width = font.width_of(ch.encode_utf8(&mut buf));
                if !line.is_empty() && line_width + char_width > max_width {
                    lines.push(std::mem::take(&mut line));
                    line_width = Pt(0.0);
                }
                line.push(ch);
                line_width += char_width;
            }
        }

        lines.push(line);
    }

    lines
}
