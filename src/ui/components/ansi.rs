//! Helpers for moving between ANSI-styled strings and ratatui cells.
//!
//! The panel's output is a plain `String` with SGR sequences embedded. These
//! helpers strip those sequences for text operations, paint new text with a
//! ratatui [`Style`], and serialize a rendered [`Buffer`] back to styled text.

use std::sync::LazyLock;

use crossterm::{
    style::{Attribute, Color as TermColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    Command,
};
use ratatui::{
    buffer::Buffer,
    style::{Color, Modifier, Style},
};
use regex::Regex;
use unicode_width::UnicodeWidthStr;

/// CSI sequences (SGR and cursor movement) and OSC sequences terminated by BEL or ST.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
        .expect("ANSI escape pattern is valid")
});

/// SGR reset.
pub const RESET: &str = "\x1b[0m";

/// Remove every escape sequence from `s`, leaving only printable text.
pub fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.replace_all(s, "").into_owned()
}

/// Wrap `text` in the SGR sequence for `style`, followed by a reset.
pub fn paint(text: &str, style: Style) -> String {
    if style == Style::default() {
        return text.to_string();
    }
    format!("{}{}{}", sgr(style), text, RESET)
}

/// Style modifiers and the terminal attributes they turn on
const MODIFIER_ATTRIBUTES: [(Modifier, Attribute); 9] = [
    (Modifier::BOLD, Attribute::Bold),
    (Modifier::DIM, Attribute::Dim),
    (Modifier::ITALIC, Attribute::Italic),
    (Modifier::UNDERLINED, Attribute::Underlined),
    (Modifier::SLOW_BLINK, Attribute::SlowBlink),
    (Modifier::RAPID_BLINK, Attribute::RapidBlink),
    (Modifier::REVERSED, Attribute::Reverse),
    (Modifier::HIDDEN, Attribute::Hidden),
    (Modifier::CROSSED_OUT, Attribute::CrossedOut),
];

/// Build the SGR sequences (reset first) for a style.
pub fn sgr(style: Style) -> String {
    let mut out = String::new();
    write_command(&mut out, SetAttribute(Attribute::Reset));

    for (modifier, attribute) in MODIFIER_ATTRIBUTES {
        if style.add_modifier.contains(modifier) {
            write_command(&mut out, SetAttribute(attribute));
        }
    }
    if let Some(fg) = style.fg.and_then(term_color) {
        write_command(&mut out, SetForegroundColor(fg));
    }
    if let Some(bg) = style.bg.and_then(term_color) {
        write_command(&mut out, SetBackgroundColor(bg));
    }

    out
}

fn write_command(out: &mut String, command: impl Command) {
    // Formatting into a String cannot fail
    let _ = command.write_ansi(out);
}

/// ratatui colour to crossterm colour; `None` for the terminal default.
fn term_color(color: Color) -> Option<TermColor> {
    let color = match color {
        Color::Reset => return None,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Indexed(n) => TermColor::AnsiValue(n),
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
    };
    Some(color)
}

/// Serialize each row of `buffer` into a styled line.
///
/// Trailing unstyled blanks are dropped and the cells hidden behind a wide
/// glyph are skipped, so the output columns line up with the buffer columns.
pub fn buffer_to_ansi(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut rows = Vec::with_capacity(area.height as usize);

    for y in area.y..area.y.saturating_add(area.height) {
        let cells: Vec<_> = (area.x..area.x.saturating_add(area.width))
            .filter_map(|x| buffer.cell((x, y)))
            .collect();

        let last_visible = cells
            .iter()
            .rposition(|cell| cell.symbol() != " " || cell_style(cell) != Style::default());

        let mut row = String::new();
        let mut current = Style::default();
        let mut skip = 0usize;

        if let Some(last) = last_visible {
            for cell in &cells[..=last] {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let style = cell_style(cell);
                if style != current {
                    if style == Style::default() {
                        row.push_str(RESET);
                    } else {
                        row.push_str(&sgr(style));
                    }
                    current = style;
                }
                row.push_str(cell.symbol());
                skip = UnicodeWidthStr::width(cell.symbol()).saturating_sub(1);
            }
        }

        if current != Style::default() {
            row.push_str(RESET);
        }
        rows.push(row);
    }

    rows.join("\n")
}

fn cell_style(cell: &ratatui::buffer::Cell) -> Style {
    let mut style = Style::default();
    if cell.fg != Color::Reset {
        style = style.fg(cell.fg);
    }
    if cell.bg != Color::Reset {
        style = style.bg(cell.bg);
    }
    if !cell.modifier.is_empty() {
        style = style.add_modifier(cell.modifier);
    }
    style
}
