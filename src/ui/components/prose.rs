//! Inline markdown styling for prose lines.
//!
//! Each line is parsed on its own, so a line never changes once the stream
//! has moved past it. Emphasis that a wrap split across two lines stays literal.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};

use super::ansi::paint;
use super::theme::{
    MARKDOWN_BULLET, MARKDOWN_CODE_BG, MARKDOWN_CODE_FG, MARKDOWN_LINK, MARKDOWN_QUOTE_BAR,
    MARKDOWN_QUOTE_TEXT,
};

/// Style the bold, italic, strikethrough, code, link, heading, list and quote
/// markup of one line, dropping the markers.
///
/// Leading indentation is kept as is. Lines that produce no text (rules,
/// link definitions) come back unchanged.
pub fn style_line(line: &str) -> String {
    let body = line.trim_start();
    if body.is_empty() {
        return line.to_string();
    }
    let indent = &line[..line.len() - body.len()];

    let mut out = String::new();
    let mut styles: Vec<Style> = vec![Style::default()];
    let mut list_start: Option<u64> = None;

    for event in Parser::new_ext(body, options()) {
        let current = styles.last().copied().unwrap_or_default();
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { level, .. } => styles.push(heading_style(level)),
                Tag::BlockQuote(_) => {
                    out.push_str(&paint("│ ", Style::default().fg(MARKDOWN_QUOTE_BAR)));
                    styles.push(
                        Style::default()
                            .fg(MARKDOWN_QUOTE_TEXT)
                            .add_modifier(Modifier::ITALIC),
                    );
                }
                Tag::List(start) => list_start = start,
                Tag::Item => {
                    let bullet = match list_start {
                        Some(n) => format!("{n}. "),
                        None => "• ".to_string(),
                    };
                    out.push_str(&paint(&bullet, Style::default().fg(MARKDOWN_BULLET)));
                }
                Tag::Emphasis => styles.push(current.add_modifier(Modifier::ITALIC)),
                Tag::Strong => styles.push(current.add_modifier(Modifier::BOLD)),
                Tag::Strikethrough => styles.push(current.add_modifier(Modifier::CROSSED_OUT)),
                Tag::Link { .. } => styles.push(
                    Style::default()
                        .fg(MARKDOWN_LINK)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                _ => {}
            },
            Event::End(
                TagEnd::Heading(_)
                | TagEnd::BlockQuote(_)
                | TagEnd::Emphasis
                | TagEnd::Strong
                | TagEnd::Strikethrough
                | TagEnd::Link,
            ) => {
                if styles.len() > 1 {
                    styles.pop();
                }
            }
            Event::Text(text) => out.push_str(&paint(&text, current)),
            Event::Code(code) => out.push_str(&paint(
                &format!("`{code}`"),
                Style::default().fg(MARKDOWN_CODE_FG).bg(MARKDOWN_CODE_BG),
            )),
            Event::Html(html) | Event::InlineHtml(html) => {
                out.push_str(&paint(html.trim_end_matches('\n'), current));
            }
            Event::TaskListMarker(checked) => out.push_str(if checked { "[x] " } else { "[ ] " }),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            _ => {}
        }
    }

    if out.is_empty() {
        return line.to_string();
    }
    format!("{indent}{out}")
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        HeadingLevel::H3 => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        HeadingLevel::H4 => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        HeadingLevel::H5 => Style::default().fg(Color::Green),
        HeadingLevel::H6 => Style::default().fg(Color::Gray),
    }
}
