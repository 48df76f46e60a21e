use std::sync::LazyLock;

use ratatui::style::Style;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::as_24_bit_terminal_escaped;

use super::ansi::{paint, RESET};
use super::column_map::{display_width, sanitize_line};
use super::prose::style_line;
use super::theme::CODE_RULE;

// Syntax highlighting resources (loaded once)
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const FENCE: &str = "```";
const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Streaming-safe markdown renderer.
///
/// Tabs expand to tab stops before anything else. Prose lines get their
/// inline markdown styled one line at a time. Fenced code is buffered until its
/// closing fence and then highlighted as a single block; a block still open
/// at the end of the content (mid-stream) is highlighted as far as it goes.
pub struct MarkdownRenderer {
    theme_name: &'static str,
}

/// An open code block collected while scanning.
struct CodeBlock {
    lang: String,
    lines: Vec<String>,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            theme_name: DEFAULT_THEME,
        }
    }

    /// Render `content` to ANSI-styled text. `width` sizes the fence rules.
    pub fn render(&self, content: &str, width: usize) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut block: Option<CodeBlock> = None;

        for line in content.split('\n') {
            let line = sanitize_line(line);
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix(FENCE) {
                match block.take() {
                    Some(open) => {
                        out.extend(self.highlight_block(&open));
                        out.push(closing_rule(width));
                    }
                    None => {
                        let lang = rest.trim().to_string();
                        out.push(opening_rule(&lang, width));
                        block = Some(CodeBlock {
                            lang,
                            lines: Vec::new(),
                        });
                    }
                }
                continue;
            }

            match block.as_mut() {
                Some(open) => open.lines.push(line),
                None => out.push(style_line(&line)),
            }
        }

        // Unterminated fence: still streaming
        if let Some(open) = block {
            out.extend(self.highlight_block(&open));
        }

        out.join("\n")
    }

    fn highlight_block(&self, block: &CodeBlock) -> Vec<String> {
        let syntax = find_syntax(&block.lang);
        let Some(theme) = self.theme() else {
            return block.lines.clone();
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        block
            .lines
            .iter()
            .map(|line| {
                // Feed the newline so multi-line constructs keep their state
                let with_newline = format!("{line}\n");
                match highlighter.highlight_line(&with_newline, &SYNTAX_SET) {
                    Ok(ranges) => {
                        let escaped = as_24_bit_terminal_escaped(&ranges, false);
                        format!("{}{}", escaped.trim_end_matches('\n'), RESET)
                    }
                    Err(e) => {
                        tracing::trace!(error = %e, lang = %block.lang, "Highlight failed, emitting raw line");
                        line.clone()
                    }
                }
            })
            .collect()
    }

    fn theme(&self) -> Option<&'static Theme> {
        THEME_SET
            .themes
            .get(self.theme_name)
            .or_else(|| THEME_SET.themes.values().next())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up a syntax by fence token, falling back to plain text.
fn find_syntax(lang: &str) -> &'static SyntaxReference {
    if lang.is_empty() {
        return SYNTAX_SET.find_syntax_plain_text();
    }
    SYNTAX_SET
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| {
            tracing::trace!(lang, "Unknown fence language, using plain text");
            SYNTAX_SET.find_syntax_plain_text()
        })
}

fn opening_rule(lang: &str, width: usize) -> String {
    let mut text = if lang.is_empty() {
        "───".to_string()
    } else {
        format!("── {lang} ")
    };
    let current = display_width(&text);
    if current < width {
        text.push_str(&"─".repeat(width - current));
    }
    paint(&text, Style::default().fg(CODE_RULE))
}

fn closing_rule(width: usize) -> String {
    paint(&"─".repeat(width.max(3)), Style::default().fg(CODE_RULE))
}
