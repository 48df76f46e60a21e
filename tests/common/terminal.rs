//! TUI testing utilities using Ratatui's TestBackend
//!
//! Renders the chat panel into a test buffer and converts the output to
//! strings for assertions and snapshots.

use chatpane::ui::app::draw_panel;
use chatpane::ChatView;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

/// Create a test terminal with custom dimensions
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Draw the panel (border, content, footer) into a fresh terminal
pub fn render_panel(view: &ChatView, width: u16, height: u16) -> Terminal<TestBackend> {
    let mut terminal = create_test_terminal_sized(width, height);
    terminal
        .draw(|f| {
            let area = f.area();
            draw_panel(f, area, view);
        })
        .expect("Failed to draw panel");
    terminal
}

/// Convert a buffer to a string, one row per line
///
/// Wide glyphs occupy two cells; the hidden second cell is skipped so the
/// text reads naturally.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut output = String::new();

    for y in area.y..area.y + area.height {
        let mut skip = 0usize;
        for x in area.x..area.x + area.width {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            if let Some(cell) = buffer.cell((x, y)) {
                output.push_str(cell.symbol());
                skip = unicode_width::UnicodeWidthStr::width(cell.symbol()).saturating_sub(1);
            }
        }
        output.push('\n');
    }

    output
}

/// Convert buffer to string, trimming trailing whitespace per line
pub fn buffer_to_trimmed_string(buffer: &Buffer) -> String {
    buffer_to_string(buffer)
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check if the buffer contains a string anywhere
pub fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
    buffer_to_string(buffer).contains(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_buffer_to_string_skips_wide_continuation() {
        let mut terminal = create_test_terminal_sized(10, 1);
        terminal
            .draw(|f| {
                f.render_widget(Paragraph::new("a你b"), f.area());
            })
            .unwrap();

        let output = buffer_to_trimmed_string(terminal.backend().buffer());
        assert_eq!(output, "a你b");
    }
}
