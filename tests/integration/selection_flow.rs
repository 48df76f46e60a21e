//! Integration tests for mouse selection over rendered chat content
//!
//! Positions are panel cells: the border takes column 0 and row 0, so
//! viewport cell (col, line) sits at panel cell (col + 1, line + 1).

use chatpane::ui::components::ansi::strip_ansi;
use chatpane::ui::components::{CellPos, ChatMessage};
use chatpane::ui::{PanelEvent, TickKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::common::panel::{copied_text, drag, multi_click, panel, plain_view, t0};

const SELECTED_BG: &str = "48;2;40;60;80";
const FLASH_BG: &str = "48;2;255;180;80";

#[test]
fn test_double_click_copies_identifier_in_code_block() {
    let mut view = panel(60, 20);
    view.push(
        ChatMessage::assistant("```rust\nlet total = count_words(text);\n```"),
        t0(),
    );
    // Line 0 label, line 1 opening rule, line 2 the code
    assert_eq!(
        plain_view(&view).lines().nth(2),
        Some("let total = count_words(text);")
    );

    let effects = multi_click(&mut view, 1 + 15, 1 + 2, 2);
    assert_eq!(copied_text(&effects), Some("count_words"));
    assert_eq!(view.selection().start_pos(), Some(CellPos::new(12, 2)));
    assert_eq!(view.selection().end_pos(), Some(CellPos::new(23, 2)));
    assert!(!view.selection().is_active());
    assert_eq!(view.notice(t0()), Some("Copied 11 characters"));

    // Copy flash paints the flash palette until its ticks run out
    let rendered = view.view();
    assert!(rendered.contains(FLASH_BG), "{rendered:?}");
    assert!(strip_ansi(&rendered).contains("let total = count_words(text);"));
}

#[test]
fn test_copy_flash_settles_into_selection_palette() {
    let mut view = panel(40, 10);
    view.push(ChatMessage::user("alpha beta"), t0());

    let effects = multi_click(&mut view, 1 + 7, 1 + 1, 2);
    assert_eq!(copied_text(&effects), Some("beta"));
    let mut tick = effects
        .iter()
        .find_map(|e| e.scheduled_tick())
        .expect("flash tick");
    assert_eq!(tick.kind, TickKind::CopyFlash);

    while let Some(next) = view
        .handle(PanelEvent::Tick(tick), t0())
        .first()
        .and_then(|e| e.scheduled_tick())
    {
        tick = next;
    }

    assert!(!view.selection().is_flashing());
    let rendered = view.view();
    assert!(rendered.contains(SELECTED_BG));
    assert!(!rendered.contains(FLASH_BG));
}

#[test]
fn test_triple_click_copies_paragraph() {
    let mut view = panel(60, 20);
    view.push(
        ChatMessage::assistant("Intro sentence.\n\nFirst line\nsecond line\n\nOutro"),
        t0(),
    );
    // Lines: Assistant, Intro sentence., "", First line, second line, "", Outro
    let effects = multi_click(&mut view, 1 + 3, 1 + 4, 3);
    assert_eq!(copied_text(&effects), Some("First line\nsecond line"));
    assert_eq!(view.selection().start_pos(), Some(CellPos::new(0, 3)));
    assert_eq!(view.selection().end_pos(), Some(CellPos::new(11, 4)));
}

#[test]
fn test_fourth_click_starts_over() {
    let mut view = panel(60, 20);
    view.push(ChatMessage::user("one two"), t0());

    let effects = multi_click(&mut view, 2, 2, 4);
    assert!(copied_text(&effects).is_none());
    assert!(!view.selection().has_text_selection());
    assert_eq!(view.selection().start_pos(), Some(CellPos::new(1, 1)));
}

#[test]
fn test_double_click_past_line_end_keeps_selection() {
    let mut view = panel(40, 10);
    view.push(ChatMessage::user("short"), t0());

    let effects = multi_click(&mut view, 1 + 20, 1 + 1, 2);
    assert!(copied_text(&effects).is_none());
    assert!(!view.selection().has_text_selection());
}

#[test]
fn test_drag_over_wide_glyphs_copies_whole_clusters() {
    let mut view = panel(40, 10);
    view.push(ChatMessage::user("你好世界 hi"), t0());

    // Columns 2..6 cover 好 and 世 exactly
    let effects = drag(&mut view, (1 + 2, 2), (1 + 6, 2));
    assert_eq!(copied_text(&effects), Some("好世"));

    // Starting or ending inside a glyph takes the whole glyph
    view.handle(PanelEvent::Key(KeyEvent::from(KeyCode::Esc)), t0());
    let effects = drag(&mut view, (1 + 3, 2), (1 + 5, 2));
    assert_eq!(copied_text(&effects), Some("好世"));
}

#[test]
fn test_double_click_on_tab_indented_code() {
    let mut view = panel(60, 20);
    view.push(
        ChatMessage::assistant("```go\nfunc main() {\n\tcount := 1\n}\n```"),
        t0(),
    );
    // Tabs are laid out as spaces, so columns match what the terminal shows
    assert_eq!(plain_view(&view).lines().nth(3), Some("    count := 1"));
    assert!(!view.view().contains('\t'));

    let effects = multi_click(&mut view, 1 + 5, 1 + 3, 2);
    assert_eq!(copied_text(&effects), Some("count"));
    assert_eq!(view.selection().start_pos(), Some(CellPos::new(4, 3)));
    assert_eq!(view.selection().end_pos(), Some(CellPos::new(9, 3)));
}

#[test]
fn test_backwards_drag_across_lines() {
    let mut view = panel(40, 10);
    view.push(ChatMessage::user("first line\nsecond line"), t0());

    // From "line" on row 2 back to "line" on row 1
    let effects = drag(&mut view, (1 + 6, 1 + 2), (1 + 6, 1 + 1));
    assert_eq!(copied_text(&effects), Some("line\nsecond"));
}

#[test]
fn test_drag_below_content_clamps_to_viewport() {
    let mut view = panel(40, 6);
    view.push(ChatMessage::user("top"), t0());

    view.handle(
        PanelEvent::MouseDown {
            x: 1,
            y: 1,
            at: std::time::Instant::now(),
        },
        t0(),
    );
    view.handle(PanelEvent::MouseDrag { x: 200, y: 200 }, t0());
    assert_eq!(view.selection().end_pos(), Some(CellPos::new(38, 3)));
}

#[test]
fn test_manual_copy_with_y_and_ctrl_c() {
    let mut view = panel(40, 10);
    view.push(ChatMessage::user("copy me"), t0());
    drag(&mut view, (1, 2), (1 + 4, 2));

    let effects = view.handle(PanelEvent::Key(KeyEvent::from(KeyCode::Char('y'))), t0());
    assert_eq!(copied_text(&effects), Some("copy"));

    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    let effects = view.handle(PanelEvent::Key(ctrl_c), t0());
    assert_eq!(copied_text(&effects), Some("copy"));
}

#[test]
fn test_copy_without_selection_does_nothing() {
    let mut view = panel(40, 10);
    view.push(ChatMessage::user("nothing selected"), t0());
    let effects = view.handle(PanelEvent::Key(KeyEvent::from(KeyCode::Char('y'))), t0());
    assert!(effects.is_empty());
    assert_eq!(view.notice(t0()), None);
}
