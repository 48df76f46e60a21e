//! Integration tests for the host application
//!
//! Drives `App` with synthetic terminal input and backend events, draws it
//! into a TestBackend and records clipboard writes instead of touching the
//! desktop.

use std::sync::Arc;
use std::time::Duration;

use chatpane::backend::DEMO_SCRIPT;
use chatpane::ui::clipboard::ClipboardSink;
use chatpane::ui::AppEvent;
use chatpane::{App, BackendEvent, Config};
use chrono::Utc;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::TestBackend, Terminal};

use super::common::panel::RecordingClipboard;
use super::common::terminal::{buffer_contains, create_test_terminal_sized};

fn app_with(clipboard: Arc<RecordingClipboard>) -> App {
    let sink: Arc<dyn ClipboardSink> = clipboard;
    App::new(Config::default(), DEMO_SCRIPT.to_string()).with_clipboard(sink)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> AppEvent {
    AppEvent::Input(Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }))
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Input(Event::Key(KeyEvent::from(code)))
}

fn draw(app: &mut App, terminal: &mut Terminal<TestBackend>) {
    terminal.draw(|f| app.draw(f)).expect("draw");
}

/// Stream `text` as a complete assistant reply
fn reply(app: &mut App, text: &str) {
    app.handle_app_event(AppEvent::Backend(BackendEvent::Text(text.to_string())));
    app.handle_app_event(AppEvent::Backend(BackendEvent::Finished));
    app.handle_app_event(AppEvent::BackendEnded);
}

/// Poll the event channel until `done` holds or a second passes
async fn settle(app: &mut App, done: impl Fn(&App) -> bool) {
    for _ in 0..100 {
        app.process_pending();
        if done(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_drag_copies_through_both_clipboards() {
    let clipboard = RecordingClipboard::new();
    let mut app = app_with(Arc::clone(&clipboard));
    let mut terminal = create_test_terminal_sized(40, 12);
    draw(&mut app, &mut terminal);

    reply(&mut app, "hello world");
    draw(&mut app, &mut terminal);
    assert!(buffer_contains(terminal.backend().buffer(), "hello world"));

    // Row 0 is the border, row 1 the label, row 2 the reply body
    app.handle_app_event(mouse(MouseEventKind::Down(MouseButton::Left), 1, 2));
    app.handle_app_event(mouse(MouseEventKind::Drag(MouseButton::Left), 6, 2));
    app.handle_app_event(mouse(MouseEventKind::Up(MouseButton::Left), 6, 2));

    assert_eq!(clipboard.terminal_writes(), vec!["hello".to_string()]);
    settle(&mut app, |_| !clipboard.native_writes().is_empty()).await;
    assert_eq!(clipboard.native_writes(), vec!["hello".to_string()]);

    draw(&mut app, &mut terminal);
    assert!(buffer_contains(terminal.backend().buffer(), "Copied 5 characters"));
}

#[tokio::test]
async fn test_native_clipboard_failure_shows_notice() {
    let clipboard = RecordingClipboard::failing("no display");
    let mut app = app_with(Arc::clone(&clipboard));
    let mut terminal = create_test_terminal_sized(60, 12);
    draw(&mut app, &mut terminal);
    reply(&mut app, "copy this");

    app.handle_app_event(mouse(MouseEventKind::Down(MouseButton::Left), 1, 2));
    app.handle_app_event(mouse(MouseEventKind::Up(MouseButton::Left), 5, 2));
    assert_eq!(clipboard.terminal_writes(), vec!["copy".to_string()]);

    settle(&mut app, |app| {
        app.chat_view()
            .notice(Utc::now())
            .is_some_and(|n| n.starts_with("Clipboard unavailable"))
    })
    .await;

    let notice = app.chat_view().notice(Utc::now()).map(str::to_string);
    assert!(
        notice.as_deref().is_some_and(|n| n.contains("no display")),
        "{notice:?}"
    );
}

#[tokio::test]
async fn test_click_outside_panel_is_ignored() {
    let clipboard = RecordingClipboard::new();
    let mut app = app_with(clipboard);
    let mut terminal = create_test_terminal_sized(40, 12);
    draw(&mut app, &mut terminal);
    reply(&mut app, "text");

    // Bottom row is the footer
    app.handle_app_event(mouse(MouseEventKind::Down(MouseButton::Left), 3, 11));
    assert!(app.chat_view().selection().start_pos().is_none());
}

#[tokio::test]
async fn test_wheel_scrolls_three_lines() {
    let clipboard = RecordingClipboard::new();
    let mut app = app_with(clipboard);
    let mut terminal = create_test_terminal_sized(40, 10);
    draw(&mut app, &mut terminal);

    let long: String = (0..30).map(|i| format!("line {i}\n\n")).collect();
    reply(&mut app, &long);
    draw(&mut app, &mut terminal);
    let bottom = app.chat_view().viewport().y_offset();
    assert!(bottom > 3);

    app.handle_app_event(mouse(MouseEventKind::ScrollUp, 5, 5));
    assert_eq!(app.chat_view().viewport().y_offset(), bottom - 3);

    app.handle_app_event(mouse(MouseEventKind::ScrollDown, 5, 5));
    assert!(app.chat_view().viewport().at_bottom());
}

#[tokio::test]
async fn test_resize_reflows_panel() {
    let clipboard = RecordingClipboard::new();
    let mut app = app_with(clipboard);

    let mut terminal = create_test_terminal_sized(40, 12);
    draw(&mut app, &mut terminal);
    assert_eq!(app.chat_view().viewport().width(), 38);
    assert_eq!(app.chat_view().viewport().height(), 9);

    let mut terminal = create_test_terminal_sized(80, 24);
    draw(&mut app, &mut terminal);
    assert_eq!(app.chat_view().viewport().width(), 78);
    assert_eq!(app.chat_view().viewport().height(), 21);
}

#[tokio::test]
async fn test_enter_boots_container_once() {
    let clipboard = RecordingClipboard::new();
    let mut app = app_with(clipboard);
    let mut terminal = create_test_terminal_sized(80, 12);
    draw(&mut app, &mut terminal);

    app.handle_app_event(key(KeyCode::Enter));
    assert!(app.chat_view().indicator().is_container_initializing());
    draw(&mut app, &mut terminal);
    assert!(buffer_contains(
        terminal.backend().buffer(),
        "Initializing container…"
    ));

    // A second Enter while the first request is in flight does nothing
    app.handle_app_event(key(KeyCode::Enter));
    assert!(app.chat_view().is_empty());

    app.handle_app_event(AppEvent::ContainerReady);
    assert!(!app.chat_view().indicator().is_container_initializing());
    assert!(app.chat_view().indicator().is_waiting());
    assert_eq!(app.chat_view().len(), 1);
}

#[tokio::test]
async fn test_quit_keys() {
    let clipboard = RecordingClipboard::new();
    let mut app = app_with(Arc::clone(&clipboard));
    app.handle_app_event(key(KeyCode::Char('x')));
    assert!(!app.should_quit());
    app.handle_app_event(key(KeyCode::Char('q')));
    assert!(app.should_quit());

    let mut app = app_with(clipboard);
    app.handle_app_event(AppEvent::Input(Event::Key(KeyEvent::new(
        KeyCode::Char('q'),
        KeyModifiers::CONTROL,
    ))));
    assert!(app.should_quit());
}
