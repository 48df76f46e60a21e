//! Integration tests for the streaming reply lifecycle
//!
//! Drives a scripted backend through the chat panel and checks what ends up
//! on screen via TestBackend.

use chatpane::backend::{ScriptBuilder, ScriptedBackend};
use chatpane::ui::components::{ChatMessage, PendingPermission, StreamStats};
use chatpane::ui::{PanelEvent, TickKind};
use chatpane::BackendEvent;

use super::common::panel::{at_ms, panel, plain_view, t0};
use super::common::terminal::{buffer_contains, buffer_to_trimmed_string, render_panel};

fn reply_script() -> Vec<BackendEvent> {
    let mut final_stats = StreamStats::new()
        .with_tokens(1200, 1500)
        .with_cache(3600, 0)
        .with_duration_ms(4000);
    final_stats.add_model("claude-sonnet", 1200);
    final_stats.add_model("claude-haiku", 300);

    ScriptBuilder::new()
        .text("Counting ")
        .text("words:\n")
        .subagent("claude-haiku")
        .text("```sh\nwc -w file.txt\n```")
        .stats(StreamStats::new().with_tokens(1200, 1400).with_cache(300, 0))
        .subagent("")
        .stats(final_stats)
        .finished()
        .build()
}

#[test]
fn test_panel_renders_transcript_in_frame() {
    let mut view = panel(30, 8);
    view.push(ChatMessage::user("hi"), t0());
    view.push(ChatMessage::assistant("hello"), t0());

    let terminal = render_panel(&view, 30, 9);
    let output = buffer_to_trimmed_string(terminal.backend().buffer());
    insta::assert_snapshot!(output, @r"
    ┌ chatpane ──────────────────┐
    │You                         │
    │hi                          │
    │                            │
    │Assistant                   │
    │hello                       │
    │                            │
    └────────────────────────────┘
    Enter ask · drag / double / tr
    ");
}

#[test]
fn test_scripted_reply_streams_into_panel() {
    let mut view = panel(100, 24);
    view.submit("How do I count words?", t0());
    assert!(plain_view(&view).ends_with("* Thinking… (esc to interrupt · 0s)"));

    let mut events = reply_script().into_iter();

    // First chunk switches the status from waiting to streaming
    let first = events.next().map(PanelEvent::from);
    view.handle(first.expect("script has text"), at_ms(500));
    assert_eq!(view.streaming_buffer(), Some("Counting "));
    assert!(view.indicator().is_streaming());

    for event in events.by_ref().take(4) {
        view.handle(event.into(), at_ms(12_000));
    }
    let screen = plain_view(&view);
    assert!(screen.contains("── sh "), "{screen}");
    assert!(screen.contains("wc -w file.txt"), "{screen}");
    assert!(
        screen.ends_with(
            "* Thinking… [claude-haiku] working (esc to interrupt · 12s · ↓ 1.4k tokens · 300 cached)"
        ),
        "{screen}"
    );

    let mut effects = Vec::new();
    for event in events {
        effects.extend(view.handle(event.into(), at_ms(12_500)));
    }

    assert!(view.streaming_buffer().is_none());
    assert_eq!(view.len(), 2);
    assert!(effects
        .iter()
        .filter_map(|e| e.scheduled_tick())
        .any(|t| t.kind == TickKind::CompletionFlash));

    let screen = plain_view(&view);
    assert!(
        screen.ends_with(
            "✓ 1.5k tokens · cache: 75% · claude-sonnet: 1.2k, claude-haiku: 300 · 4s"
        ),
        "{screen}"
    );
    assert!(!screen.contains("Thinking"));
}

#[test]
fn test_completion_line_disappears_after_flash() {
    let mut view = panel(60, 12);
    view.submit("q", t0());
    view.handle(PanelEvent::AppendText("done".into()), t0());
    view.handle(
        PanelEvent::Stats(StreamStats::new().with_tokens(5, 42)),
        t0(),
    );
    let effects = view.handle(PanelEvent::StreamFinished, t0());
    let mut tick = effects
        .iter()
        .find_map(|e| e.scheduled_tick())
        .expect("completion flash scheduled");

    assert!(plain_view(&view).ends_with("✓ 42 tokens"));

    // Each tick schedules the next until the flash is over
    let mut rounds = 0;
    loop {
        let next = view.handle(PanelEvent::Tick(tick), t0());
        rounds += 1;
        match next.first().and_then(|e| e.scheduled_tick()) {
            Some(t) => tick = t,
            None => break,
        }
        assert!(rounds < 10, "flash never ended");
    }

    assert!(plain_view(&view).ends_with("Assistant\ndone"));
}

#[test]
fn test_stale_spinner_tick_is_dropped() {
    let mut view = panel(60, 12);
    let effects = view.submit("first", t0());
    let stale = effects[0].scheduled_tick().expect("spinner tick");

    // A new waiting period starts a new epoch
    view.set_waiting(false, None, t0());
    let effects = view.set_waiting(true, None, t0());
    let fresh = effects[0].scheduled_tick().expect("spinner tick");
    assert_ne!(stale.epoch, fresh.epoch);

    assert!(view.handle(PanelEvent::Tick(stale), t0()).is_empty());
    assert_eq!(view.handle(PanelEvent::Tick(fresh), t0()).len(), 1);
}

#[test]
fn test_spinner_tick_advances_frame_on_screen() {
    let mut view = panel(60, 12);
    let effects = view.set_waiting(true, None, t0());
    let tick = effects[0].scheduled_tick().expect("spinner tick");
    assert!(plain_view(&view).starts_with("* Thinking…"));

    view.handle(PanelEvent::Tick(tick), t0());
    assert!(plain_view(&view).starts_with("+ Thinking…"));
}

#[test]
fn test_container_boot_then_reply() {
    let mut view = panel(80, 12);
    let effects = view.set_container_initializing(true, None, t0());
    assert_eq!(effects.len(), 1);

    let screen = plain_view(&view);
    assert!(screen.starts_with("* Initializing container… (0s) "), "{screen}");
    assert!(screen.ends_with(" 0%"), "{screen}");

    view.set_container_initializing(false, None, at_ms(2500));
    assert_eq!(plain_view(&view), "");

    view.submit("go", at_ms(2500));
    assert!(plain_view(&view).contains("Thinking…"));
}

#[test]
fn test_permission_prompt_rendered_under_reply() {
    let mut view = panel(60, 16);
    view.push(ChatMessage::user("clean up"), t0());
    view.set_permission(
        Some(PendingPermission::new("Bash", "rm -rf target")),
        t0(),
    );

    let terminal = render_panel(&view, 60, 17);
    let buffer = terminal.backend().buffer();
    assert!(buffer_contains(buffer, "⚠ Permission required: Bash"));
    assert!(buffer_contains(buffer, "  rm -rf target"));
}

#[test]
fn test_long_transcript_stays_pinned_to_tail() {
    let mut view = panel(40, 8);
    for i in 0..10 {
        view.push(ChatMessage::user(format!("message {i}")), t0());
    }
    assert!(view.viewport().at_bottom());
    assert!(plain_view(&view).ends_with("message 9"));

    let terminal = render_panel(&view, 40, 9);
    let buffer = terminal.backend().buffer();
    assert!(buffer_contains(buffer, "message 9"));
    assert!(!buffer_contains(buffer, "message 0"));
}

#[tokio::test]
async fn test_reply_from_markdown_round_trips_through_backend() {
    let reply = "Here you go:\n\n```rust\nlet n = text.split_whitespace().count();\n```\n";
    let backend = ScriptedBackend::from_reply(reply, std::time::Duration::ZERO);
    let mut rx = backend.start();

    let mut view = panel(80, 30);
    view.submit("count", t0());
    while let Some(event) = rx.recv().await {
        view.handle(event.into(), t0());
    }

    let last = view.messages().last().expect("assistant message");
    assert_eq!(last.content, reply);
    let screen = plain_view(&view);
    assert!(screen.contains("let n = text.split_whitespace().count();"));
    assert!(screen.contains("── rust "));
}
