//! Deterministic panel fixtures
//!
//! A fixed clock, a panel with a fixed verb and single-step spinner, a
//! clipboard sink that records writes, and mouse gesture helpers that speak
//! in panel cells.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chatpane::ui::clipboard::{ClipboardError, ClipboardSink};
use chatpane::ui::components::ansi::strip_ansi;
use chatpane::ui::components::{FixedVerb, PanelConfig, SpinnerFrames, StatusConfig};
use chatpane::ui::{Effect, PanelEvent};
use chatpane::ChatView;
use chrono::{DateTime, TimeZone, Utc};

/// Fixed wall clock used by every fixture
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// `t0()` plus `ms` milliseconds
pub fn at_ms(ms: i64) -> DateTime<Utc> {
    t0() + chrono::Duration::milliseconds(ms)
}

/// Panel config with the verb "Thinking" and a two-frame spinner
pub fn test_config() -> PanelConfig {
    PanelConfig {
        status: StatusConfig {
            verbs: vec!["Thinking".to_string()].into(),
            frames: SpinnerFrames::uniform(["*", "+"], 1),
            ..StatusConfig::default()
        },
        ..PanelConfig::default()
    }
}

/// Panel sized to `width` x `height` outer cells
pub fn panel(width: u16, height: u16) -> ChatView {
    let mut view = ChatView::new(test_config(), Box::new(FixedVerb(0)));
    view.set_size(width, height, t0());
    view
}

/// Visible viewport without styling
pub fn plain_view(view: &ChatView) -> String {
    strip_ansi(&view.view())
}

/// Text carried by the first clipboard effect, if any
pub fn copied_text(effects: &[Effect]) -> Option<&str> {
    effects.iter().find_map(|e| match e {
        Effect::CopyToClipboard(text) => Some(text.as_str()),
        _ => None,
    })
}

/// Press and release at the same cell
pub fn click(view: &mut ChatView, x: u16, y: u16, at: Instant) -> Vec<Effect> {
    let mut effects = view.handle(PanelEvent::MouseDown { x, y, at }, t0());
    effects.extend(view.handle(PanelEvent::MouseUp { x, y }, t0()));
    effects
}

/// `count` rapid clicks at one cell
pub fn multi_click(view: &mut ChatView, x: u16, y: u16, count: usize) -> Vec<Effect> {
    let start = fresh_instant();
    let mut effects = Vec::new();
    for i in 0..count {
        let at = start + Duration::from_millis(50 * i as u64);
        effects = click(view, x, y, at);
    }
    effects
}

/// An instant at least a second after every earlier one handed out, so
/// consecutive gestures never chain into a multi-click.
pub fn fresh_instant() -> Instant {
    static GESTURES: AtomicU64 = AtomicU64::new(1);
    let n = GESTURES.fetch_add(1, Ordering::Relaxed);
    Instant::now() + Duration::from_secs(n)
}

/// Press at `from`, drag to `to` and release there
pub fn drag(view: &mut ChatView, from: (u16, u16), to: (u16, u16)) -> Vec<Effect> {
    let at = fresh_instant();
    view.handle(
        PanelEvent::MouseDown {
            x: from.0,
            y: from.1,
            at,
        },
        t0(),
    );
    view.handle(PanelEvent::MouseDrag { x: to.0, y: to.1 }, t0());
    view.handle(PanelEvent::MouseUp { x: to.0, y: to.1 }, t0())
}

/// Clipboard sink that records both capabilities instead of touching the
/// terminal or the desktop.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub terminal: Mutex<Vec<String>>,
    pub native: Mutex<Vec<String>>,
    /// When set, native writes fail with this reason
    pub native_failure: Option<String>,
}

impl RecordingClipboard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            native_failure: Some(reason.to_string()),
            ..Self::default()
        })
    }

    pub fn terminal_writes(&self) -> Vec<String> {
        self.terminal.lock().expect("clipboard lock").clone()
    }

    pub fn native_writes(&self) -> Vec<String> {
        self.native.lock().expect("clipboard lock").clone()
    }
}

impl ClipboardSink for RecordingClipboard {
    fn set_system_clipboard(&self, text: &str) {
        self.terminal
            .lock()
            .expect("clipboard lock")
            .push(text.to_string());
    }

    fn write_native_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = &self.native_failure {
            return Err(ClipboardError::Unavailable(reason.clone()));
        }
        self.native
            .lock()
            .expect("clipboard lock")
            .push(text.to_string());
        Ok(())
    }
}
