use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};

use super::ansi::paint;
use super::column_map::{sanitize_line, wrap_to_width};
use super::selection::{CellPos, ClickSettings, Selection};
use super::theme::{PERMISSION_ACCENT, STATUS_META};
use super::thinking_indicator::{StatusConfig, ThinkingIndicator, VerbSource};
use super::viewport::Viewport;
use super::{ChatMessage, MarkdownRenderer, MessageRole, StreamStats};
use crate::ui::effect::{Effect, TickKind};
use crate::ui::events::PanelEvent;

/// Cells taken by the panel border on each side
pub const BORDER_OFFSET: u16 = 1;

/// How long transient notices stay up, in milliseconds
const NOTICE_TTL_MS: i64 = 2000;

/// Tool permission request rendered under the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPermission {
    pub tool_name: String,
    pub description: String,
}

impl PendingPermission {
    pub fn new(tool_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            description: description.into(),
        }
    }
}

/// Panel behaviour knobs
#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub status: StatusConfig,
    pub clicks: ClickSettings,
    /// Copy as soon as a drag ends with text selected
    pub auto_copy_on_release: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            status: StatusConfig::default(),
            clicks: ClickSettings::default(),
            auto_copy_on_release: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    until: DateTime<Utc>,
}

/// Chat panel: transcript, streaming reply, status line and selection.
///
/// All mutation goes through [`ChatView::handle`] and the `set_*` calls, which
/// return the effects (ticks, clipboard writes) the host has to carry out.
pub struct ChatView {
    config: PanelConfig,
    messages: Vec<ChatMessage>,
    /// Currently streaming message buffer
    streaming_buffer: Option<String>,
    indicator: ThinkingIndicator,
    selection: Selection,
    markdown: MarkdownRenderer,
    viewport: Viewport,
    permission: Option<PendingPermission>,
    notice: Option<Notice>,
}

impl ChatView {
    pub fn new(config: PanelConfig, verbs: Box<dyn VerbSource>) -> Self {
        let indicator = ThinkingIndicator::new(config.status.clone(), verbs);
        let selection = Selection::new(config.clicks, config.status.flash_interval);
        Self {
            config,
            messages: Vec::new(),
            streaming_buffer: None,
            indicator,
            selection,
            markdown: MarkdownRenderer::new(),
            viewport: Viewport::default(),
            permission: None,
            notice: None,
        }
    }

    /// Resize to the outer panel size (border included)
    pub fn set_size(&mut self, width: u16, height: u16, now: DateTime<Utc>) {
        self.viewport.set_size(
            width.saturating_sub(BORDER_OFFSET * 2),
            height.saturating_sub(BORDER_OFFSET * 2),
        );
        self.rebuild(now);
    }

    /// Add a message to the chat
    pub fn push(&mut self, message: ChatMessage, now: DateTime<Utc>) {
        if self.streaming_buffer.is_some() {
            self.finalize_streaming();
        }
        self.messages.push(message);
        self.rebuild(now);
    }

    /// Append the user's prompt and start waiting for the reply
    pub fn submit(&mut self, prompt: impl Into<String>, now: DateTime<Utc>) -> Vec<Effect> {
        self.push(ChatMessage::user(prompt), now);
        self.set_waiting(true, None, now)
    }

    pub fn set_waiting(
        &mut self,
        waiting: bool,
        since: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        let effect = self.indicator.set_waiting(waiting, since, now);
        self.rebuild(now);
        effect.into_iter().collect()
    }

    pub fn set_container_initializing(
        &mut self,
        initializing: bool,
        since: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        let effect = self
            .indicator
            .set_container_initializing(initializing, since, now);
        self.rebuild(now);
        effect.into_iter().collect()
    }

    pub fn set_permission(&mut self, permission: Option<PendingPermission>, now: DateTime<Utc>) {
        self.permission = permission;
        self.rebuild(now);
    }

    /// Dispatch one event; returns the effects it produced.
    pub fn handle(&mut self, event: PanelEvent, now: DateTime<Utc>) -> Vec<Effect> {
        let effects = match event {
            PanelEvent::Tick(tick) => {
                let next = match tick.kind {
                    TickKind::Spinner => self.indicator.on_tick(tick.epoch),
                    TickKind::CompletionFlash => self.indicator.on_flash_tick(tick.epoch),
                    TickKind::CopyFlash => self.selection.on_flash_tick(tick.epoch),
                };
                // Animation frames repaint in place; only content changes re-pin
                self.refresh(now);
                next.into_iter().collect()
            }
            PanelEvent::Key(key) => self.handle_key(key),
            PanelEvent::MouseDown { x, y, at } => match self.to_cell(x, y) {
                Some(pos) => {
                    let lines = self.viewport.visible_lines().to_vec();
                    self.selection.click(pos, at, &lines).into_effects()
                }
                None => Vec::new(),
            },
            PanelEvent::MouseDrag { x, y } => {
                let pos = self.clamp_to_cell(x, y);
                self.selection.extend(pos);
                Vec::new()
            }
            PanelEvent::MouseUp { x, y } => self.handle_mouse_up(x, y),
            PanelEvent::AppendText(text) => {
                let effects = self.stream_append(&text, now);
                self.rebuild(now);
                effects
            }
            PanelEvent::StreamFinished => {
                let effects = self.finish_stream(now);
                self.rebuild(now);
                effects
            }
            PanelEvent::Stats(stats) => {
                self.indicator.set_stats(stats);
                self.rebuild(now);
                Vec::new()
            }
            PanelEvent::SubagentModel(model) => {
                self.indicator.set_subagent_model(model);
                self.rebuild(now);
                Vec::new()
            }
            PanelEvent::ClipboardFailed(reason) => {
                self.set_notice(format!("Clipboard unavailable: {reason}"), now);
                Vec::new()
            }
        };

        if let Some(Effect::CopyToClipboard(text)) = effects
            .iter()
            .find(|e| matches!(e, Effect::CopyToClipboard(_)))
        {
            let count = text.chars().count();
            self.set_notice(format!("Copied {count} characters"), now);
        }
        effects
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => {
                self.selection.clear();
                Vec::new()
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.copy_selection()
            }
            KeyCode::Char('y') => self.copy_selection(),
            KeyCode::Up => {
                self.viewport.scroll_up(1);
                Vec::new()
            }
            KeyCode::Down => {
                self.viewport.scroll_down(1);
                Vec::new()
            }
            KeyCode::PageUp => {
                self.viewport.page_up();
                Vec::new()
            }
            KeyCode::PageDown => {
                self.viewport.page_down();
                Vec::new()
            }
            KeyCode::Home => {
                self.viewport.goto_top();
                Vec::new()
            }
            KeyCode::End => {
                self.viewport.goto_bottom();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_mouse_up(&mut self, x: u16, y: u16) -> Vec<Effect> {
        if !self.selection.is_active() {
            return Vec::new();
        }
        let pos = self.clamp_to_cell(x, y);
        self.selection.extend(pos);
        self.selection.stop();
        if self.config.auto_copy_on_release && self.selection.has_text_selection() {
            self.copy_selection()
        } else {
            Vec::new()
        }
    }

    fn copy_selection(&mut self) -> Vec<Effect> {
        let lines = self.viewport.visible_lines().to_vec();
        self.selection.copy(&lines)
    }

    /// Panel cell to viewport cell; `None` on the border
    fn to_cell(&self, x: u16, y: u16) -> Option<CellPos> {
        let col = x.checked_sub(BORDER_OFFSET)?;
        let line = y.checked_sub(BORDER_OFFSET)?;
        if col >= self.viewport.width() || line >= self.viewport.height() {
            return None;
        }
        Some(CellPos::new(col as usize, line as usize))
    }

    /// Like [`Self::to_cell`] but clamps onto the viewport instead
    fn clamp_to_cell(&self, x: u16, y: u16) -> CellPos {
        let col = x
            .saturating_sub(BORDER_OFFSET)
            .min(self.viewport.width());
        let line = y
            .saturating_sub(BORDER_OFFSET)
            .min(self.viewport.height().saturating_sub(1));
        CellPos::new(col as usize, line as usize)
    }

    /// Start or append to streaming message
    fn stream_append(&mut self, text: &str, now: DateTime<Utc>) -> Vec<Effect> {
        match &mut self.streaming_buffer {
            Some(buffer) => {
                buffer.push_str(text);
                Vec::new()
            }
            None => {
                self.streaming_buffer = Some(text.to_string());
                self.indicator.set_streaming(true, now).into_iter().collect()
            }
        }
    }

    /// Finalize streaming message and add to history
    fn finalize_streaming(&mut self) {
        if let Some(content) = self.streaming_buffer.take() {
            self.messages.push(ChatMessage::assistant(content));
        }
    }

    fn finish_stream(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        self.finalize_streaming();
        self.indicator.set_streaming(false, now);
        self.indicator.set_waiting(false, None, now);
        self.indicator.set_subagent_model("");
        vec![self.indicator.start_completion_flash()]
    }

    fn set_notice(&mut self, text: String, now: DateTime<Utc>) {
        self.notice = Some(Notice {
            text,
            until: now + chrono::Duration::milliseconds(NOTICE_TTL_MS),
        });
    }

    /// Current transient notice, if it has not expired
    pub fn notice(&self, now: DateTime<Utc>) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| n.until > now)
            .map(|n| n.text.as_str())
    }

    /// Rebuild content and pin the viewport to the bottom
    fn rebuild(&mut self, now: DateTime<Utc>) {
        self.refresh(now);
        self.viewport.goto_bottom();
    }

    /// Rebuild content keeping the scroll position
    fn refresh(&mut self, now: DateTime<Utc>) {
        let content = self.compose(now);
        self.viewport.set_content(&content);
    }

    fn compose(&self, now: DateTime<Utc>) -> String {
        let width = self.viewport.width() as usize;
        let mut sections: Vec<String> = Vec::new();

        let transcript = self
            .messages
            .iter()
            .map(|m| self.render_message(m.role, &m.content, width))
            .collect::<Vec<_>>()
            .join("\n\n");
        sections.push(transcript);

        let activity = match &self.streaming_buffer {
            Some(buffer) => {
                let mut block = self.render_message(MessageRole::Assistant, buffer, width);
                if let Some(status) = self.indicator.status_line(now) {
                    block.push('\n');
                    block.push_str(&status);
                }
                Some(block)
            }
            None => self
                .indicator
                .status_line(now)
                .or_else(|| self.indicator.completion_line()),
        };
        sections.extend(activity);

        if let Some(permission) = &self.permission {
            sections.push(render_permission(permission));
        }

        sections
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn render_message(&self, role: MessageRole, content: &str, width: usize) -> String {
        let body = self.markdown.render(&wrap_prose(content, width), width);
        format!("{}\n{}", role.label_line(), body)
    }

    /// Visible viewport with the selection painted over it
    pub fn view(&self) -> String {
        self.selection
            .highlight(&self.viewport.view(), self.viewport.width())
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.streaming_buffer.is_none()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn streaming_buffer(&self) -> Option<&str> {
        self.streaming_buffer.as_deref()
    }

    pub fn stats(&self) -> &StreamStats {
        self.indicator.stats()
    }

    pub fn indicator(&self) -> &ThinkingIndicator {
        &self.indicator
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

/// Expand tabs, then wrap prose lines to `width`, leaving fenced code unwrapped
fn wrap_prose(content: &str, width: usize) -> String {
    let mut in_code = false;
    let mut out = Vec::new();
    for line in content.split('\n') {
        let line = sanitize_line(line);
        if line.trim_start().starts_with("```") {
            in_code = !in_code;
            out.push(line);
        } else if in_code {
            out.push(line);
        } else {
            out.extend(wrap_to_width(&line, width));
        }
    }
    out.join("\n")
}

fn render_permission(permission: &PendingPermission) -> String {
    let accent = Style::default()
        .fg(PERMISSION_ACCENT)
        .add_modifier(Modifier::BOLD);
    let mut block = paint("⚠ Permission required: ", accent);
    block.push_str(&paint(
        &sanitize_line(&permission.tool_name),
        Style::default().fg(PERMISSION_ACCENT),
    ));
    if !permission.description.is_empty() {
        block.push('\n');
        block.push_str(&paint(
            &sanitize_line(&format!("  {}", permission.description)),
            Style::default().fg(STATUS_META),
        ));
    }
    block
}
