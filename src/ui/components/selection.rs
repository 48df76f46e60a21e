//! Mouse-driven text selection over the rendered viewport.
//!
//! Positions are `(col, line)` display cells relative to the inner viewport.
//! Everything here works on the styled lines the panel has already rendered,
//! so what is copied is exactly what is on screen.

use std::ops::Range;
use std::time::{Duration, Instant};

use ansi_to_tui::IntoText;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Text,
    widgets::{Paragraph, Widget},
};
use unicode_segmentation::UnicodeSegmentation;

use super::ansi::{buffer_to_ansi, strip_ansi};
use super::column_map::{
    byte_offset_to_column, column_to_byte_end, column_to_byte_offset, display_width,
};
use super::flash::Flash;
use super::theme::{SELECTION_BG, SELECTION_FG, SELECTION_FLASH_BG, SELECTION_FLASH_FG};
use crate::ui::effect::{Effect, TickKind};

/// A display cell in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellPos {
    pub col: usize,
    pub line: usize,
}

impl CellPos {
    pub fn new(col: usize, line: usize) -> Self {
        Self { col, line }
    }
}

/// Multi-click detection settings
#[derive(Debug, Clone, Copy)]
pub struct ClickSettings {
    /// Max time between clicks of one gesture
    pub window: Duration,
    /// Max distance in cells, checked on each axis
    pub tolerance: usize,
}

impl Default for ClickSettings {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(500),
            tolerance: 2,
        }
    }
}

/// Counts consecutive clicks at roughly the same cell.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    settings: ClickSettings,
    last: Option<(Instant, CellPos)>,
    count: u8,
}

impl ClickTracker {
    pub fn new(settings: ClickSettings) -> Self {
        Self {
            settings,
            last: None,
            count: 0,
        }
    }

    /// Record a click and return its position in the sequence (1, 2 or 3).
    ///
    /// A third click closes the sequence, so the next one counts from 1.
    pub fn register(&mut self, pos: CellPos, at: Instant) -> u8 {
        let continues = self.last.is_some_and(|(time, prev)| {
            at.saturating_duration_since(time) <= self.settings.window
                && prev.col.abs_diff(pos.col) <= self.settings.tolerance
                && prev.line.abs_diff(pos.line) <= self.settings.tolerance
        });

        self.count = if continues { self.count + 1 } else { 1 };
        self.last = Some((at, pos));

        let count = self.count;
        if count >= 3 {
            self.count = 0;
        }
        count
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

/// What a mouse-down turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Single click: a drag may follow
    Started,
    /// Double click; carries the copy effects when a word was hit
    Word(Vec<Effect>),
    /// Triple click; carries the copy effects when a paragraph was hit
    Paragraph(Vec<Effect>),
}

impl ClickOutcome {
    pub fn into_effects(self) -> Vec<Effect> {
        match self {
            ClickOutcome::Started => Vec::new(),
            ClickOutcome::Word(effects) | ClickOutcome::Paragraph(effects) => effects,
        }
    }
}

/// Selection range plus click tracking and the copy flash.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    start: Option<CellPos>,
    end: Option<CellPos>,
    active: bool,
    clicks: ClickTracker,
    flash: Flash,
    flash_interval: Duration,
}

impl Selection {
    pub fn new(clicks: ClickSettings, flash_interval: Duration) -> Self {
        Self {
            clicks: ClickTracker::new(clicks),
            flash_interval,
            ..Self::default()
        }
    }

    /// Begin a drag at `pos`
    pub fn start(&mut self, pos: CellPos) {
        self.start = Some(pos);
        self.end = Some(pos);
        self.active = true;
        self.flash.stop();
    }

    /// Move the drag end; ignored unless a drag is in progress
    pub fn extend(&mut self, pos: CellPos) {
        if self.active {
            self.end = Some(pos);
        }
    }

    /// End the drag, keeping the range visible
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
        self.active = false;
        self.flash.stop();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start_pos(&self) -> Option<CellPos> {
        self.start
    }

    pub fn end_pos(&self) -> Option<CellPos> {
        self.end
    }

    /// True when both endpoints are set and differ
    pub fn has_text_selection(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s != e)
    }

    /// Endpoints in reading order
    pub fn normalized(&self) -> Option<(CellPos, CellPos)> {
        let (mut start, mut end) = (self.start?, self.end?);
        if start.line > end.line {
            std::mem::swap(&mut start, &mut end);
        } else if start.line == end.line && start.col > end.col {
            std::mem::swap(&mut start.col, &mut end.col);
        }
        Some((start, end))
    }

    /// Handle a mouse-down, classifying it as a single, double or triple click.
    pub fn click(&mut self, pos: CellPos, at: Instant, lines: &[String]) -> ClickOutcome {
        match self.clicks.register(pos, at) {
            2 => {
                tracing::debug!(col = pos.col, line = pos.line, "double click");
                let effects = if self.select_word(pos, lines) {
                    self.copy(lines)
                } else {
                    Vec::new()
                };
                ClickOutcome::Word(effects)
            }
            3 => {
                tracing::debug!(col = pos.col, line = pos.line, "triple click");
                let effects = if self.select_paragraph(pos, lines) {
                    self.copy(lines)
                } else {
                    Vec::new()
                };
                ClickOutcome::Paragraph(effects)
            }
            _ => {
                self.start(pos);
                ClickOutcome::Started
            }
        }
    }

    /// Select the word-boundary segment under `pos`.
    ///
    /// Returns false, leaving the selection alone, when `pos` is past the end
    /// of its line or below the last line.
    pub fn select_word(&mut self, pos: CellPos, lines: &[String]) -> bool {
        let Some(line) = lines.get(pos.line) else {
            return false;
        };
        let plain = strip_ansi(line);
        if pos.col >= display_width(&plain) {
            return false;
        }

        let offset = column_to_byte_offset(&plain, pos.col);
        let Some((start, segment)) = plain
            .split_word_bound_indices()
            .find(|(i, w)| *i <= offset && offset < i + w.len())
        else {
            return false;
        };

        self.start = Some(CellPos::new(byte_offset_to_column(&plain, start), pos.line));
        self.end = Some(CellPos::new(
            byte_offset_to_column(&plain, start + segment.len()),
            pos.line,
        ));
        self.active = false;
        true
    }

    /// Select the run of non-blank lines around `pos`.
    pub fn select_paragraph(&mut self, pos: CellPos, lines: &[String]) -> bool {
        if pos.line >= lines.len() {
            return false;
        }
        let blank = |i: usize| strip_ansi(&lines[i]).trim().is_empty();

        let mut first = pos.line;
        while first > 0 && !blank(first - 1) {
            first -= 1;
        }
        let mut last = pos.line;
        while last + 1 < lines.len() && !blank(last + 1) {
            last += 1;
        }

        let last_width = display_width(&strip_ansi(&lines[last]));
        self.start = Some(CellPos::new(0, first));
        self.end = Some(CellPos::new(last_width, last));
        self.active = false;
        true
    }

    /// Text covered by the selection; end columns are exclusive.
    pub fn extract(&self, lines: &[String]) -> String {
        if !self.has_text_selection() {
            return String::new();
        }
        let Some((start, end)) = self.normalized() else {
            return String::new();
        };

        let mut parts: Vec<String> = Vec::new();
        for index in start.line..=end.line {
            let Some(line) = lines.get(index) else {
                break;
            };
            let plain = strip_ansi(line);
            let span = line_span(&plain, index, start, end);
            parts.push(plain[span].to_string());
        }
        parts.join("\n").trim().to_string()
    }

    /// Copy the current selection: a clipboard effect plus the flash tick, or
    /// nothing when the selection is empty.
    pub fn copy(&mut self, lines: &[String]) -> Vec<Effect> {
        let text = self.extract(lines);
        if text.is_empty() {
            return Vec::new();
        }
        tracing::debug!(chars = text.chars().count(), "copying selection");
        let epoch = self.flash.start();
        vec![
            Effect::CopyToClipboard(text),
            Effect::schedule(TickKind::CopyFlash, epoch, self.flash_interval),
        ]
    }

    /// Advance the copy flash
    pub fn on_flash_tick(&mut self, epoch: u64) -> Option<Effect> {
        self.flash
            .tick(epoch)
            .then(|| Effect::schedule(TickKind::CopyFlash, epoch, self.flash_interval))
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_active()
    }

    /// Paint the selection palette over `view`, `width` cells wide.
    pub fn highlight(&self, view: &str, width: u16) -> String {
        let Some((start, end)) = self.normalized().filter(|_| self.has_text_selection()) else {
            return view.to_string();
        };

        let text: Text<'static> = view
            .as_bytes()
            .into_text()
            .unwrap_or_else(|_| Text::raw(strip_ansi(view)));
        let height = text.lines.len().min(u16::MAX as usize) as u16;
        if height == 0 || width == 0 {
            return view.to_string();
        }

        let plain_lines: Vec<String> = view.split('\n').map(strip_ansi).collect();

        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        Paragraph::new(text).render(area, &mut buffer);

        let (fg, bg) = if self.flash.is_active() {
            (SELECTION_FLASH_FG, SELECTION_FLASH_BG)
        } else {
            (SELECTION_FG, SELECTION_BG)
        };

        let last_line = end.line.min(height as usize - 1);
        for line in start.line..=last_line {
            let Some(plain) = plain_lines.get(line) else {
                break;
            };
            // Paint exactly the clusters `extract` would copy
            let span = line_span(plain, line, start, end);
            let from = display_width(&plain[..span.start]);
            let to = display_width(&plain[..span.end]).min(width as usize);
            for x in from..to {
                if let Some(cell) = buffer.cell_mut((x as u16, line as u16)) {
                    cell.set_fg(fg);
                    cell.set_bg(bg);
                }
            }
        }

        buffer_to_ansi(&buffer)
    }
}

/// Byte range of `plain` covered on `line` by the normalized range.
///
/// A start column inside a wide glyph takes the glyph, and so does an end
/// column inside one, so extraction and highlighting agree cell for cell.
fn line_span(plain: &str, line: usize, start: CellPos, end: CellPos) -> Range<usize> {
    let width = display_width(plain);
    let from = if line == start.line { start.col.min(width) } else { 0 };
    let to = if line == end.line { end.col.min(width) } else { width };
    if from >= to {
        return 0..0;
    }
    column_to_byte_offset(plain, from)..column_to_byte_end(plain, to)
}
