use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use ratatui::style::{Color, Modifier, Style};

use super::ansi::paint;
use super::flash::Flash;
use super::spinner::{Spinner, SpinnerFrames};
use super::theme::{
    COMPLETION_BRIGHT, COMPLETION_DIM, PROGRESS_EMPTY, PROGRESS_FILLED, STATUS_META, STATUS_VALUE,
};
use super::turn_summary::{format_duration, format_tokens, StreamStats};
use crate::ui::effect::{Effect, TickKind};

/// Processing words shown next to the spinner
pub const PROCESSING_WORDS: &[&str] = &[
    "Accomplishing",
    "Baking",
    "Brewing",
    "Calculating",
    "Cerebrating",
    "Churning",
    "Cogitating",
    "Combobulating",
    "Computing",
    "Concocting",
    "Conjuring",
    "Contemplating",
    "Cooking",
    "Crafting",
    "Crunching",
    "Deciphering",
    "Deliberating",
    "Divining",
    "Forging",
    "Generating",
    "Hatching",
    "Ideating",
    "Imagining",
    "Incubating",
    "Inferring",
    "Marinating",
    "Mulling",
    "Musing",
    "Noodling",
    "Percolating",
    "Pondering",
    "Processing",
    "Puzzling",
    "Ruminating",
    "Simmering",
    "Spelunking",
    "Stewing",
    "Synthesizing",
    "Thinking",
    "Tinkering",
    "Transmuting",
    "Unfurling",
    "Whirring",
    "Working",
    "Wrangling",
];

/// Message shown while the sandbox container boots
pub const CONTAINER_MESSAGE: &str = "Initializing container…";

/// Progress never claims more than this before the container reports ready
pub const CONTAINER_PROGRESS_CAP: u8 = 95;

const PROGRESS_BAR_WIDTH: usize = 20;

/// Shimmer gradient colors (bright orange to very dark)
const SHIMMER_BRIGHT: (u8, u8, u8) = (255, 180, 80);
const SHIMMER_DIM: (u8, u8, u8) = (100, 50, 20);

/// Width of the shimmer "wave" in characters
const SHIMMER_WIDTH: f32 = 4.0;

/// Source of verb choices; swap in [`FixedVerb`] for deterministic output.
pub trait VerbSource: Send {
    /// Pick an index in `0..count` (`count` is never zero).
    fn pick(&mut self, count: usize) -> usize;
}

/// Uniformly random verb selection
#[derive(Debug, Default)]
pub struct RandomVerbs;

impl VerbSource for RandomVerbs {
    fn pick(&mut self, count: usize) -> usize {
        rand::rng().random_range(0..count)
    }
}

/// Always picks the same verb index
#[derive(Debug, Clone, Copy)]
pub struct FixedVerb(pub usize);

impl VerbSource for FixedVerb {
    fn pick(&mut self, count: usize) -> usize {
        self.0 % count
    }
}

/// Immutable status-line configuration
#[derive(Debug, Clone)]
pub struct StatusConfig {
    pub verbs: Arc<[String]>,
    pub frames: SpinnerFrames,
    /// Spinner tick cadence
    pub tick_interval: Duration,
    /// Completion and copy flash cadence
    pub flash_interval: Duration,
    /// Expected container boot time, drives the progress bar
    pub container_estimate: Duration,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            verbs: PROCESSING_WORDS.iter().map(|w| w.to_string()).collect(),
            frames: SpinnerFrames::default(),
            tick_interval: Duration::from_millis(80),
            flash_interval: Duration::from_millis(150),
            container_estimate: Duration::from_secs(45),
        }
    }
}

/// Waiting / streaming / completion / container-init status machine.
///
/// Waiting and streaming share one spinner period: a period starts when
/// either becomes active from idle and ends when both are off. Container
/// initialization is orthogonal and only shown while no period is running.
pub struct ThinkingIndicator {
    config: StatusConfig,
    verbs: Box<dyn VerbSource>,
    waiting: bool,
    streaming: bool,
    container_since: Option<DateTime<Utc>>,
    verb: String,
    spinner: Spinner,
    /// Ticks since the period began (drives the shimmer)
    shimmer_step: usize,
    started_at: Option<DateTime<Utc>>,
    stats: StreamStats,
    subagent_model: String,
    completion: Flash,
    spinner_epoch: u64,
}

impl ThinkingIndicator {
    pub fn new(config: StatusConfig, verbs: Box<dyn VerbSource>) -> Self {
        let spinner = Spinner::new(config.frames.clone());
        Self {
            config,
            verbs,
            waiting: false,
            streaming: false,
            container_since: None,
            verb: String::new(),
            spinner,
            shimmer_step: 0,
            started_at: None,
            stats: StreamStats::default(),
            subagent_model: String::new(),
            completion: Flash::new(),
            spinner_epoch: 0,
        }
    }

    /// Enter or leave the waiting phase.
    ///
    /// Entering always starts a fresh period: new verb, frame 0, cleared stats,
    /// and a timestamp (`since` restores one from a previous run).
    pub fn set_waiting(
        &mut self,
        waiting: bool,
        since: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<Effect> {
        if !waiting {
            self.waiting = false;
            return None;
        }
        self.waiting = true;
        self.stats = StreamStats::default();
        self.begin_period(since.unwrap_or(now))
    }

    /// Enter or leave the streaming phase. Streaming after waiting continues
    /// the waiting period; streaming from idle starts a new one.
    pub fn set_streaming(&mut self, streaming: bool, now: DateTime<Utc>) -> Option<Effect> {
        if !streaming {
            self.streaming = false;
            return None;
        }
        if self.streaming {
            return None;
        }
        let continuing = self.waiting;
        self.waiting = false;
        self.streaming = true;
        if continuing {
            None
        } else {
            self.begin_period(now)
        }
    }

    /// Show or hide the container-initializing line.
    pub fn set_container_initializing(
        &mut self,
        initializing: bool,
        since: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<Effect> {
        if !initializing {
            self.container_since = None;
            return None;
        }
        let already_animating = self.is_period_active() || self.container_since.is_some();
        self.container_since = Some(since.unwrap_or(now));
        if already_animating {
            None
        } else {
            self.spinner.reset();
            Some(self.restart_tick_chain())
        }
    }

    fn begin_period(&mut self, started_at: DateTime<Utc>) -> Option<Effect> {
        self.spinner.reset();
        self.shimmer_step = 0;
        self.verb = self.pick_verb();
        self.started_at = Some(started_at);
        self.completion.stop();
        Some(self.restart_tick_chain())
    }

    fn restart_tick_chain(&mut self) -> Effect {
        self.spinner_epoch = self.spinner_epoch.wrapping_add(1);
        Effect::schedule(TickKind::Spinner, self.spinner_epoch, self.config.tick_interval)
    }

    fn pick_verb(&mut self) -> String {
        if self.config.verbs.is_empty() {
            return "Working".to_string();
        }
        let index = self.verbs.pick(self.config.verbs.len());
        self.config.verbs[index % self.config.verbs.len()].clone()
    }

    /// Handle a spinner tick; returns the follow-up tick while still animating.
    pub fn on_tick(&mut self, epoch: u64) -> Option<Effect> {
        if epoch != self.spinner_epoch || !self.is_animating() {
            return None;
        }
        self.spinner.tick();
        self.shimmer_step = self.shimmer_step.wrapping_add(1);
        Some(Effect::schedule(
            TickKind::Spinner,
            epoch,
            self.config.tick_interval,
        ))
    }

    /// Start the checkmark flash under a finished reply.
    pub fn start_completion_flash(&mut self) -> Effect {
        let epoch = self.completion.start();
        Effect::schedule(TickKind::CompletionFlash, epoch, self.config.flash_interval)
    }

    /// Handle a completion flash tick
    pub fn on_flash_tick(&mut self, epoch: u64) -> Option<Effect> {
        if self.completion.tick(epoch) {
            Some(Effect::schedule(
                TickKind::CompletionFlash,
                epoch,
                self.config.flash_interval,
            ))
        } else {
            None
        }
    }

    /// Replace the stats snapshot
    pub fn set_stats(&mut self, stats: StreamStats) {
        self.stats = stats;
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Set the active subagent model (empty for none)
    pub fn set_subagent_model(&mut self, model: impl Into<String>) {
        self.subagent_model = model.into();
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn is_container_initializing(&self) -> bool {
        self.container_since.is_some()
    }

    fn is_period_active(&self) -> bool {
        self.waiting || self.streaming
    }

    /// True while any spinner-driven phase holds
    pub fn is_animating(&self) -> bool {
        self.is_period_active() || self.container_since.is_some()
    }

    pub fn completion_frame(&self) -> Option<u8> {
        self.completion.frame()
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    fn elapsed_secs(since: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
        since
            .map(|start| (now - start).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }

    /// Line shown while waiting or streaming, else the container line if
    /// initializing, else nothing.
    pub fn status_line(&self, now: DateTime<Utc>) -> Option<String> {
        if self.is_period_active() {
            Some(self.render_period_line(now))
        } else if self.container_since.is_some() {
            Some(self.render_container_line(now))
        } else {
            None
        }
    }

    fn render_period_line(&self, now: DateTime<Utc>) -> String {
        let shimmer_text = format!("{} {}…", self.spinner.frame(), self.verb);
        let mut line = self.render_shimmer_text(&shimmer_text);

        if !self.subagent_model.is_empty() {
            line.push_str(&paint(
                &format!(" [{}] working", self.subagent_model),
                Style::default().fg(STATUS_VALUE),
            ));
        }

        let meta = Style::default().fg(STATUS_META);
        let value = Style::default().fg(STATUS_VALUE);
        let mut parts = vec![
            paint("esc", value) + &paint(" to interrupt", meta),
            paint(
                &format_duration(Self::elapsed_secs(self.started_at, now)),
                value,
            ),
        ];
        if self.stats.output_tokens > 0 {
            parts.push(
                paint("↓ ", meta)
                    + &paint(&format_tokens(self.stats.output_tokens), value)
                    + &paint(" tokens", meta),
            );
        }
        if self.stats.cache_read_tokens > 0 {
            parts.push(
                paint(&format_tokens(self.stats.cache_read_tokens), value)
                    + &paint(" cached", meta),
            );
        }

        line.push_str(&paint(" (", meta));
        line.push_str(&parts.join(&paint(" · ", meta)));
        line.push_str(&paint(")", meta));
        line
    }

    fn render_container_line(&self, now: DateTime<Utc>) -> String {
        let elapsed = Self::elapsed_secs(self.container_since, now);
        let percent = container_progress(
            Duration::from_secs(elapsed),
            self.config.container_estimate,
        );
        let filled = percent as usize * PROGRESS_BAR_WIDTH / 100;

        let meta = Style::default().fg(STATUS_META);
        let mut line = paint(
            &format!("{} {}", self.spinner.frame(), CONTAINER_MESSAGE),
            Style::default().fg(Color::Rgb(SHIMMER_BRIGHT.0, SHIMMER_BRIGHT.1, SHIMMER_BRIGHT.2)),
        );
        line.push_str(&paint(&format!(" ({}) ", format_duration(elapsed)), meta));
        line.push_str(&paint(
            &"█".repeat(filled),
            Style::default().fg(PROGRESS_FILLED),
        ));
        line.push_str(&paint(
            &"░".repeat(PROGRESS_BAR_WIDTH - filled),
            Style::default().fg(PROGRESS_EMPTY),
        ));
        line.push_str(&paint(&format!(" {percent}%"), Style::default().fg(STATUS_VALUE)));
        line
    }

    /// Checkmark line for the completion flash; `None` once the flash is over.
    pub fn completion_line(&self) -> Option<String> {
        let glyph_style = match self.completion.frame() {
            Some(0) => Style::default()
                .fg(COMPLETION_BRIGHT)
                .add_modifier(Modifier::BOLD),
            Some(1) => Style::default().fg(COMPLETION_DIM),
            _ => return None,
        };
        let mut line = paint("✓", glyph_style);
        if let Some(summary) = self.stats.final_summary() {
            line.push(' ');
            line.push_str(&paint(&summary, Style::default().fg(STATUS_META)));
        }
        Some(line)
    }

    /// Calculate shimmer color for a character at given position
    fn shimmer_color(&self, char_index: usize) -> Color {
        // The wave sweeps left to right, restarting past the end of the text
        let wrap = 30.0 + SHIMMER_WIDTH * 2.0;
        let offset = (self.shimmer_step as f32 * 1.5) % wrap - SHIMMER_WIDTH;
        let wave_pos = (char_index as f32 - offset) / SHIMMER_WIDTH;
        let highlight = (-wave_pos * wave_pos).exp();
        let brightness = (0.15 + highlight * 0.85).clamp(0.0, 1.0);

        Color::Rgb(
            lerp(SHIMMER_DIM.0, SHIMMER_BRIGHT.0, brightness),
            lerp(SHIMMER_DIM.1, SHIMMER_BRIGHT.1, brightness),
            lerp(SHIMMER_DIM.2, SHIMMER_BRIGHT.2, brightness),
        )
    }

    /// Render text with shimmer effect
    fn render_shimmer_text(&self, text: &str) -> String {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                paint(
                    c.encode_utf8(&mut [0u8; 4]),
                    Style::default().fg(self.shimmer_color(i)),
                )
            })
            .collect()
    }
}

/// Time-based container progress: a linear fill that reaches the cap at the
/// estimate and holds there until the container is ready.
pub fn container_progress(elapsed: Duration, estimate: Duration) -> u8 {
    let estimate = estimate.as_secs_f64();
    if estimate <= 0.0 {
        return CONTAINER_PROGRESS_CAP;
    }
    let cap = f64::from(CONTAINER_PROGRESS_CAP);
    let progress = cap * elapsed.as_secs_f64() / estimate;
    progress.floor().clamp(0.0, cap) as u8
}

/// Linear interpolation between two u8 values
fn lerp(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (a as f32 + (b as f32 - a as f32) * t) as u8
}
