use std::time::Duration;

use tokio::sync::mpsc;
use unicode_segmentation::UnicodeSegmentation;

use super::BackendEvent;
use crate::ui::components::StreamStats;

/// Reply streamed when no script file is given
pub const DEMO_SCRIPT: &str = include_str!("demo.md");

/// Word-boundary segments per streamed chunk
const SEGMENTS_PER_CHUNK: usize = 3;

/// Chunks between usage snapshots
const CHUNKS_PER_STATS: usize = 8;

const MAIN_MODEL: &str = "claude-sonnet";
const SUBAGENT_MODEL: &str = "claude-haiku";

/// Builder for backend event sequences
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    events: Vec<BackendEvent>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.events.push(BackendEvent::Text(text.into()));
        self
    }

    pub fn stats(mut self, stats: StreamStats) -> Self {
        self.events.push(BackendEvent::Stats(stats));
        self
    }

    pub fn subagent(mut self, model: impl Into<String>) -> Self {
        self.events.push(BackendEvent::SubagentModel(model.into()));
        self
    }

    pub fn finished(mut self) -> Self {
        self.events.push(BackendEvent::Finished);
        self
    }

    pub fn build(self) -> Vec<BackendEvent> {
        self.events
    }
}

/// Replays a fixed event sequence over a channel
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    events: Vec<BackendEvent>,
    /// Delay before each event (simulates streaming)
    chunk_delay: Duration,
}

impl ScriptedBackend {
    pub fn new(events: Vec<BackendEvent>) -> Self {
        Self {
            events,
            chunk_delay: Duration::ZERO,
        }
    }

    /// Configure delay between emitting events (default: Duration::ZERO)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Script a reply: word-sized text chunks, periodic usage snapshots, a
    /// subagent handoff through the middle third and final stats.
    pub fn from_reply(reply: &str, chunk_delay: Duration) -> Self {
        let segments: Vec<&str> = reply.split_word_bounds().collect();
        let chunks: Vec<String> = segments
            .chunks(SEGMENTS_PER_CHUNK)
            .map(|c| c.concat())
            .collect();
        let total = chunks.len();
        let input_tokens = 1_200;
        let cache_read = 3_600;

        let mut builder = ScriptBuilder::new();
        let mut streamed = String::new();
        for (i, chunk) in chunks.into_iter().enumerate() {
            if total >= 3 && i == total / 3 {
                builder = builder.subagent(SUBAGENT_MODEL);
            }
            if total >= 3 && i == total * 2 / 3 {
                builder = builder.subagent("");
            }
            streamed.push_str(&chunk);
            builder = builder.text(chunk);
            if (i + 1) % CHUNKS_PER_STATS == 0 {
                builder = builder.stats(
                    StreamStats::new()
                        .with_tokens(input_tokens, estimate_tokens(&streamed))
                        .with_cache(cache_read, 0),
                );
            }
        }

        let output = estimate_tokens(&streamed);
        let subagent_share = output / 5;
        let elapsed = chunk_delay.saturating_mul(total as u32);
        let mut final_stats = StreamStats::new()
            .with_tokens(input_tokens, output)
            .with_cache(cache_read, 0)
            .with_duration_ms(elapsed.as_millis() as u64);
        final_stats.add_model(MAIN_MODEL, output - subagent_share);
        if subagent_share > 0 {
            final_stats.add_model(SUBAGENT_MODEL, subagent_share);
        }

        Self::new(builder.stats(final_stats).finished().build()).with_delay(chunk_delay)
    }

    pub fn events(&self) -> &[BackendEvent] {
        &self.events
    }

    /// Spawn the replay task; the receiver closes once the script is done.
    pub fn start(&self) -> mpsc::Receiver<BackendEvent> {
        let (tx, rx) = mpsc::channel(32);
        let events = self.events.clone();
        let delay = self.chunk_delay;

        tokio::spawn(async move {
            for event in events {
                if delay > Duration::ZERO {
                    tokio::time::sleep(delay).await;
                }

                if tx.send(event).await.is_err() {
                    tracing::debug!("Backend receiver dropped; stopping replay");
                    break;
                }
            }
        });

        rx
    }
}

/// Rough token estimate: four characters per token
fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}
