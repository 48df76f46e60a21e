/// Output tokens attributed to one model during a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelUsage {
    pub model: String,
    pub output_tokens: u64,
}

/// Usage statistics snapshot delivered by the backend.
///
/// Snapshots replace each other wholesale; nothing here is updated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub output_tokens: u64,
    pub input_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,
    pub duration_ms: u64,
    /// Breakdown in the order models first contributed
    pub per_model: Vec<ModelUsage>,
}

/// Separator between parts of the final stats block
pub const STATS_SEPARATOR: &str = " · ";

impl StreamStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set token usage
    pub fn with_tokens(mut self, input: u64, output: u64) -> Self {
        self.input_tokens = input;
        self.output_tokens = output;
        self
    }

    /// Set cache usage
    pub fn with_cache(mut self, read: u64, creation: u64) -> Self {
        self.cache_read_tokens = read;
        self.cache_creation_tokens = creation;
        self
    }

    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Append a per-model entry
    pub fn add_model(&mut self, model: impl Into<String>, output_tokens: u64) {
        self.per_model.push(ModelUsage {
            model: model.into(),
            output_tokens,
        });
    }

    /// Cache hit rate in percent, or `None` when nothing was read from cache.
    pub fn cache_hit_rate(&self) -> Option<u64> {
        let denominator = self.input_tokens + self.cache_read_tokens + self.cache_creation_tokens;
        if denominator == 0 || self.cache_read_tokens == 0 {
            return None;
        }
        let rate = self.cache_read_tokens as f64 / denominator as f64 * 100.0;
        Some(rate.round() as u64)
    }

    /// Compose the completion stats block, or `None` when no part qualifies.
    pub fn final_summary(&self) -> Option<String> {
        let mut parts = Vec::new();

        if self.output_tokens > 0 {
            parts.push(format!("{} tokens", format_tokens(self.output_tokens)));
        }

        if let Some(rate) = self.cache_hit_rate() {
            parts.push(format!("cache: {rate}%"));
        }

        if self.per_model.len() > 1 {
            let breakdown = self
                .per_model
                .iter()
                .map(|m| format!("{}: {}", m.model, format_tokens(m.output_tokens)))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(breakdown);
        }

        if self.duration_ms > 0 {
            parts.push(format_duration(self.duration_ms / 1000));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(STATS_SEPARATOR))
        }
    }
}

/// Format token count (abbreviate if large)
pub fn format_tokens(count: u64) -> String {
    if count >= 1000 {
        format!("{:.1}k", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}

/// Format elapsed seconds as `Ns`, or `Mm Ss` from one minute on
pub fn format_duration(secs: u64) -> String {
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}
