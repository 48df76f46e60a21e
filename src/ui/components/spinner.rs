use std::sync::Arc;

/// Default glyph cycle: out and back so the star "breathes"
pub const DEFAULT_FRAMES: &[&str] = &["·", "✢", "✳", "✶", "✻", "✽", "✻", "✶", "✳", "✢"];

/// Ticks each default frame is held; the two ends linger
pub const DEFAULT_HOLDS: &[u32] = &[4, 1, 1, 1, 1, 4, 1, 1, 1, 1];

/// Immutable frame set with a hold duration (in ticks) per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerFrames {
    frames: Arc<[String]>,
    holds: Arc<[u32]>,
}

impl SpinnerFrames {
    /// Build a frame set; missing or zero holds default to one tick.
    pub fn new<S: Into<String>>(frames: impl IntoIterator<Item = S>, holds: &[u32]) -> Self {
        let frames: Vec<String> = frames.into_iter().map(Into::into).collect();
        let frames = if frames.is_empty() {
            vec![" ".to_string()]
        } else {
            frames
        };
        let holds: Vec<u32> = (0..frames.len())
            .map(|i| holds.get(i).copied().unwrap_or(1).max(1))
            .collect();
        Self {
            frames: frames.into(),
            holds: holds.into(),
        }
    }

    /// Uniform frame set holding every frame for `hold` ticks
    pub fn uniform<S: Into<String>>(frames: impl IntoIterator<Item = S>, hold: u32) -> Self {
        let frames: Vec<String> = frames.into_iter().map(Into::into).collect();
        let holds = vec![hold; frames.len()];
        Self::new(frames, &holds)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn glyph(&self, index: usize) -> &str {
        &self.frames[index % self.frames.len()]
    }

    pub fn hold(&self, index: usize) -> u32 {
        self.holds[index % self.holds.len()]
    }
}

impl Default for SpinnerFrames {
    fn default() -> Self {
        Self::new(DEFAULT_FRAMES.iter().copied(), DEFAULT_HOLDS)
    }
}

/// Animated spinner for loading states
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: SpinnerFrames,
    frame_index: usize,
    hold_counter: u32,
}

impl Spinner {
    pub fn new(frames: SpinnerFrames) -> Self {
        Self {
            frames,
            frame_index: 0,
            hold_counter: 0,
        }
    }

    /// Advance one tick. Returns true when the visible frame changed.
    pub fn tick(&mut self) -> bool {
        self.hold_counter += 1;
        if self.hold_counter < self.frames.hold(self.frame_index) {
            return false;
        }
        self.hold_counter = 0;
        self.frame_index = (self.frame_index + 1) % self.frames.len();
        true
    }

    /// Back to the first frame
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.hold_counter = 0;
    }

    /// Get current frame
    pub fn frame(&self) -> &str {
        self.frames.glyph(self.frame_index)
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn hold_counter(&self) -> u32 {
        self.hold_counter
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(SpinnerFrames::default())
    }
}
