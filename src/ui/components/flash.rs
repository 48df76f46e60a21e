//! Short, self-terminating flash animation.
//!
//! Used for the completion confirmation under a finished reply and for the
//! copy confirmation over a selection. The two never share a counter.

/// Number of flash ticks before the flash switches itself off.
pub const FLASH_FRAMES: u8 = 3;

/// Flash counter: `None` when inactive, otherwise the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flash {
    frame: Option<u8>,
    epoch: u64,
}

impl Flash {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start at frame 0. Returns the epoch to stamp on the tick.
    pub fn start(&mut self) -> u64 {
        self.epoch = self.epoch.wrapping_add(1);
        self.frame = Some(0);
        self.epoch
    }

    /// Advance one frame for a tick stamped with `epoch`.
    ///
    /// Returns true while the flash should keep ticking. Ticks from an earlier
    /// `start` are ignored.
    pub fn tick(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        let Some(frame) = self.frame else {
            return false;
        };
        let next = frame + 1;
        if next >= FLASH_FRAMES {
            self.frame = None;
            false
        } else {
            self.frame = Some(next);
            true
        }
    }

    pub fn stop(&mut self) {
        self.frame = None;
    }

    pub fn frame(&self) -> Option<u8> {
        self.frame
    }

    pub fn is_active(&self) -> bool {
        self.frame.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
