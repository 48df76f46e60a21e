use std::time::Duration;

/// Which animation a scheduled tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickKind {
    /// Spinner / status line cadence
    Spinner,
    /// Checkmark flash after a reply completes
    CompletionFlash,
    /// Highlight flash after a selection is copied
    CopyFlash,
}

/// A timer tick, stamped with the epoch of the animation that requested it.
///
/// Animations bump their epoch whenever they restart; a tick carrying an older
/// epoch is dropped and does not reschedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub kind: TickKind,
    pub epoch: u64,
}

impl Tick {
    pub fn new(kind: TickKind, epoch: u64) -> Self {
        Self { kind, epoch }
    }
}

/// Side effects that should be executed outside the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `tick` back to the panel after `after` has elapsed
    ScheduleTick { tick: Tick, after: Duration },
    /// Write text through both clipboard paths
    CopyToClipboard(String),
}

impl Effect {
    pub fn schedule(kind: TickKind, epoch: u64, after: Duration) -> Self {
        Effect::ScheduleTick {
            tick: Tick::new(kind, epoch),
            after,
        }
    }

    /// The scheduled tick, if this effect is a schedule request
    pub fn scheduled_tick(&self) -> Option<Tick> {
        match self {
            Effect::ScheduleTick { tick, .. } => Some(*tick),
            Effect::CopyToClipboard(_) => None,
        }
    }
}
