use crate::cache::{CacheController, Fetch};

/// Result of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Zero offset, or already at the boundary in that direction.
    Stayed,
    /// Cursor moved; `decoded` is false when the target was already resident.
    Moved { from: usize, to: usize, decoded: bool },
    /// Every slot between the target and the boundary failed to load.
    Exhausted { from: usize },
}

/// Index of the displayed slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves by `offset`, clamped to the sequence. Slots that fail to load
    /// are skipped in the direction of travel; hitting either end while
    /// skipping leaves the cursor where it was. Never wraps.
    pub fn move_by(&mut self, offset: i64, cache: &mut CacheController) -> MoveOutcome {
        let len = cache.len();
        if offset == 0 || len == 0 {
            return MoveOutcome::Stayed;
        }
        let from = self.position;
        let last = len as i64 - 1;
        let mut target = (from as i64).saturating_add(offset).clamp(0, last);
        if target == from as i64 {
            return MoveOutcome::Stayed;
        }

        let step = offset.signum();
        let decoded = loop {
            match cache.fetch(target as usize) {
                Fetch::Hit => break false,
                Fetch::Decoded => break true,
                Fetch::Failed => {
                    target += step;
                    if target < 0 || target > last {
                        log::info!("Move({}) from {}: no loadable image in that direction", offset, from);
                        return MoveOutcome::Exhausted { from };
                    }
                }
            }
        };

        let to = target as usize;
        self.position = to;
        log::debug!("Move({}) from {} to {}", offset, from, to);
        MoveOutcome::Moved { from, to, decoded }
    }
}
