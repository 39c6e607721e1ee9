use crossbeam_channel::{Receiver, Sender};
use rayon::ThreadPool;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use crate::decoder::{DecodedImage, Decoder};
use crate::error::{CacheError, DecodeError};
use crate::slots::{SlotSequence, SlotStatus};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a bulk `load_next`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub failed: usize,
}

/// Outcome of loading one slot on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// Already resident.
    Hit,
    /// Decoded just now.
    Decoded,
    /// Could not be decoded, now or earlier.
    Failed,
}

impl Fetch {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, Fetch::Failed)
    }
}

type DecodeResult = (usize, Result<DecodedImage, DecodeError>);

// ---------------------------------------------------------------------------
// Cache controller
// ---------------------------------------------------------------------------

/// Owns the slots and the decode worker pool. All slot mutation happens on
/// the thread that calls into the controller; workers only decode.
pub struct CacheController {
    slots: SlotSequence,
    decoder: Arc<dyn Decoder>,
    pool: ThreadPool,
    workers: usize,
    resident: usize,
}

impl CacheController {
    pub fn new(
        slots: SlotSequence,
        decoder: Arc<dyn Decoder>,
        workers: usize,
    ) -> Result<Self, CacheError> {
        let workers = workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("decoder-{}", i))
            .build()?;
        let resident = slots.iter().filter(|s| s.is_loaded()).count();
        log::debug!("{} slots, {} decode workers", slots.len(), workers);

        Ok(Self { slots, decoder, pool, workers, resident })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &SlotSequence {
        &self.slots
    }

    pub fn resident_count(&self) -> usize {
        self.resident
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn path(&self, idx: usize) -> &Path {
        self.slots.path(idx)
    }

    pub fn content(&self, idx: usize) -> Option<Arc<DecodedImage>> {
        self.slots.content(idx)
    }

    /// Bytes held by resident slots.
    pub fn resident_bytes(&self) -> u64 {
        self.slots
            .iter()
            .filter_map(|s| match s.status() {
                SlotStatus::Loaded(img) => Some(img.mem_size()),
                _ => None,
            })
            .sum()
    }

    /// Loads one slot on the calling thread. Failed slots are not retried.
    pub fn fetch(&mut self, idx: usize) -> Fetch {
        match self.slots.get(idx).status() {
            SlotStatus::Loaded(_) => return Fetch::Hit,
            SlotStatus::Failed => {
                log::debug!("{} is marked as failed", self.slots.path(idx).display());
                return Fetch::Failed;
            }
            SlotStatus::Unloaded => {}
        }

        let decoder = &self.decoder;
        let path = self.slots.path(idx);
        let result = panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(path)))
            .unwrap_or(Err(DecodeError::Panicked));
        if self.apply(idx, result) {
            Fetch::Decoded
        } else {
            Fetch::Failed
        }
    }

    /// Decodes up to `count` Unloaded slots on the worker pool, scanning
    /// circularly from `start`. At most `workers` decodes are in flight.
    /// Stops dispatching once `count` slots loaded, but every dispatched
    /// decode is collected before returning, so more than `count` may load.
    pub fn load_next(&mut self, count: usize, start: usize) -> Result<LoadSummary, CacheError> {
        if count == 0 {
            return Err(CacheError::InvalidCount);
        }
        let n = self.slots.len();
        let mut pending = (0..n)
            .map(|i| (i + start) % n)
            .filter(|&i| self.slots.get(i).is_unloaded())
            .collect::<Vec<_>>()
            .into_iter();

        let (tx, rx): (Sender<DecodeResult>, Receiver<DecodeResult>) =
            crossbeam_channel::bounded(self.workers);
        let mut summary = LoadSummary::default();
        let mut in_flight = 0usize;

        loop {
            while in_flight < self.workers && summary.loaded < count {
                let Some(idx) = pending.next() else { break };
                self.dispatch(idx, tx.clone());
                in_flight += 1;
            }
            if in_flight == 0 {
                break;
            }

            // Every dispatched task sends exactly once, and `tx` is still
            // held here, so the channel cannot disconnect while tasks remain.
            let Ok((idx, result)) = rx.recv() else { break };
            in_flight -= 1;
            if self.apply(idx, result) {
                summary.loaded += 1;
            } else {
                summary.failed += 1;
            }
        }

        if summary.loaded > 0 || summary.failed > 0 {
            log::info!(
                "Preloaded {} images ({} errors), {} resident",
                summary.loaded,
                summary.failed,
                self.resident
            );
        }
        Ok(summary)
    }

    fn dispatch(&self, idx: usize, tx: Sender<DecodeResult>) {
        let decoder = Arc::clone(&self.decoder);
        let path = self.slots.path(idx).to_path_buf();
        self.pool.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(&path)))
                .unwrap_or(Err(DecodeError::Panicked));
            let _ = tx.send((idx, result));
        });
    }

    /// Records a decode result. Returns true if the slot is now loaded.
    fn apply(&mut self, idx: usize, result: Result<DecodedImage, DecodeError>) -> bool {
        match result {
            Ok(img) => {
                if !self.slots.get(idx).is_loaded() {
                    self.resident += 1;
                }
                log::debug!(
                    "Loaded image {} ({}x{} {}, {:.1} KB on disk)",
                    idx,
                    img.width,
                    img.height,
                    img.format_name,
                    img.file_size as f64 / 1024.0
                );
                self.slots.set_loaded(idx, Arc::new(img));
                true
            }
            Err(e) => {
                log::warn!("{}: {}", self.slots.path(idx).display(), e);
                if self.slots.get(idx).is_loaded() {
                    self.resident -= 1;
                }
                self.slots.set_failed(idx);
                false
            }
        }
    }

    /// Unloads the first `count` loaded slots in index order. Returns how
    /// many were unloaded.
    pub fn evict(&mut self, count: usize) -> Result<usize, CacheError> {
        if count == 0 {
            return Err(CacheError::InvalidCount);
        }
        let mut evicted = 0;
        for idx in 0..self.slots.len() {
            if evicted == count {
                break;
            }
            if self.slots.get(idx).is_loaded() {
                self.slots.set_unloaded(idx);
                evicted += 1;
            }
        }
        self.resident -= evicted;
        if evicted > 0 {
            log::info!("Unloaded {} images, {} resident", evicted, self.resident);
        }
        Ok(evicted)
    }

    /// Evicts down to `max_resident`. Returns how many were unloaded.
    pub fn auto_balance(&mut self, max_resident: usize) -> usize {
        if self.resident <= max_resident {
            return 0;
        }
        self.evict(self.resident - max_resident).unwrap_or(0)
    }

    /// `(resident/total)|#- #|` with `#` loaded, `-` failed, blank unloaded.
    pub fn status_bar(&self) -> String {
        let bar: String = self
            .slots
            .iter()
            .map(|s| {
                if s.is_loaded() {
                    '#'
                } else if s.is_failed() {
                    '-'
                } else {
                    ' '
                }
            })
            .collect();
        format!("({}/{})|{}|", self.resident, self.slots.len(), bar)
    }
}
