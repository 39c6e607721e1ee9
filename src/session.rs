use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::CacheController;
use crate::cursor::{Cursor, MoveOutcome};
use crate::decoder::{DecodedImage, Decoder};
use crate::error::AppError;
use crate::slots::SlotSequence;

/// Offset that reaches the first or last slot from anywhere.
pub const JUMP_TO_END: i64 = i64::MAX;

/// What the display asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Navigate(i64),
    Prefetch(usize),
    Evict(usize),
    Dump,
}

#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    pub workers: usize,
    pub max_resident: usize,
}

/// What a handled intent leaves for the display.
#[derive(Debug, Default)]
pub struct Handled {
    /// Image to show if the cursor moved.
    pub shown: Option<Arc<DecodedImage>>,
    /// Status report requested by `Intent::Dump`.
    pub report: Option<String>,
}

/// The viewer's state for one run: slots, cursor and resident budget.
pub struct Session {
    cache: CacheController,
    cursor: Cursor,
    max_resident: usize,
}

impl Session {
    pub fn new(
        paths: Vec<PathBuf>,
        decoder: Arc<dyn Decoder>,
        settings: CacheSettings,
    ) -> Result<Self, AppError> {
        let slots = SlotSequence::new(paths);
        if slots.is_empty() {
            return Err(AppError::NoImages);
        }
        log::info!("{} images", slots.len());
        let cache = CacheController::new(slots, decoder, settings.workers)?;
        Ok(Self {
            cache,
            cursor: Cursor::new(),
            max_resident: settings.max_resident,
        })
    }

    /// Loads the first decodable image and puts the cursor on it.
    pub fn open(&mut self) -> Result<Arc<DecodedImage>, AppError> {
        if !self.cache.fetch(0).is_loaded() {
            self.cursor.move_by(1, &mut self.cache);
        }
        self.current_image()
            .ok_or(AppError::NoLoadableImage(self.cache.len()))
    }

    pub fn cursor(&self) -> usize {
        self.cursor.position()
    }

    pub fn resident_count(&self) -> usize {
        self.cache.resident_count()
    }

    pub fn current_path(&self) -> &Path {
        self.cache.path(self.cursor.position())
    }

    pub fn current_image(&self) -> Option<Arc<DecodedImage>> {
        self.cache.content(self.cursor.position())
    }

    /// Runs one user action, then keeps the cache within budget.
    pub fn handle(&mut self, intent: Intent) -> Handled {
        let mut handled = Handled::default();
        let mut prefetch = false;

        match intent {
            Intent::Navigate(offset) => match self.cursor.move_by(offset, &mut self.cache) {
                MoveOutcome::Moved { from, to, decoded } => {
                    log::info!(
                        "Move({}) from {} to {} (cached {}/{})",
                        offset,
                        from,
                        to,
                        self.cache.resident_count(),
                        self.cache.len()
                    );
                    handled.shown = self.cache.content(to);
                    prefetch = decoded && offset > 0;
                }
                MoveOutcome::Exhausted { from } => {
                    log::warn!("Move({}) from {}: nothing loadable, staying", offset, from);
                }
                MoveOutcome::Stayed => {}
            },
            Intent::Prefetch(count) => {
                if let Err(e) = self.cache.load_next(count, self.cursor.position()) {
                    log::warn!("prefetch {}: {}", count, e);
                }
            }
            Intent::Evict(count) => {
                if let Err(e) = self.cache.evict(count) {
                    log::warn!("evict {}: {}", count, e);
                }
            }
            Intent::Dump => handled.report = Some(self.status_report()),
        }

        if prefetch {
            log::info!("Auto preloading");
            if let Err(e) = self.cache.load_next(1, self.cursor.position()) {
                log::warn!("auto preload: {}", e);
            }
        }
        self.cache.auto_balance(self.max_resident);

        log::info!(
            "Current: {}/{}: {} ({} cached)",
            self.cursor.position(),
            self.cache.len(),
            self.current_path().display(),
            self.cache.resident_count()
        );
        handled
    }

    /// Window title for the current slot.
    pub fn title(&self) -> String {
        format!(
            "{}: {} (cached {}/{})",
            self.cursor(),
            self.current_path().display(),
            self.resident_count(),
            self.cache.len()
        )
    }

    pub fn status_report(&self) -> String {
        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let mb = |bytes: u64| bytes as f64 / (1024.0 * 1024.0);
        format!(
            "{}\nresident: {:.1} MB in {} images | workers: {} | system memory: {:.0}/{:.0} MB",
            self.cache.status_bar(),
            mb(self.cache.resident_bytes()),
            self.cache.resident_count(),
            self.cache.workers(),
            mb(sys.used_memory()),
            mb(sys.total_memory()),
        )
    }
}
