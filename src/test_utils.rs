//! Shared helpers for unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::decoder::{DecodedImage, Decoder};
use crate::error::DecodeError;

pub fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

/// Deterministic 1x1 image derived from the path, so two decodes of the
/// same path compare equal.
pub fn image_for(name: &str) -> DecodedImage {
    let seed = name.bytes().fold(7u8, |acc, b| acc.wrapping_mul(31).wrapping_add(b));
    DecodedImage {
        rgba_bytes: vec![seed, seed.wrapping_add(1), seed.wrapping_add(2), 255],
        width: 1,
        height: 1,
        file_size: name.len() as u64,
        format_name: "TEST".to_string(),
    }
}

/// Decoder that fails on any path whose file name starts with `bad`,
/// counts calls per path and tracks how many decodes ran at once.
#[derive(Default)]
pub struct ScriptedDecoder {
    delay: Duration,
    calls: Mutex<HashMap<PathBuf, usize>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay, ..Self::default() }
    }

    pub fn calls(&self, path: &str) -> usize {
        self.calls.lock().unwrap().get(Path::new(path)).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn max_calls_per_path(&self) -> usize {
        self.calls.lock().unwrap().values().copied().max().unwrap_or(0)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Decoder for ScriptedDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
        *self.calls.lock().unwrap().entry(path.to_path_buf()).or_insert(0) += 1;

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        let name = path.to_string_lossy();
        let is_bad = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("bad"));
        if is_bad {
            Err(DecodeError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is corrupt", name),
            )))
        } else {
            Ok(image_for(&name))
        }
    }
}
