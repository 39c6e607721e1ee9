use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::decoder::DecodedImage;

#[derive(Debug, Clone, Default)]
pub enum SlotStatus {
    #[default]
    Unloaded,
    Loaded(Arc<DecodedImage>),
    /// Decoding failed once; the slot is never tried again.
    Failed,
}

#[derive(Debug)]
pub struct Slot {
    path: PathBuf,
    status: SlotStatus,
}

impl Slot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> &SlotStatus {
        &self.status
    }

    pub fn is_unloaded(&self) -> bool {
        matches!(self.status, SlotStatus::Unloaded)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, SlotStatus::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SlotStatus::Failed)
    }
}

/// Fixed-length, ordered list of image slots. Indices past `len()` panic.
#[derive(Debug)]
pub struct SlotSequence {
    slots: Vec<Slot>,
}

impl SlotSequence {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        let slots = paths
            .into_iter()
            .map(|path| Slot { path, status: SlotStatus::Unloaded })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, idx: usize) -> &Slot {
        &self.slots[idx]
    }

    pub fn path(&self, idx: usize) -> &Path {
        self.slots[idx].path()
    }

    pub fn content(&self, idx: usize) -> Option<Arc<DecodedImage>> {
        match &self.slots[idx].status {
            SlotStatus::Loaded(img) => Some(Arc::clone(img)),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn set_loaded(&mut self, idx: usize, content: Arc<DecodedImage>) {
        self.slots[idx].status = SlotStatus::Loaded(content);
    }

    pub fn set_failed(&mut self, idx: usize) {
        self.slots[idx].status = SlotStatus::Failed;
    }

    /// Drops the slot's content, returning it if there was any.
    pub fn set_unloaded(&mut self, idx: usize) -> Option<Arc<DecodedImage>> {
        if !self.slots[idx].is_loaded() {
            return None;
        }
        match std::mem::take(&mut self.slots[idx].status) {
            SlotStatus::Loaded(img) => Some(img),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{image_for, paths};

    #[test]
    fn new_sequence_is_all_unloaded_in_order() {
        let seq = SlotSequence::new(paths(&["c", "a", "b"]));
        assert_eq!(seq.len(), 3);
        assert!(seq.iter().all(Slot::is_unloaded));
        let names: Vec<_> = seq.iter().map(|s| s.path().to_path_buf()).collect();
        assert_eq!(names, paths(&["c", "a", "b"]));
    }

    #[test]
    fn content_present_only_when_loaded() {
        let mut seq = SlotSequence::new(paths(&["a", "b"]));
        assert!(seq.content(0).is_none());

        seq.set_loaded(0, Arc::new(image_for("a")));
        assert!(seq.get(0).is_loaded());
        assert!(seq.content(0).is_some());

        let dropped = seq.set_unloaded(0);
        assert!(dropped.is_some());
        assert!(seq.get(0).is_unloaded());
        assert!(seq.content(0).is_none());
    }

    #[test]
    fn unloading_a_failed_slot_keeps_it_failed() {
        let mut seq = SlotSequence::new(paths(&["a"]));
        seq.set_failed(0);
        assert!(seq.set_unloaded(0).is_none());
        assert!(seq.get(0).is_failed());
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_panics() {
        let seq = SlotSequence::new(paths(&["a"]));
        let _ = seq.get(1);
    }
}
