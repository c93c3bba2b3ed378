use image::RgbImage;

// ============================================================================
// SINGLE-LEVEL UNDO
// ============================================================================

/// One full-picture snapshot plus the gate that decides when a new one is
/// taken.
///
/// The first mutation after the gate opens saves the picture; later
/// mutations reuse that snapshot until something reopens the gate (load,
/// undo, save, tool or colour change). Undo therefore rolls back a whole run
/// of strokes made with the same tool and colour.
#[derive(Default)]
pub struct UndoHistory {
    snapshot: Option<RgbImage>,
    taken: bool,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `image` unless the current run already has a snapshot. Returns
    /// true when a snapshot was stored.
    pub fn snapshot_if_needed(&mut self, image: &RgbImage) -> bool {
        if self.taken {
            return false;
        }
        self.snapshot = Some(image.clone());
        self.taken = true;
        true
    }

    /// Hand back the stored picture and clear it. The gate reopens.
    pub fn take(&mut self) -> Option<RgbImage> {
        self.taken = false;
        self.snapshot.take()
    }

    /// Start a new run: the next mutation takes a fresh snapshot.
    pub fn reopen(&mut self) {
        self.taken = false;
    }

    pub fn can_undo(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn memory_size(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.as_raw().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn pic(v: u8) -> RgbImage {
        RgbImage::from_pixel(2, 2, Rgb([v, v, v]))
    }

    #[test]
    fn second_snapshot_in_a_run_is_skipped() {
        let mut history = UndoHistory::new();
        assert!(history.snapshot_if_needed(&pic(1)));
        assert!(!history.snapshot_if_needed(&pic(2)));
        assert_eq!(history.take(), Some(pic(1)));
    }

    #[test]
    fn take_empties_history() {
        let mut history = UndoHistory::new();
        history.snapshot_if_needed(&pic(1));
        assert!(history.take().is_some());
        assert!(history.take().is_none());
        assert!(!history.can_undo());
    }

    #[test]
    fn reopen_replaces_instead_of_stacking() {
        let mut history = UndoHistory::new();
        history.snapshot_if_needed(&pic(1));
        history.reopen();
        assert!(history.snapshot_if_needed(&pic(2)));
        assert_eq!(history.take(), Some(pic(2)));
        assert_eq!(history.take(), None);
    }

    #[test]
    fn memory_is_one_picture_at_most() {
        let mut history = UndoHistory::new();
        assert_eq!(history.memory_size(), 0);
        history.snapshot_if_needed(&pic(1));
        history.reopen();
        history.snapshot_if_needed(&pic(2));
        assert_eq!(history.memory_size(), 12);
        history.take();
        assert_eq!(history.memory_size(), 0);
    }
}
