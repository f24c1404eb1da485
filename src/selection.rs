//! Fragment selection marks and the loop flag.

use crate::error::AppError;

/// Start/end marks in milliseconds plus the fragment-loop flag.
///
/// `end_ms >= start_ms` holds after every mutation: marking one bound past
/// the other collapses the window to zero length instead of rejecting the
/// mark. A zero-length window is not a valid fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    start_ms: u64,
    end_ms: u64,
    loop_enabled: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn mark_start(&mut self, ms: u64) {
        self.start_ms = ms;
        if self.end_ms < self.start_ms {
            self.end_ms = self.start_ms;
        }
    }

    pub fn mark_end(&mut self, ms: u64) {
        self.end_ms = ms;
        if self.end_ms < self.start_ms {
            self.start_ms = self.end_ms;
        }
    }

    pub fn is_valid(&self) -> bool {
        self.end_ms > self.start_ms
    }

    /// Flips the loop flag and returns the new state. Refused while the
    /// selection is not a valid fragment; the flag is left unchanged.
    pub fn toggle_loop(&mut self) -> Result<bool, AppError> {
        if !self.is_valid() {
            return Err(AppError::InvalidSelection);
        }
        self.loop_enabled = !self.loop_enabled;
        Ok(self.loop_enabled)
    }

    /// Back to `{0, 0, false}`. Called on every file load.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_keep_ordering_after_any_sequence() {
        let mut selection = Selection::new();
        for (start, end) in [(5_000, 2_000), (0, 10_000), (20_000, 1_000), (3_000, 3_000)] {
            selection.mark_start(start);
            assert!(selection.end_ms() >= selection.start_ms());
            selection.mark_end(end);
            assert!(selection.end_ms() >= selection.start_ms());
        }
    }

    #[test]
    fn marking_start_past_end_collapses_the_window() {
        let mut selection = Selection::new();
        selection.mark_end(2_000);
        selection.mark_start(5_000);
        assert_eq!(selection.start_ms(), 5_000);
        assert_eq!(selection.end_ms(), 5_000);
        assert!(!selection.is_valid());
    }

    #[test]
    fn marking_end_before_start_pulls_start_down() {
        let mut selection = Selection::new();
        selection.mark_start(5_000);
        selection.mark_end(2_000);
        assert_eq!(selection.start_ms(), 2_000);
        assert_eq!(selection.end_ms(), 2_000);
    }

    #[test]
    fn zero_length_window_is_invalid() {
        let mut selection = Selection::new();
        selection.mark_start(1_000);
        selection.mark_end(1_000);
        assert!(!selection.is_valid());

        selection.mark_end(1_001);
        assert!(selection.is_valid());
    }

    #[test]
    fn toggle_on_invalid_selection_is_refused() {
        let mut selection = Selection::new();
        let err = selection.toggle_loop().unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection));
        assert!(!selection.loop_enabled());
    }

    #[test]
    fn toggle_flips_when_valid() {
        let mut selection = Selection::new();
        selection.mark_start(1_000);
        selection.mark_end(4_000);
        assert!(selection.toggle_loop().expect("enable"));
        assert!(selection.loop_enabled());
        assert!(!selection.toggle_loop().expect("disable"));
        assert!(!selection.loop_enabled());
    }

    #[test]
    fn reset_clears_marks_and_loop() {
        let mut selection = Selection::new();
        selection.mark_start(1_000);
        selection.mark_end(4_000);
        selection.toggle_loop().expect("enable");
        selection.reset();
        assert_eq!(selection, Selection::default());
    }
}
