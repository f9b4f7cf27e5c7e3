//! Start/end year selections for range-based charts.
//!
//! Every range-based option goes through [`YearRange`], so the rule for an
//! inverted range is the same everywhere: the bound being edited wins and the
//! other bound is reset to `None` if it now conflicts.

/// Outcome of editing one bound of a [`YearRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdit {
    /// The new value equals the stored one; nothing changed.
    Unchanged,
    /// The bound was updated and the range is still consistent.
    Applied,
    /// The bound was updated and the opposite bound was cleared.
    AppliedWithReset,
}

impl RangeEdit {
    pub fn changed(self) -> bool {
        !matches!(self, RangeEdit::Unchanged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl YearRange {
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        let mut range = Self::default();
        range.set_start(start);
        range.set_end(end);
        range
    }

    pub fn set_start(&mut self, start: Option<i32>) -> RangeEdit {
        if self.start == start {
            return RangeEdit::Unchanged;
        }
        self.start = start;
        match (start, self.end) {
            (Some(s), Some(e)) if s > e => {
                self.end = None;
                RangeEdit::AppliedWithReset
            }
            _ => RangeEdit::Applied,
        }
    }

    pub fn set_end(&mut self, end: Option<i32>) -> RangeEdit {
        if self.end == end {
            return RangeEdit::Unchanged;
        }
        self.end = end;
        match (self.start, end) {
            (Some(s), Some(e)) if s > e => {
                self.start = None;
                RangeEdit::AppliedWithReset
            }
            _ => RangeEdit::Applied,
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = self.start.is_some() || self.end.is_some();
        *self = Self::default();
        changed
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn contains(&self, year: i32) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) => (s..=e).contains(&year),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_below_start_resets_start() {
        let mut range = YearRange::new(Some(2025), Some(2030));
        assert_eq!(range.set_end(Some(2020)), RangeEdit::AppliedWithReset);
        assert_eq!(range, YearRange { start: None, end: Some(2020) });
    }

    #[test]
    fn start_above_end_resets_end() {
        let mut range = YearRange::new(Some(2025), Some(2030));
        assert_eq!(range.set_start(Some(2040)), RangeEdit::AppliedWithReset);
        assert_eq!(range, YearRange { start: Some(2040), end: None });
    }

    #[test]
    fn equal_bounds_are_consistent() {
        let mut range = YearRange::new(Some(2025), Some(2030));
        assert_eq!(range.set_end(Some(2025)), RangeEdit::Applied);
        assert!(range.is_complete());
        assert!(range.contains(2025));
        assert!(!range.contains(2026));
    }

    #[test]
    fn same_value_is_unchanged() {
        let mut range = YearRange::new(Some(2025), None);
        assert_eq!(range.set_start(Some(2025)), RangeEdit::Unchanged);
        assert!(!range.set_end(None).changed());
    }
}
