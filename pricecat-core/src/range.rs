use std::fmt;
use std::num::NonZeroU32;
use std::ops::RangeInclusive;

/// Integer probed against the pricing service to test product existence.
pub type CandidateId = u32;

/// Inclusive range of candidate ids, `start <= end` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    start: CandidateId,
    end: CandidateId,
}

impl IdRange {
    /// Create a range. Returns `None` when `start > end`.
    pub fn new(start: CandidateId, end: CandidateId) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> CandidateId {
        self.start
    }

    pub fn end(&self) -> CandidateId {
        self.end
    }

    /// Number of ids in the range. Never zero.
    pub fn len(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }

    pub fn contains(&self, id: CandidateId) -> bool {
        (self.start..=self.end).contains(&id)
    }

    /// Every id in ascending order.
    pub fn ids(&self) -> RangeInclusive<CandidateId> {
        self.start..=self.end
    }

    /// Split the range into consecutive windows of `batch_size` ids.
    ///
    /// All windows but possibly the last hold exactly `batch_size` ids.
    pub fn windows(&self, batch_size: NonZeroU32) -> BatchWindows {
        BatchWindows {
            next: Some(self.start),
            end: self.end,
            size: batch_size.get(),
        }
    }

    /// Number of windows `windows(batch_size)` yields.
    pub fn window_count(&self, batch_size: NonZeroU32) -> u64 {
        self.len().div_ceil(u64::from(batch_size.get()))
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// The inclusive sub-range processed by one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchWindow {
    pub start: CandidateId,
    pub end: CandidateId,
}

impl BatchWindow {
    pub fn len(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }

    pub fn ids(&self) -> RangeInclusive<CandidateId> {
        self.start..=self.end
    }
}

impl fmt::Display for BatchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}

/// Iterator over the batch windows of an [`IdRange`].
#[derive(Debug, Clone)]
pub struct BatchWindows {
    next: Option<CandidateId>,
    end: CandidateId,
    size: u32,
}

impl Iterator for BatchWindows {
    type Item = BatchWindow;

    fn next(&mut self) -> Option<BatchWindow> {
        let start = self.next?;
        let end = start.saturating_add(self.size - 1).min(self.end);
        // checked_add keeps a range ending at u32::MAX from wrapping around
        self.next = if end < self.end { end.checked_add(1) } else { None };
        Some(BatchWindow { start, end })
    }
}

#[cfg(test)]
#[path = "tests/range_tests.rs"]
mod tests;
