//! CapacityCeiling: cached, lazily discovered per-table entry limit.

use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicUsize, Ordering};

const UNKNOWN: usize = 0;

static GLOBAL: CapacityCeiling = CapacityCeiling::new();

/// Shared cell caching the largest number of entries a single table was
/// observed to hold before rejecting an insertion.
///
/// The ceiling belongs to the environment rather than to any one container,
/// so one cell is normally shared by every container in the process (see
/// [`CapacityCeiling::global`]). Containers can be pointed at their own
/// `static` cell through [`Builder::ceiling`](crate::Builder::ceiling).
///
/// Discovery is first-writer-wins: concurrent discoveries may both run the
/// expensive trial insertion, but only one value is ever stored.
#[derive(Debug)]
pub struct CapacityCeiling {
    value: AtomicUsize,
}

impl CapacityCeiling {
    /// Create a cell in the "unknown" state. Const so it can back a `static`.
    pub const fn new() -> Self {
        Self {
            value: AtomicUsize::new(UNKNOWN),
        }
    }

    /// The process-wide cell used by containers unless configured otherwise.
    pub fn global() -> &'static CapacityCeiling {
        &GLOBAL
    }

    /// The cached ceiling, or `None` if it has not been discovered yet.
    #[inline]
    pub fn get(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.value.load(Ordering::Acquire))
    }

    /// Record a discovered ceiling. Returns the value now cached, which is the
    /// earlier discovery if another caller got there first. A `len` of zero
    /// carries no information and leaves the cell untouched.
    pub fn record(&self, len: usize) -> Option<NonZeroUsize> {
        if len == UNKNOWN {
            return self.get();
        }
        match self
            .value
            .compare_exchange(UNKNOWN, len, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => NonZeroUsize::new(len),
            Err(existing) => NonZeroUsize::new(existing),
        }
    }

    /// Forget the cached ceiling so the next full table is probed again.
    ///
    /// Only useful when the environment's limit itself changes; clearing a
    /// container never resets its ceiling.
    pub fn reset(&self) {
        self.value.store(UNKNOWN, Ordering::Release);
    }

    /// Whether `len` entries reach the cached ceiling. Always false while the
    /// ceiling is unknown.
    #[inline]
    pub(crate) fn is_reached_by(&self, len: usize) -> bool {
        self.get().map_or(false, |c| len >= c.get())
    }
}

impl Default for CapacityCeiling {
    fn default() -> Self {
        Self::new()
    }
}
