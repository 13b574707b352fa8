//! Construction-time configuration shared by both containers.

use crate::ceiling::CapacityCeiling;
use crate::map::ChunkedHashMap;
use crate::set::ChunkedHashSet;
use crate::table::TableBound;
use std::collections::hash_map::RandomState;

/// What to do with slots freed by removals from chunks other than the last.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Reclaim {
    /// Refill freed slots in earlier chunks before growing the last one.
    /// Packs entries densely; iteration order may drift from insertion order.
    #[default]
    Backfill,
    /// Never write new keys anywhere but the last chunk. Earlier chunks only
    /// shrink, and are dropped once empty.
    AppendOnly,
}

/// Builder for [`ChunkedHashMap`] and [`ChunkedHashSet`].
///
/// ```
/// use chunked_hashmap::{Builder, CapacityCeiling, Reclaim};
///
/// static CEILING: CapacityCeiling = CapacityCeiling::new();
///
/// let mut m = Builder::new()
///     .table_bound(2)
///     .ceiling(&CEILING)
///     .reclaim(Reclaim::AppendOnly)
///     .build_map();
/// m.insert("a", 1);
/// m.insert("b", 2);
/// m.insert("c", 3);
/// assert_eq!(m.chunk_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Builder<S = RandomState> {
    pub(crate) hasher: S,
    pub(crate) bound: TableBound,
    pub(crate) ceiling: &'static CapacityCeiling,
    pub(crate) reclaim: Reclaim,
}

impl Builder {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Builder<S> {
    pub(crate) fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            bound: TableBound::UNBOUNDED,
            ceiling: CapacityCeiling::global(),
            reclaim: Reclaim::default(),
        }
    }

    /// Hash builder cloned into every chunk.
    pub fn hasher<S2>(self, hasher: S2) -> Builder<S2> {
        Builder {
            hasher,
            bound: self.bound,
            ceiling: self.ceiling,
            reclaim: self.reclaim,
        }
    }

    /// Limit every table to `limit` entries, simulating an environment that
    /// caps container size.
    ///
    /// The limit is learned into the configured [`CapacityCeiling`], which is
    /// [`CapacityCeiling::global`] unless [`ceiling`](Self::ceiling) says
    /// otherwise. A bounded container on the global cell therefore makes
    /// every later container in the process that also uses it split at
    /// `limit`. Pair a bound with its own `static` cell to keep it isolated:
    ///
    /// ```
    /// use chunked_hashmap::{Builder, CapacityCeiling, ChunkedHashMap};
    ///
    /// static ISOLATED: CapacityCeiling = CapacityCeiling::new();
    ///
    /// let mut small = Builder::new().table_bound(1).ceiling(&ISOLATED).build_map();
    /// small.insert(1, 1);
    /// small.insert(2, 2);
    /// assert_eq!(small.chunk_count(), 2);
    /// assert_eq!(ISOLATED.get().map(|c| c.get()), Some(1));
    ///
    /// let plain: ChunkedHashMap<u8, u8> = (0..10).map(|i| (i, i)).collect();
    /// assert!(!core::ptr::eq(plain.ceiling(), &ISOLATED));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn table_bound(mut self, limit: usize) -> Self {
        self.bound = match TableBound::new(limit) {
            Some(bound) => bound,
            None => panic!("table bound must be non-zero"),
        };
        self
    }

    /// Cell the built container caches its discovered ceiling in.
    pub fn ceiling(mut self, ceiling: &'static CapacityCeiling) -> Self {
        self.ceiling = ceiling;
        self
    }

    pub fn reclaim(mut self, reclaim: Reclaim) -> Self {
        self.reclaim = reclaim;
        self
    }

    pub fn build_map<K, V>(self) -> ChunkedHashMap<K, V, S> {
        ChunkedHashMap::from_builder(self)
    }

    pub fn build_set<T>(self) -> ChunkedHashSet<T, S> {
        ChunkedHashSet::from_builder(self)
    }
}
