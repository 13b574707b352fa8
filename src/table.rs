//! Table: a single bounded hash table, the unit every chunk is built from.
//!
//! The table refuses new keys once it holds `bound` entries, and maps
//! hashbrown's `CapacityOverflow` onto the same capacity-exceeded signal.
//! Allocation failures are reported separately; they are not a capacity
//! problem and the chunking layer passes them straight through.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use hashbrown::{HashMap, TryReserveError};

/// Maximum number of entries the environment lets one table hold.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TableBound(NonZeroUsize);

impl TableBound {
    /// Only the allocator limits the table.
    pub const UNBOUNDED: TableBound = TableBound(NonZeroUsize::MAX);

    /// A bound of `limit` entries, or `None` if `limit` is zero.
    pub const fn new(limit: usize) -> Option<Self> {
        match NonZeroUsize::new(limit) {
            Some(n) => Some(TableBound(n)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for TableBound {
    fn default() -> Self {
        TableBound::UNBOUNDED
    }
}

/// Why a table did not take an entry. The entry is handed back either way.
#[derive(Debug)]
pub(crate) enum TryInsertError<K, V> {
    /// Capacity exceeded: the table is at its bound.
    Full { key: K, value: V },
    /// The allocator failed.
    Alloc {
        key: K,
        value: V,
        source: TryReserveError,
    },
}

/// Error returned by `try_insert` when memory for a new entry could not be
/// obtained. Ownership of the rejected entry is returned with the error.
pub struct InsertError<K, V> {
    pub key: K,
    pub value: V,
    pub source: TryReserveError,
}

impl<K, V> InsertError<K, V> {
    /// Recover the entry that could not be inserted.
    pub fn into_inner(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Infallible-path handling, matching what `hashbrown` does on failure.
    pub(crate) fn abort(self) -> ! {
        match self.source {
            TryReserveError::CapacityOverflow => panic!("capacity overflow"),
            TryReserveError::AllocError { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

impl<K, V> fmt::Debug for InsertError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<K, V> fmt::Display for InsertError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            TryReserveError::CapacityOverflow => f.write_str("capacity overflow"),
            TryReserveError::AllocError { layout } => {
                write!(f, "memory allocation of {} bytes failed", layout.size())
            }
        }
    }
}

impl<K, V> std::error::Error for InsertError<K, V> {}

#[derive(Clone)]
pub(crate) struct Table<K, V, S> {
    map: HashMap<K, V, S>,
    bound: TableBound,
}

impl<K, V, S> Table<K, V, S> {
    pub(crate) fn with_hasher(hasher: S, bound: TableBound) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
            bound,
        }
    }

    /// Adopt an existing map as a table without re-inserting its entries.
    pub(crate) fn from_map(map: HashMap<K, V, S>, bound: TableBound) -> Self {
        debug_assert!(map.len() <= bound.get());
        Self { map, bound }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn iter(&self) -> hashbrown::hash_map::Iter<'_, K, V> {
        self.map.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> hashbrown::hash_map::IterMut<'_, K, V> {
        self.map.iter_mut()
    }

    pub(crate) fn into_entries(self) -> hashbrown::hash_map::IntoIter<K, V> {
        self.map.into_iter()
    }
}

impl<K, V, S> Table<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_key_value(q)
    }

    pub(crate) fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_mut(q)
    }

    pub(crate) fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(q)
    }

    pub(crate) fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove_entry(q)
    }

    /// Insert a key the caller knows is absent from this table.
    pub(crate) fn try_insert_unique(
        &mut self,
        key: K,
        value: V,
    ) -> Result<(), TryInsertError<K, V>> {
        debug_assert!(!self.map.contains_key(&key));
        if self.map.len() >= self.bound.get() {
            return Err(TryInsertError::Full { key, value });
        }
        #[cfg(test)]
        if alloc_failure::take() {
            let layout = core::alloc::Layout::new::<(K, V)>();
            let source = TryReserveError::AllocError { layout };
            return Err(TryInsertError::Alloc { key, value, source });
        }
        match self.map.try_reserve(1) {
            Ok(()) => {}
            Err(TryReserveError::CapacityOverflow) => {
                return Err(TryInsertError::Full { key, value });
            }
            Err(source) => return Err(TryInsertError::Alloc { key, value, source }),
        }
        let prev = self.map.insert(key, value);
        debug_assert!(prev.is_none());
        Ok(())
    }
}
