//! ChunkList: spreads entries across an ordered list of bounded tables.
//!
//! Layout rules:
//! - Chunks are kept in creation order; the last one is the write frontier.
//! - A key lives in at most one chunk.
//! - No chunk is ever empty; a chunk is spliced out when its last entry goes.
//!
//! Insertion walks the list once to look for the key, optionally backfills a
//! slot freed in an earlier chunk (driven by `reclaim_hint`), then tries the
//! last chunk and finally appends a new one. The per-table limit is learned
//! from the first rejected insertion and cached in a shared
//! [`CapacityCeiling`], after which full chunks are recognised by a length
//! comparison instead of another failed trial.

use crate::ceiling::CapacityCeiling;
use crate::config::{Builder, Reclaim};
use crate::table::{InsertError, Table, TableBound, TryInsertError};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
use hashbrown::{HashMap, TryReserveError};

/// Whether a chunk has been observed to reject an insertion.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChunkState {
    /// Never rejected an insertion.
    Open,
    /// Rejected an insertion at least once. Still updated in place, and still
    /// a backfill candidate once removals free space in it.
    Sealed,
}

#[derive(Clone)]
pub(crate) struct Chunk<K, V, S> {
    pub(crate) table: Table<K, V, S>,
    state: ChunkState,
}

impl<K, V, S> Chunk<K, V, S> {
    fn seal(&mut self) {
        self.state = ChunkState::Sealed;
    }
}

/// Outcome of offering a vacant key to one chunk.
enum Probe<K, V> {
    Stored,
    Full(K, V),
}

#[derive(Clone)]
pub(crate) struct ChunkList<K, V, S> {
    chunks: Vec<Chunk<K, V, S>>,
    len: usize,
    // Removals from non-final chunks not yet backfilled. Approximate.
    reclaim_hint: usize,
    hasher: S,
    bound: TableBound,
    ceiling: &'static CapacityCeiling,
    reclaim: Reclaim,
}

impl<K, V, S> ChunkList<K, V, S> {
    pub(crate) fn new(builder: Builder<S>) -> Self {
        let Builder {
            hasher,
            bound,
            ceiling,
            reclaim,
        } = builder;
        Self {
            chunks: Vec::new(),
            len: 0,
            reclaim_hint: 0,
            hasher,
            bound,
            ceiling,
            reclaim,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn ceiling(&self) -> &'static CapacityCeiling {
        self.ceiling
    }

    pub(crate) fn chunks(&self) -> &[Chunk<K, V, S>] {
        &self.chunks
    }

    pub(crate) fn chunks_mut(&mut self) -> &mut [Chunk<K, V, S>] {
        &mut self.chunks
    }

    pub(crate) fn into_chunks(self) -> Vec<Chunk<K, V, S>> {
        self.chunks
    }

    pub(crate) fn chunk_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.chunks.iter().map(|c| c.table.len())
    }

    pub(crate) fn chunk_states(&self) -> impl Iterator<Item = ChunkState> + '_ {
        self.chunks.iter().map(|c| c.state)
    }

    #[cfg(test)]
    pub(crate) fn reclaim_hint(&self) -> usize {
        self.reclaim_hint
    }

    /// Drop every chunk. The shared ceiling is left alone: it describes the
    /// environment, not this list.
    pub(crate) fn clear(&mut self) {
        self.chunks.clear();
        self.len = 0;
        self.reclaim_hint = 0;
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert_eq!(
            self.len,
            self.chunks.iter().map(|c| c.table.len()).sum::<usize>()
        );
        debug_assert!(self.chunks.iter().all(|c| !c.table.is_empty()));
    }
}

impl<K, V, S> ChunkList<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.chunks.iter().find_map(|c| c.table.get_key_value(q))
    }

    pub(crate) fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.chunks.iter_mut().find_map(|c| c.table.get_mut(q))
    }

    pub(crate) fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.chunks.iter().any(|c| c.table.contains_key(q))
    }

    pub(crate) fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let last = self.chunks.len().checked_sub(1)?;
        let (index, entry) = self
            .chunks
            .iter_mut()
            .enumerate()
            .find_map(|(i, c)| c.table.remove_entry(q).map(|e| (i, e)))?;
        self.len -= 1;
        if self.chunks[index].table.is_empty() {
            self.chunks.remove(index);
        } else if index != last && self.reclaim == Reclaim::Backfill {
            self.reclaim_hint += 1;
        }
        self.debug_check();
        Some(entry)
    }
}

impl<K, V, S> ChunkList<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// Adopt `map` as the only chunk when it fits within one table; otherwise
    /// fall back to inserting its entries one at a time.
    pub(crate) fn wrap(map: HashMap<K, V, S>, builder: Builder<S>) -> Self {
        let mut list = Self::new(builder);
        if map.is_empty() {
            return list;
        }
        if map.len() <= list.bound.get() {
            list.len = map.len();
            list.chunks.push(Chunk {
                table: Table::from_map(map, list.bound),
                state: ChunkState::Open,
            });
        } else {
            for (key, value) in map {
                if let Err(e) = list.try_insert(key, value) {
                    e.abort();
                }
            }
        }
        list.debug_check();
        list
    }

    /// Insert or update `key`. Returns the previous value on update.
    ///
    /// Capacity rejections are absorbed here; only allocator failures
    /// surface, with the entry handed back.
    pub(crate) fn try_insert(
        &mut self,
        key: K,
        value: V,
    ) -> Result<Option<V>, InsertError<K, V>> {
        let last = match self.chunks.len().checked_sub(1) {
            Some(last) => last,
            None => {
                self.push_chunk(key, value)?;
                self.len += 1;
                self.debug_check();
                return Ok(None);
            }
        };

        // An existing key is updated in whichever chunk already holds it.
        for chunk in &mut self.chunks {
            if let Some(slot) = chunk.table.get_mut(&key) {
                return Ok(Some(mem::replace(slot, value)));
            }
        }

        let (mut key, mut value) = (key, value);
        if self.reclaim == Reclaim::Backfill && self.reclaim_hint > 0 {
            for index in 0..last {
                match self.probe_vacant(index, key, value)? {
                    Probe::Stored => {
                        self.reclaim_hint -= 1;
                        self.len += 1;
                        self.debug_check();
                        return Ok(None);
                    }
                    Probe::Full(k, v) => {
                        key = k;
                        value = v;
                    }
                }
            }
            // Every earlier chunk was full: the hint was stale.
            self.reclaim_hint = 0;
        }

        match self.probe_vacant(last, key, value)? {
            Probe::Stored => {}
            Probe::Full(key, value) => self.push_chunk(key, value)?,
        }
        self.len += 1;
        self.debug_check();
        Ok(None)
    }

    /// Offer a key known to be absent from every chunk to chunk `index`.
    ///
    /// Once the ceiling is cached a chunk at or above it is rejected without a
    /// trial. Otherwise the table is tried directly, and a capacity rejection
    /// records the chunk's length as the ceiling.
    fn probe_vacant(
        &mut self,
        index: usize,
        key: K,
        value: V,
    ) -> Result<Probe<K, V>, InsertError<K, V>> {
        let ceiling = self.ceiling;
        let chunk = &mut self.chunks[index];
        if ceiling.is_reached_by(chunk.table.len()) {
            chunk.seal();
            return Ok(Probe::Full(key, value));
        }
        match chunk.table.try_insert_unique(key, value) {
            Ok(()) => Ok(Probe::Stored),
            Err(TryInsertError::Full { key, value }) => {
                ceiling.record(chunk.table.len());
                chunk.seal();
                Ok(Probe::Full(key, value))
            }
            Err(TryInsertError::Alloc { key, value, source }) => {
                Err(InsertError { key, value, source })
            }
        }
    }

    fn push_chunk(&mut self, key: K, value: V) -> Result<(), InsertError<K, V>> {
        let mut table = Table::with_hasher(self.hasher.clone(), self.bound);
        match table.try_insert_unique(key, value) {
            Ok(()) => {
                self.chunks.push(Chunk {
                    table,
                    state: ChunkState::Open,
                });
                Ok(())
            }
            // An empty table refusing a single entry cannot be fixed by
            // another chunk.
            Err(TryInsertError::Full { key, value }) => Err(InsertError {
                key,
                value,
                source: TryReserveError::CapacityOverflow,
            }),
            Err(TryInsertError::Alloc { key, value, source }) => {
                Err(InsertError { key, value, source })
            }
        }
    }
}
