//! ChunkedHashMap: public key-value surface over [`ChunkList`].

use crate::ceiling::CapacityCeiling;
use crate::chunks::{ChunkList, ChunkState};
use crate::config::Builder;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::table::InsertError;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use std::collections::hash_map::RandomState;

/// A hash map that never hits a per-table size limit.
///
/// Entries are spread over an ordered list of bounded tables ("chunks").
/// Lookups and removals walk the chunks in order; inserts go to the newest
/// chunk unless an earlier one has room freed by a removal. Every operation
/// costs at most one table access per chunk.
///
/// Iteration yields each chunk's entries in turn. Once a removed slot in an
/// earlier chunk has been refilled, iteration order no longer follows the
/// order in which keys were first inserted.
///
/// ```
/// use chunked_hashmap::ChunkedHashMap;
///
/// let mut m = ChunkedHashMap::new();
/// m.insert("a", 1);
/// m.insert("b", 2);
/// assert_eq!(m.get("a"), Some(&1));
/// assert_eq!(m.remove("b"), Some(2));
/// assert_eq!(m.len(), 1);
/// ```
pub struct ChunkedHashMap<K, V, S = RandomState> {
    pub(crate) base: ChunkList<K, V, S>,
}

impl<K, V> ChunkedHashMap<K, V> {
    /// An empty map with no chunks.
    pub fn new() -> Self {
        Builder::new().build_map()
    }
}

impl<K, V, S> ChunkedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Builder::with_hasher(hasher).build_map()
    }

    pub(crate) fn from_builder(builder: Builder<S>) -> Self {
        Self {
            base: ChunkList::new(builder),
        }
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn hasher(&self) -> &S {
        self.base.hasher()
    }

    /// Cell this map caches the discovered per-table ceiling in.
    pub fn ceiling(&self) -> &'static CapacityCeiling {
        self.base.ceiling()
    }

    /// Number of chunks currently backing the map.
    pub fn chunk_count(&self) -> usize {
        self.base.chunks().len()
    }

    /// Size of each chunk, oldest first.
    pub fn chunk_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.base.chunk_lens()
    }

    /// State of each chunk, oldest first.
    pub fn chunk_states(&self) -> impl Iterator<Item = ChunkState> + '_ {
        self.base.chunk_states()
    }

    /// Remove every entry and drop every chunk.
    pub fn clear(&mut self) {
        self.base.clear();
    }

    #[doc(alias = "entries")]
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter::new(self.base.chunks(), self.base.len())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, S> {
        let len = self.base.len();
        IterMut::new(self.base.chunks_mut(), len)
    }

    pub fn keys(&self) -> Keys<'_, K, V, S> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, S> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V, S> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Call `f(cx, value, key, map)` once per entry, in iteration order.
    ///
    /// `cx` is threaded through every call, so the callback can accumulate
    /// into caller-owned state without capturing it.
    pub fn for_each_with<C, F>(&self, cx: &mut C, mut f: F)
    where
        F: FnMut(&mut C, &V, &K, &Self),
    {
        for (k, v) in self.iter() {
            f(cx, v, k, self);
        }
    }
}

impl<K, V, S> ChunkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.get_key_value(q)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.get_mut(q)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.contains_key(q)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.remove_entry(q)
    }
}

impl<K, V, S> ChunkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// Insert `key`, returning the value it replaced.
    ///
    /// Full chunks are handled internally. Allocation failure is fatal, as for
    /// `std::collections::HashMap`; use [`try_insert`](Self::try_insert) to
    /// observe it instead.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.base.try_insert(key, value) {
            Ok(prev) => prev,
            Err(e) => e.abort(),
        }
    }

    /// Like [`insert`](Self::insert), but returns the entry with an error
    /// when memory for it could not be allocated.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, InsertError<K, V>> {
        self.base.try_insert(key, value)
    }
}

impl<K, V, S> Clone for ChunkedHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
        }
    }
}

impl<K, V, S> Default for ChunkedHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> fmt::Debug for ChunkedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for ChunkedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| v == ov))
    }
}

impl<K, V, S> Eq for ChunkedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> Index<&Q> for ChunkedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key not found in ChunkedHashMap"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for ChunkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S> Extend<(&'a K, &'a V)> for ChunkedHashMap<K, V, S>
where
    K: Eq + Hash + Copy,
    V: Copy,
    S: BuildHasher + Clone,
{
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(&k, &v)| (k, v)));
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChunkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ChunkedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

/// Adopts a plain map as the first chunk without re-inserting its entries,
/// as long as it fits in one table.
impl<K, V, S> From<hashbrown::HashMap<K, V, S>> for ChunkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn from(map: hashbrown::HashMap<K, V, S>) -> Self {
        let builder = Builder::with_hasher(map.hasher().clone());
        Self {
            base: ChunkList::wrap(map, builder),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChunkedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChunkedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for ChunkedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        let len = self.base.len();
        IntoIter::new(self.base.into_chunks(), len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded<K, V>(cell: &'static CapacityCeiling, bound: usize) -> ChunkedHashMap<K, V> {
        Builder::new().table_bound(bound).ceiling(cell).build_map()
    }

    /// Invariant: insert reports the replaced value and never grows `len` on update.
    #[test]
    fn insert_overwrite() {
        static CELL: CapacityCeiling = CapacityCeiling::new();
        let mut m = bounded(&CELL, 2);
        assert_eq!(m.insert(1, 10), None);
        assert_eq!(m.insert(2, 20), None);
        assert_eq!(m.insert(3, 30), None);
        assert_eq!(m.insert(1, 11), Some(10));
        assert_eq!(m.insert(3, 33), Some(30));
        assert_eq!(m.len(), 3);
        assert_eq!(m[&1], 11);
        assert_eq!(m[&3], 33);
    }

    /// Invariant: borrowed lookup works (store `String`, query with `&str`).
    #[test]
    fn borrowed_lookup_with_str() {
        static CELL: CapacityCeiling = CapacityCeiling::new();
        let mut m = bounded(&CELL, 1);
        m.insert("hello".to_string(), 1);
        m.insert("world".to_string(), 2);
        assert_eq!(m.chunk_count(), 2);
        assert!(m.contains_key("hello"));
        assert_eq!(m.get("world"), Some(&2));
        assert_eq!(m.get_key_value("world"), Some((&"world".to_string(), &2)));
        assert!(!m.contains_key("nope"));
    }

    /// Invariant: get_mut writes through to the chunk holding the key.
    #[test]
    fn get_mut_in_older_chunk() {
        static CELL: CapacityCeiling = CapacityCeiling::new();
        let mut m = bounded(&CELL, 2);
        m.extend([(1, 1), (2, 2), (3, 3)]);
        *m.get_mut(&1).unwrap() = 100;
        assert_eq!(m.get(&1), Some(&100));
        assert_eq!(m.remove_entry(&1), Some((1, 100)));
        assert_eq!(m.remove(&1), None);
    }

    /// Invariant: the traversal callback runs once per entry and sees the
    /// same pairs as `iter`.
    #[test]
    fn for_each_with_visits_all() {
        static CELL: CapacityCeiling = CapacityCeiling::new();
        let mut m = bounded(&CELL, 3);
        m.extend((0..10).map(|i| (i, i * 2)));
        let mut seen = Vec::new();
        m.for_each_with(&mut seen, |seen, v, k, map| {
            assert_eq!(map.get(k), Some(v));
            seen.push((*k, *v));
        });
        let expected: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(seen, expected);
    }

    /// Invariant: equality ignores chunk layout and insertion order.
    #[test]
    fn equality_across_layouts() {
        static CELL: CapacityCeiling = CapacityCeiling::new();
        let mut a = bounded(&CELL, 2);
        let mut b = ChunkedHashMap::new();
        for i in 0..5 {
            a.insert(i, i);
            b.insert(4 - i, 4 - i);
        }
        assert_eq!(a.chunk_count(), 3);
        assert_eq!(a, b);
        b.insert(0, 99);
        assert_ne!(a, b);
        b.insert(0, 0);
        b.insert(5, 5);
        assert_ne!(a, b);
    }

    /// Invariant: comparison and lookup only need a `BuildHasher`; the
    /// hasher has to be `Clone` only to insert.
    #[test]
    fn lookup_without_clone_hasher() {
        struct Fixed;
        impl BuildHasher for Fixed {
            type Hasher = std::collections::hash_map::DefaultHasher;
            fn build_hasher(&self) -> Self::Hasher {
                Default::default()
            }
        }
        fn is_eq<T: Eq>(_: &T) {}

        let mut m: ChunkedHashMap<u8, u8, Fixed> = ChunkedHashMap::with_hasher(Fixed);
        is_eq(&m);
        assert!(m.get(&1).is_none());
        assert!(m.remove(&1).is_none());
        assert!(m == ChunkedHashMap::with_hasher(Fixed));
    }

    /// Invariant: an allocator failure comes back from `try_insert` with the
    /// entry, and the map is unchanged.
    #[test]
    fn try_insert_reports_alloc_failure() {
        static CELL: CapacityCeiling = CapacityCeiling::new();
        let mut m = bounded(&CELL, 2);
        m.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
        let before: Vec<usize> = m.chunk_lens().collect();

        crate::table::alloc_failure::arm();
        let err = m.try_insert(4, 'd').unwrap_err();
        assert_eq!(err.into_inner(), (4, 'd'));
        assert_eq!(m.len(), 3);
        assert_eq!(m.chunk_lens().collect::<Vec<_>>(), before);
        assert!(!m.contains_key(&4));

        assert_eq!(m.try_insert(4, 'd').unwrap(), None);
        assert_eq!(m.len(), 4);
    }

    /// Invariant: Debug prints as a plain map.
    #[test]
    fn debug_is_map_like() {
        let mut m = ChunkedHashMap::new();
        m.insert("k", 1);
        assert_eq!(format!("{:?}", m), r#"{"k": 1}"#);
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn index_missing_panics() {
        let m: ChunkedHashMap<u8, u8> = ChunkedHashMap::new();
        let _ = m[&0];
    }
}
