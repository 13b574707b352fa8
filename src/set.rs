//! ChunkedHashSet: the value-only variant, a chunk list with `()` values.

use crate::ceiling::CapacityCeiling;
use crate::chunks::{ChunkList, ChunkState};
use crate::config::Builder;
use crate::iter;
use crate::table::InsertError;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;

/// A hash set that never hits a per-table size limit.
///
/// Shares its chunking behaviour with [`ChunkedHashMap`](crate::ChunkedHashMap).
///
/// ```
/// use chunked_hashmap::ChunkedHashSet;
///
/// let mut s: ChunkedHashSet<_> = [1, 2, 3].into();
/// assert!(s.insert(4));
/// assert!(!s.insert(4));
/// assert!(s.remove(&1));
/// assert_eq!(s.len(), 3);
/// ```
pub struct ChunkedHashSet<T, S = RandomState> {
    base: ChunkList<T, (), S>,
}

impl<T> ChunkedHashSet<T> {
    pub fn new() -> Self {
        Builder::new().build_set()
    }
}

impl<T, S> ChunkedHashSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Builder::with_hasher(hasher).build_set()
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

    pub fn ceiling(&self) -> &'static CapacityCeiling {
        self.base.ceiling()
    }

    pub fn chunk_count(&self) -> usize {
        self.base.chunks().len()
    }

    pub fn chunk_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.base.chunk_lens()
    }

    pub fn chunk_states(&self) -> impl Iterator<Item = ChunkState> + '_ {
        self.base.chunk_states()
    }

    pub fn clear(&mut self) {
        self.base.clear();
    }

    #[doc(alias = "keys")]
    #[doc(alias = "values")]
    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter {
            inner: iter::Iter::new(self.base.chunks(), self.base.len()),
        }
    }

    /// Each element paired with itself, mirroring the map's `(key, value)` shape.
    pub fn entries(&self) -> Entries<'_, T, S> {
        Entries { inner: self.iter() }
    }

    /// Call `f(cx, value, value, set)` once per element, in iteration order.
    pub fn for_each_with<C, F>(&self, cx: &mut C, mut f: F)
    where
        F: FnMut(&mut C, &T, &T, &Self),
    {
        for value in self.iter() {
            f(cx, value, value, self);
        }
    }
}

impl<T, S> ChunkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.contains_key(q)
    }

    /// The stored element equal to `q`, if any.
    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.get_key_value(q).map(|(t, _)| t)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.remove_entry(q).is_some()
    }

    /// Remove and return the element equal to `q`.
    pub fn take<Q>(&mut self, q: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.remove_entry(q).map(|(t, ())| t)
    }
}

impl<T, S> ChunkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// Add `value`. Returns whether it was newly inserted; an existing equal
    /// element is kept as is.
    pub fn insert(&mut self, value: T) -> bool {
        match self.try_insert(value) {
            Ok(added) => added,
            Err(e) => e.abort(),
        }
    }

    pub fn try_insert(&mut self, value: T) -> Result<bool, InsertError<T, ()>> {
        // Updating a present element swaps `()` for `()` and keeps the
        // stored element.
        self.base.try_insert(value, ()).map(|prev| prev.is_none())
    }
}

impl<T: Clone, S: Clone> Clone for ChunkedHashSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
        }
    }
}

impl<T, S: Default> Default for ChunkedHashSet<T, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T: fmt::Debug, S> fmt::Debug for ChunkedHashSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> PartialEq for ChunkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl<T, S> Eq for ChunkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T, S> Extend<T> for ChunkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for t in iter {
            self.insert(t);
        }
    }
}

impl<'a, T, S> Extend<&'a T> for ChunkedHashSet<T, S>
where
    T: Eq + Hash + Copy + 'a,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, S> FromIterator<T> for ChunkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, const N: usize> From<[T; N]> for ChunkedHashSet<T>
where
    T: Eq + Hash,
{
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

/// Adopts a plain set as the first chunk when it fits in one table.
impl<T, S> From<hashbrown::HashSet<T, S>> for ChunkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn from(set: hashbrown::HashSet<T, S>) -> Self {
        let hasher = set.hasher().clone();
        let mut map = hashbrown::HashMap::with_capacity_and_hasher(set.len(), hasher.clone());
        map.extend(set.into_iter().map(|t| (t, ())));
        Self {
            base: ChunkList::wrap(map, Builder::with_hasher(hasher)),
        }
    }
}

/// Iterator over the elements of a [`ChunkedHashSet`].
pub struct Iter<'a, T, S> {
    inner: iter::Iter<'a, T, (), S>,
}

impl<T, S> Clone for Iter<'_, T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T, S> Iterator for Iter<'a, T, S> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(t, _)| t)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, S> ExactSizeIterator for Iter<'_, T, S> {}
impl<T, S> FusedIterator for Iter<'_, T, S> {}

/// Iterator over `(&T, &T)` pairs of a [`ChunkedHashSet`].
pub struct Entries<'a, T, S> {
    inner: Iter<'a, T, S>,
}

impl<'a, T, S> Iterator for Entries<'a, T, S> {
    type Item = (&'a T, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|t| (t, t))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, S> ExactSizeIterator for Entries<'_, T, S> {}
impl<T, S> FusedIterator for Entries<'_, T, S> {}

/// Owning iterator over the elements of a [`ChunkedHashSet`].
pub struct IntoIter<T, S> {
    inner: iter::IntoIter<T, (), S>,
}

impl<T, S> Iterator for IntoIter<T, S> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(t, ())| t)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, S> ExactSizeIterator for IntoIter<T, S> {}
impl<T, S> FusedIterator for IntoIter<T, S> {}

impl<'a, T, S> IntoIterator for &'a ChunkedHashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> IntoIterator for ChunkedHashSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T, S>;

    fn into_iter(self) -> Self::IntoIter {
        let len = self.base.len();
        IntoIter {
            inner: iter::IntoIter::new(self.base.into_chunks(), len),
        }
    }
}
