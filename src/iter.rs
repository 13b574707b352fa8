//! Iterators that flatten every chunk's own iteration, in chunk order.
//!
//! Each iterator borrows (or owns) the chunk list and walks one table at a
//! time. The total item count is known up front, so all of them are exact.

use crate::chunks::Chunk;
use core::fmt;
use core::iter::FusedIterator;
use core::slice;
use hashbrown::hash_map;

/// Iterator over `(&K, &V)` pairs of a [`ChunkedHashMap`](crate::ChunkedHashMap).
pub struct Iter<'a, K, V, S> {
    chunks: slice::Iter<'a, Chunk<K, V, S>>,
    current: Option<hash_map::Iter<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V, S> Iter<'a, K, V, S> {
    pub(crate) fn new(chunks: &'a [Chunk<K, V, S>], len: usize) -> Self {
        Self {
            chunks: chunks.iter(),
            current: None,
            remaining: len,
        }
    }
}

impl<K, V, S> Clone for Iter<'_, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            chunks: self.chunks.clone(),
            current: self.current.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(entry);
            }
            self.current = Some(self.chunks.next()?.table.iter());
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, S> ExactSizeIterator for Iter<'_, K, V, S> {}
impl<K, V, S> FusedIterator for Iter<'_, K, V, S> {}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for Iter<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Iterator over `(&K, &mut V)` pairs.
pub struct IterMut<'a, K, V, S> {
    chunks: slice::IterMut<'a, Chunk<K, V, S>>,
    current: Option<hash_map::IterMut<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V, S> IterMut<'a, K, V, S> {
    pub(crate) fn new(chunks: &'a mut [Chunk<K, V, S>], len: usize) -> Self {
        Self {
            chunks: chunks.iter_mut(),
            current: None,
            remaining: len,
        }
    }
}

impl<'a, K, V, S> Iterator for IterMut<'a, K, V, S> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(entry);
            }
            self.current = Some(self.chunks.next()?.table.iter_mut());
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, S> ExactSizeIterator for IterMut<'_, K, V, S> {}
impl<K, V, S> FusedIterator for IterMut<'_, K, V, S> {}

/// Owning iterator over `(K, V)` pairs.
pub struct IntoIter<K, V, S> {
    chunks: std::vec::IntoIter<Chunk<K, V, S>>,
    current: Option<hash_map::IntoIter<K, V>>,
    remaining: usize,
}

impl<K, V, S> IntoIter<K, V, S> {
    pub(crate) fn new(chunks: Vec<Chunk<K, V, S>>, len: usize) -> Self {
        Self {
            chunks: chunks.into_iter(),
            current: None,
            remaining: len,
        }
    }
}

impl<K, V, S> Iterator for IntoIter<K, V, S> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        loop {
            if let Some(entry) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(entry);
            }
            self.current = Some(self.chunks.next()?.table.into_entries());
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, S> ExactSizeIterator for IntoIter<K, V, S> {}
impl<K, V, S> FusedIterator for IntoIter<K, V, S> {}

/// Iterator over the keys of a map, in the same order as [`Iter`].
pub struct Keys<'a, K, V, S> {
    pub(crate) inner: Iter<'a, K, V, S>,
}

impl<K, V, S> Clone for Keys<'_, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, S> Iterator for Keys<'a, K, V, S> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, S> ExactSizeIterator for Keys<'_, K, V, S> {}
impl<K, V, S> FusedIterator for Keys<'_, K, V, S> {}

/// Iterator over the values of a map, in the same order as [`Iter`].
pub struct Values<'a, K, V, S> {
    pub(crate) inner: Iter<'a, K, V, S>,
}

impl<K, V, S> Clone for Values<'_, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, S> Iterator for Values<'a, K, V, S> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, S> ExactSizeIterator for Values<'_, K, V, S> {}
impl<K, V, S> FusedIterator for Values<'_, K, V, S> {}

/// Iterator over mutable references to the values of a map.
pub struct ValuesMut<'a, K, V, S> {
    pub(crate) inner: IterMut<'a, K, V, S>,
}

impl<'a, K, V, S> Iterator for ValuesMut<'a, K, V, S> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, S> ExactSizeIterator for ValuesMut<'_, K, V, S> {}
impl<K, V, S> FusedIterator for ValuesMut<'_, K, V, S> {}
