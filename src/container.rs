//! Container: minimal shared surface plus a type tag for introspection.
//!
//! The chunked containers are not subtypes of hashbrown's; code that needs to
//! treat them uniformly goes through this trait, and can use
//! [`Container::TYPE_NAME`] to tell a chunked container from a plain one.

use crate::map::ChunkedHashMap;
use crate::set::ChunkedHashSet;

pub trait Container {
    /// Distinct name for each container kind.
    const TYPE_NAME: &'static str;

    fn len(&self) -> usize;

    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl<K, V, S> Container for ChunkedHashMap<K, V, S> {
    const TYPE_NAME: &'static str = "ChunkedHashMap";

    fn len(&self) -> usize {
        ChunkedHashMap::len(self)
    }

    fn clear(&mut self) {
        ChunkedHashMap::clear(self)
    }
}

impl<T, S> Container for ChunkedHashSet<T, S> {
    const TYPE_NAME: &'static str = "ChunkedHashSet";

    fn len(&self) -> usize {
        ChunkedHashSet::len(self)
    }

    fn clear(&mut self) {
        ChunkedHashSet::clear(self)
    }
}

impl<K, V, S> Container for hashbrown::HashMap<K, V, S> {
    const TYPE_NAME: &'static str = "HashMap";

    fn len(&self) -> usize {
        hashbrown::HashMap::len(self)
    }

    fn clear(&mut self) {
        hashbrown::HashMap::clear(self)
    }
}

impl<T, S> Container for hashbrown::HashSet<T, S> {
    const TYPE_NAME: &'static str = "HashSet";

    fn len(&self) -> usize {
        hashbrown::HashSet::len(self)
    }

    fn clear(&mut self) {
        hashbrown::HashSet::clear(self)
    }
}
