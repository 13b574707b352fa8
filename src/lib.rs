//! chunked-hashmap: hash map and hash set variants that keep accepting
//! entries when the environment caps how large any single table may grow.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: behave like an ordinary map/set for lookup, iteration and
//!   mutation while transparently splitting storage across bounded tables.
//! - Layers:
//!   - Table<K, V, S>: one bounded hashbrown map. Rejects a new key once
//!     it holds its bound, and reports allocator failure separately.
//!   - ChunkList<K, V, S>: ordered list of tables ("chunks"). Decides
//!     where a new key goes, appends a chunk when the last one is full,
//!     splices out chunks that become empty, and tracks removals that
//!     may be backfilled.
//!   - ChunkedHashMap / ChunkedHashSet: public API. The set is the
//!     same list with `()` values.
//!
//! Capacity discovery
//! - The per-table limit is not known up front. The first insertion a table
//!   rejects records that table's length in a shared [`CapacityCeiling`];
//!   later chunks are compared against the cached number instead of being
//!   tried again. The cell is process-wide by default and can be replaced
//!   per container through [`Builder::ceiling`].
//! - Capacity rejections never reach the caller. Allocation failures are
//!   surfaced by `try_insert` and are fatal for `insert`, as in `std`.
//!
//! Reuse of freed slots
//! - With [`Reclaim::Backfill`] (default), a removal from any chunk but the
//!   last bumps an approximate hint; while the hint is non-zero, new keys
//!   are first offered to earlier chunks. The hint may over- or under-count;
//!   only `len`/containment are exact.
//! - With [`Reclaim::AppendOnly`], new keys only ever go to the last chunk.
//!
//! Iteration
//! - Iterators concatenate each chunk's own iteration in chunk order. After
//!   a backfill, that order is no longer insertion order.
//!
//! Notes and non-goals
//! - Single-threaded use per instance; only the ceiling cell is atomic.
//! - Cost of every operation is linear in the number of chunks, not in the
//!   number of entries.
//! - No persistence and no eviction.

mod ceiling;
mod chunks;
mod config;
mod container;
mod external_trait_impls;
pub mod iter;
mod map;
pub mod set;
mod table;

// Public surface
pub use ceiling::CapacityCeiling;
pub use chunks::ChunkState;
pub use config::{Builder, Reclaim};
pub use container::Container;
pub use map::ChunkedHashMap;
pub use set::ChunkedHashSet;
pub use table::InsertError;
