//! Replicated state storage.
//!
//! | module    | contents                                               |
//! |-----------|-----------------------------------------------------------|
//! | `error`   | [`StoreError`] / [`StoreResult`]                            |
//! | `store`   | the [`StateStore`] facade, [`StoreBackend`], [`FlushReport`] |
//! | `memory`  | [`MemoryBackend`], an in-process `HashMap`-backed store      |
//! | `sqlite`  | [`SqliteBackend`] (feature `sqlite`)                         |
//!
//! A `StateStore` buffers `StateUpdate`s for an entire timestep (a
//! `Runner`'s `do_step` hands them in as agents finish stepping), then
//! applies them in one stable-sorted pass on `flush()` so the final
//! on-disk/in-memory order matches `(store_name, order_key)` regardless of
//! arrival order. The buffering and sorting live in [`store::StateStore`];
//! only the "what does applying one update actually do" part is
//! backend-specific, via [`store::StoreBackend::apply`].

pub mod error;
pub mod memory;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryBackend;
pub use store::{FlushReport, StateStore, StoreBackend};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;
