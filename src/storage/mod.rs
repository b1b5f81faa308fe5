//! The store facade and its contracts.
//!
//! [`StoreReader`] and [`StoreWriter`] are what the resolver layer talks to;
//! [`InMemoryStore`] implements both behind a single reader/writer lock.

mod memory;
pub(crate) mod state;
mod traits;

pub use memory::{InMemoryStore, StoreStats};
pub use traits::{StoreReader, StoreWriter};
