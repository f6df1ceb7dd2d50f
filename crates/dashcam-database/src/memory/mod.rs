//! In-process store provider.
//!
//! Holds every table in one [`tokio::sync::RwLock`], so each operation is
//! atomic and finalize is naturally serialised. Data is lost on restart.

pub mod store;

pub use store::MemoryStore;
