// #![warn(missing_docs)]
//! Traits and structs for cache partition interaction.
//!
//! A partition is an isolated named store of responses. The router only talks
//! to the [`Backend`] trait; [`MemoryPartition`] is the in-process
//! implementation and [`CacheStorage`] is the registry that opens, lists and
//! deletes partitions by name.
mod backend;
mod error;
mod expiration;
mod memory;
mod storage;

pub use backend::{Backend, BackendResult};
pub use error::BackendError;
pub use expiration::Expiration;
pub use memory::MemoryPartition;
pub use storage::CacheStorage;

/// Status of deleting result.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}
