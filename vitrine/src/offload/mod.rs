//! Offload manager for background task execution.
//!
//! Stale-while-revalidate returns the cached response immediately and hands
//! the network refresh to an [`OffloadManager`].
//!
//! # Example
//!
//! ```ignore
//! use vitrine::offload::{OffloadConfig, OffloadManager};
//!
//! let manager = OffloadManager::new(OffloadConfig::default());
//! manager.spawn_with_key("https://example.com/app.js", async {
//!     // refresh logic here
//! });
//! ```

mod manager;
mod policy;

pub use manager::OffloadManager;
pub use policy::{OffloadConfig, TimeoutPolicy};
