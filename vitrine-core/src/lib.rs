#![warn(missing_docs)]
//! # vitrine-core
//!
//! Core types shared by the vitrine cache router and its storage backends.
//!
//! The router is protocol-light: it only needs to know what a fetch looks
//! like, how to reach the network, and how to push work into the background.
//! This crate provides exactly those seams:
//!
//! - **Describe** a fetch ([`FetchRequest`], [`FetchResponse`])
//! - **Store** a response with its age ([`CacheValue`])
//! - **Name** a cache partition ([`PartitionLabel`])
//! - **Call** the network ([`Upstream`])
//! - **Execute** background revalidation ([`Offload`])

pub mod label;
pub mod offload;
pub mod request;
pub mod response;
pub mod upstream;
pub mod value;

pub use label::PartitionLabel;
pub use offload::{DisabledOffload, Offload};
pub use request::{Destination, FetchRequest, RequestMode};
pub use response::{CacheState, FetchResponse};
#[doc(hidden)]
pub use smol_str::SmolStr;
pub use upstream::{Upstream, UpstreamError, UpstreamResult};
pub use value::CacheValue;
