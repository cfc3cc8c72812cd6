//! Shared building blocks for the remote-objects workspace.
//!
//! Every error type in the workspace records where it was raised through
//! [`ErrorLocation`], so this crate sits at the bottom of the dependency graph:
//!
//! - **common** (this crate): error location tracking
//! - **models**: wire data structures (descriptors, frames)
//! - **rpc-core**: codec, registry, dispatcher, transport
//! - **remote-objects**: the server binary

pub mod error;

pub use error::error_location::ErrorLocation;
