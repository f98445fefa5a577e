//! # Profiles
//!
//! Gateway to the external user directory.
//!
//! ## Contract
//!
//! - Input is a fid, a positive integer picked by the caller
//! - Exactly one outbound request per lookup, no caching, no retries
//! - Output is a [`ProfileRecord`] or one of three [`FetchError`] kinds
//!
//! ## Mapping
//!
//! | Upstream | Result |
//! |----------|--------|
//! | empty `users`, or 404 | `NotFound` |
//! | transport error, timeout, other non-2xx | `UpstreamUnavailable` |
//! | undecodable body, missing fid/username/display name | `Malformed` |
//! | missing bio or counts | empty string / zero |
//!
//! Upstream error detail is logged and never leaves this crate.
use thiserror::Error;

pub mod models;
pub mod remote;

pub use models::ProfileRecord;
pub use remote::Directory;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    #[error("User not found")]
    NotFound,

    #[error("Directory unavailable")]
    UpstreamUnavailable,

    #[error("Malformed directory response")]
    Malformed,
}
