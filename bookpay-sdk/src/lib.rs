//! Shared types for the booking app payment bridge.
//!
//! - [`objects`] holds the JSON shapes exchanged with the backend and with
//!   the script injected into the hosted checkout page.
//! - [`client`] (feature `client`) is a typed HTTP client for the backend.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
