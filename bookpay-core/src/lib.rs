#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod amount;
pub mod channel;
pub mod config;
pub mod events;
pub mod processors;
pub mod reconcile;
pub mod screens;
pub mod session;
pub mod store;
