//! Event processors.
//!
//! - `PaymentChannel`: receives `ChannelEvent`, emits `RouteRequest`
//! - `OutcomeRouter`: receives `RouteRequest`, finishes the session and
//!   navigates to its terminal screen

pub mod outcome_router;
pub mod payment_channel;

pub use outcome_router::{OutcomeRouter, Routed};
pub use payment_channel::{ChannelError, PaymentChannel};
