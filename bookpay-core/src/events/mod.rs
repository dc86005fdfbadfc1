//! Event system for the payment bridge.
//!
//! # Event Flow
//!
//! 1. The host feeds `ChannelEvent`s (navigation attempts, script messages)
//!    -> `PaymentChannel`
//! 2. `PaymentChannel` classifies them and emits `RouteRequest` -> `OutcomeRouter`
//! 3. The back-button path emits `RouteRequest` -> `OutcomeRouter` directly
//!
//! Events carry the session id rather than the session; processors look the
//! session up in the registry. Several producers may emit a `RouteRequest`
//! for the same session; the router acts on the first one only.

pub mod channels;
pub mod types;

pub use channels::{
    ChannelEventReceiver, ChannelEventSender, DEFAULT_CHANNEL_BUFFER, EventSenders,
    RouteRequestReceiver, RouteRequestSender, channel_event_channel, route_request_channel,
};

pub use types::{ChannelEvent, ChannelSignal, Classification, Outcome, RouteRequest, SignalSource};
