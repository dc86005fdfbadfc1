//! Event channel factories and handles.

use super::types::{ChannelEvent, RouteRequest};
use tokio::sync::mpsc;

/// Default buffer size for event channels.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for ChannelEvent events.
pub type ChannelEventSender = mpsc::Sender<ChannelEvent>;
/// Receiver handle for ChannelEvent events.
pub type ChannelEventReceiver = mpsc::Receiver<ChannelEvent>;

/// Sender handle for RouteRequest events.
pub type RouteRequestSender = mpsc::Sender<RouteRequest>;
/// Receiver handle for RouteRequest events.
pub type RouteRequestReceiver = mpsc::Receiver<RouteRequest>;

/// Create a new ChannelEvent channel.
///
/// The host keeps the sender; the single `PaymentChannel` owns the receiver.
pub fn channel_event_channel() -> (ChannelEventSender, ChannelEventReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Create a new RouteRequest channel.
///
/// Both the `PaymentChannel` and the back-button path hold senders; the
/// `OutcomeRouter` is the only consumer.
pub fn route_request_channel() -> (RouteRequestSender, RouteRequestReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Senders handed to the host so it can feed both processors.
#[derive(Clone, Debug)]
pub struct EventSenders {
    /// Raw signals from the embedded surface.
    pub channel_event: ChannelEventSender,
    /// Outcomes that bypass classification (user cancel).
    pub route_request: RouteRequestSender,
}

impl EventSenders {
    pub fn new(channel_event: ChannelEventSender, route_request: RouteRequestSender) -> Self {
        Self {
            channel_event,
            route_request,
        }
    }
}
