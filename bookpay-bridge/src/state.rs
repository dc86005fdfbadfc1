//! Application state shared across all request handlers.

use bookpay_core::config::{AmountConfig, ChannelPolicy, ConfigStore};
use bookpay_core::events::{
    ChannelEventReceiver, EventSenders, RouteRequestReceiver, channel_event_channel,
    route_request_channel,
};
use bookpay_core::processors::{OutcomeRouter, PaymentChannel};
use bookpay_core::reconcile::{HoldReleaser, Reconciliation};
use bookpay_core::screens::RouteBoard;
use bookpay_core::session::{CheckoutBackend, SessionFactory, SessionRegistry};
use bookpay_core::store::{LocalStore, WalletTrail};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub registry: SessionRegistry,
    pub factory: SessionFactory,
    pub senders: EventSenders,
    pub board: RouteBoard,
    pub reconciliation: Reconciliation,
    /// Reloaded on SIGHUP.
    pub policy: ConfigStore<ChannelPolicy>,
    /// Reloaded on SIGHUP.
    pub amount: ConfigStore<AmountConfig>,
}

/// The two processors and their receivers, ready to spawn.
pub struct Pipeline {
    channel: PaymentChannel,
    channel_rx: ChannelEventReceiver,
    router: OutcomeRouter,
    route_rx: RouteRequestReceiver,
}

impl Pipeline {
    pub fn spawn(self, shutdown_rx: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        vec![
            tokio::spawn(self.channel.run(shutdown_rx.clone(), self.channel_rx)),
            tokio::spawn(self.router.run(shutdown_rx, self.route_rx)),
        ]
    }
}

impl AppState {
    /// Wire the session factory, channel and router around shared handles.
    pub fn new(
        backend: Arc<dyn CheckoutBackend>,
        releaser: Arc<dyn HoldReleaser>,
        store: Arc<dyn LocalStore>,
        policy: ChannelPolicy,
        amount: AmountConfig,
    ) -> (Self, Pipeline) {
        let registry = SessionRegistry::new();
        let trail = WalletTrail::new(store);
        let board = RouteBoard::new();
        let reconciliation = Reconciliation::new(releaser, trail.clone());
        let policy = ConfigStore::new(policy);

        let (channel_tx, channel_rx) = channel_event_channel();
        let (route_tx, route_rx) = route_request_channel();

        let pipeline = Pipeline {
            channel: PaymentChannel::new(registry.clone(), policy.clone(), route_tx.clone()),
            channel_rx,
            router: OutcomeRouter::new(
                registry.clone(),
                reconciliation.clone(),
                Arc::new(board.clone()),
            ),
            route_rx,
        };

        let state = Self {
            factory: SessionFactory::new(backend, registry.clone(), trail),
            registry,
            senders: EventSenders::new(channel_tx, route_tx),
            board,
            reconciliation,
            policy,
            amount: ConfigStore::new(amount),
        };
        (state, pipeline)
    }
}
