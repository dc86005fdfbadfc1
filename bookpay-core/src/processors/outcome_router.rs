//! OutcomeRouter processor.
//!
//! The OutcomeRouter is the only consumer of `RouteRequest`s. For each one it:
//! - Moves the session from `pending` to the outcome's terminal status, or
//!   drops the request if another outcome got there first
//! - Closes the embedded surface
//! - Runs the reconciliation side effect for the outcome
//! - Replaces the navigation stack with the terminal screen
//! - Discards the session from the registry

use crate::events::{Outcome, RouteRequest, RouteRequestReceiver, SignalSource};
use crate::reconcile::Reconciliation;
use crate::screens::{Navigator, Route};
use crate::session::{PaymentSession, SessionRegistry, SessionStatus, TransitionError};
use bookpay_sdk::objects::PaymentTarget;
use kanau::processor::Processor;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// What a route request ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// The session finished and the stack was reset to `route`.
    Navigated { route: Route },
    /// The session had already finished as `winner`; nothing happened.
    Ignored { winner: SessionStatus },
    /// No such session, usually because it was already routed and discarded.
    UnknownSession,
}

pub struct OutcomeRouter {
    registry: SessionRegistry,
    reconciliation: Reconciliation,
    navigator: Arc<dyn Navigator>,
}

impl OutcomeRouter {
    pub fn new(
        registry: SessionRegistry,
        reconciliation: Reconciliation,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            registry,
            reconciliation,
            navigator,
        }
    }

    /// Run the OutcomeRouter until shutdown is signaled or every sender is
    /// dropped.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>, mut route_rx: RouteRequestReceiver) {
        info!("OutcomeRouter started");

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => match changed {
                    Ok(()) if *shutdown_rx.borrow() => {
                        info!("OutcomeRouter received shutdown signal");
                        break;
                    }
                    Ok(()) => {}
                    Err(_) => {
                        info!("Shutdown sender dropped");
                        break;
                    }
                },

                request = route_rx.recv() => match request {
                    Some(request) => {
                        let _ = self.process(request).await;
                    }
                    None => {
                        info!("RouteRequest channel closed");
                        break;
                    }
                },
            }
        }

        info!("OutcomeRouter shutdown complete");
    }

    /// Finish `session` with `outcome`, at most once.
    pub async fn route(
        &self,
        session: &PaymentSession,
        outcome: Outcome,
        source: SignalSource,
    ) -> Routed {
        if let Err(TransitionError::AlreadyTerminal(winner) | TransitionError::NotTerminal(winner)) =
            session.try_finish(outcome.terminal_status())
        {
            debug!(
                session_id = %session.id(),
                source = %source,
                winner = %winner,
                "Duplicate outcome dropped"
            );
            return Routed::Ignored { winner };
        }

        info!(
            session_id = %session.id(),
            order_code = %session.order_code(),
            target = %session.target(),
            status = %session.status(),
            source = %source,
            "Payment session finished"
        );

        self.navigator.close_surface(session.id()).await;
        self.reconcile(&outcome).await;

        let route = Route::for_outcome(&outcome, source);
        self.navigator.reset_stack(session.id(), route.clone()).await;
        self.registry.remove(session.id()).await;

        Routed::Navigated { route }
    }

    /// Side effects before leaving the checkout. Failures are logged by
    /// [`Reconciliation`] and never change the route.
    async fn reconcile(&self, outcome: &Outcome) {
        match (outcome, outcome.target()) {
            (Outcome::Success { .. }, _) => {}
            (_, PaymentTarget::Booking { booking_id }) => {
                self.reconciliation
                    .release_booking_hold(*booking_id, outcome.order_code())
                    .await;
            }
            (_, PaymentTarget::Wallet { .. }) => {
                self.reconciliation.clear_wallet_trail().await;
            }
        }
    }
}

impl Processor<RouteRequest> for OutcomeRouter {
    type Output = Routed;
    type Error = Infallible;

    async fn process(&self, request: RouteRequest) -> Result<Routed, Infallible> {
        let Some(session) = self.registry.get(request.session_id).await else {
            debug!(
                session_id = %request.session_id,
                source = %request.source,
                "Route request for unknown session ignored"
            );
            return Ok(Routed::UnknownSession);
        };
        Ok(self.route(&session, request.outcome, request.source).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::confirm_cancel;
    use crate::config::{ChannelPolicy, ConfigStore};
    use crate::events::{
        ChannelEvent, ChannelSignal, Classification, channel_event_channel, route_request_channel,
    };
    use crate::processors::PaymentChannel;
    use crate::reconcile::testing::RecordingReleaser;
    use crate::screens::{FailureMount, FailureScreen, RouteBoard};
    use crate::session::test_session;
    use crate::store::{MemoryStore, TrailEntry, WalletTrail};
    use bookpay_sdk::objects::OrderCode;

    struct Harness {
        router: OutcomeRouter,
        registry: SessionRegistry,
        board: RouteBoard,
        releaser: Arc<RecordingReleaser>,
        trail: WalletTrail,
    }

    fn harness(releaser: RecordingReleaser) -> Harness {
        let registry = SessionRegistry::new();
        let board = RouteBoard::new();
        let releaser = Arc::new(releaser);
        let trail = WalletTrail::new(Arc::new(MemoryStore::new()));
        let router = OutcomeRouter::new(
            registry.clone(),
            Reconciliation::new(releaser.clone(), trail.clone()),
            Arc::new(board.clone()),
        );
        Harness {
            router,
            registry,
            board,
            releaser,
            trail,
        }
    }

    fn wallet() -> PaymentTarget {
        PaymentTarget::Wallet {
            wallet_id: "w-1".to_string(),
        }
    }

    async fn record_trail(trail: &WalletTrail) {
        trail
            .record(&TrailEntry {
                wallet_id: "w-1".to_string(),
                order_code: OrderCode::new("991"),
                amount: 100_000,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_second_outcome_is_a_no_op() {
        let h = harness(RecordingReleaser::default());
        let session = h
            .registry
            .insert(test_session(PaymentTarget::Booking { booking_id: 42 }, "ABC"))
            .await;

        let first = h
            .router
            .route(
                &session,
                Outcome::for_session(Classification::Cancelled, &session),
                SignalSource::Navigation,
            )
            .await;
        assert!(matches!(first, Routed::Navigated { .. }));

        let second = h
            .router
            .route(
                &session,
                Outcome::for_session(Classification::Success, &session),
                SignalSource::ScriptMessage,
            )
            .await;
        assert_eq!(
            second,
            Routed::Ignored {
                winner: SessionStatus::Cancelled
            }
        );

        let entry = h.board.get(session.id()).await.unwrap();
        assert_eq!(entry.resets, 1);
        assert!(entry.surface_closed);
        assert_eq!(entry.route.unwrap().screen_name(), "failure");
        assert_eq!(h.releaser.calls().len(), 1);
        assert!(h.registry.get(session.id()).await.is_none());
    }

    #[tokio::test]
    async fn test_wallet_success_has_no_side_effect() {
        let h = harness(RecordingReleaser::default());
        record_trail(&h.trail).await;
        let session = h.registry.insert(test_session(wallet(), "991")).await;

        let (route_tx, route_rx) = route_request_channel();
        let channel = PaymentChannel::new(
            h.registry.clone(),
            ConfigStore::new(ChannelPolicy::default()),
            route_tx,
        );
        let (event_tx, event_rx) = channel_event_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let channel_task = tokio::spawn(channel.run(shutdown_rx, event_rx));

        event_tx
            .send(ChannelEvent {
                session_id: session.id(),
                signal: ChannelSignal::ScriptMessage {
                    payload: r#"{"type":"url_scheme","url":"mobile://success?tx=1"}"#.to_string(),
                },
            })
            .await
            .unwrap();
        // The provider also redirects; the duplicate must be dropped.
        event_tx
            .send(ChannelEvent {
                session_id: session.id(),
                signal: ChannelSignal::NavigationIntercepted {
                    url: "mobile://success?tx=1".to_string(),
                },
            })
            .await
            .unwrap();
        drop(event_tx);
        channel_task.await.unwrap();

        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let Harness {
            router,
            board,
            releaser,
            trail,
            ..
        } = h;
        router.run(shutdown_rx, route_rx).await;

        let entry = board.get(session.id()).await.unwrap();
        assert_eq!(entry.resets, 1);
        let Some(Route::Wallet(params)) = entry.route else {
            panic!("expected wallet route");
        };
        assert!(params.refresh);
        assert_eq!(params.order_code, Some(OrderCode::new("991")));
        assert_eq!(params.wallet_id.as_deref(), Some("w-1"));
        assert_eq!(session.status(), SessionStatus::Succeeded);
        assert!(releaser.calls().is_empty());
        assert!(trail.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_wallet_cancel_clears_trail() {
        let h = harness(RecordingReleaser::default());
        record_trail(&h.trail).await;
        let session = h.registry.insert(test_session(wallet(), "991")).await;

        let routed = h
            .router
            .process(RouteRequest {
                session_id: session.id(),
                outcome: Outcome::for_session(Classification::Cancelled, &session),
                source: SignalSource::Navigation,
            })
            .await
            .unwrap();
        assert!(matches!(routed, Routed::Navigated { .. }));
        assert_eq!(h.trail.load().await.unwrap(), None);
        assert!(h.releaser.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_release_still_navigates_and_screen_retries() {
        let h = harness(RecordingReleaser::failing());
        let session = h
            .registry
            .insert(test_session(PaymentTarget::Booking { booking_id: 42 }, "ABC"))
            .await;

        let routed = h
            .router
            .route(
                &session,
                Outcome::for_session(
                    Classification::Failed {
                        reason: "declined".to_string(),
                    },
                    &session,
                ),
                SignalSource::ScriptMessage,
            )
            .await;
        let Routed::Navigated {
            route: Route::Failure(params),
        } = routed
        else {
            panic!("expected failure route");
        };
        assert_eq!(params.booking_id, Some(42));
        assert_eq!(params.order_code, Some(OrderCode::new("ABC")));

        let screen = FailureScreen::new(
            params,
            Reconciliation::new(h.releaser.clone(), h.trail.clone()),
        );
        assert_eq!(
            screen.on_mount().await,
            FailureMount::HoldRelease { released: false }
        );

        let calls = h.releaser.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(calls[1].booking_id, 42);
        assert_eq!(calls[1].order_code.as_str(), "ABC");
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let h = harness(RecordingReleaser::default());
        let session = test_session(wallet(), "1");
        let routed = h
            .router
            .process(RouteRequest {
                session_id: session.id(),
                outcome: Outcome::for_session(Classification::Success, &session),
                source: SignalSource::Navigation,
            })
            .await
            .unwrap();
        assert_eq!(routed, Routed::UnknownSession);
        assert!(h.board.get(session.id()).await.is_none());
    }

    #[tokio::test]
    async fn test_run_drains_and_stops_when_senders_are_dropped() {
        let h = harness(RecordingReleaser::default());
        let session = h.registry.insert(test_session(wallet(), "991")).await;
        let (route_tx, route_rx) = route_request_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let Harness { router, board, .. } = h;

        let handle = tokio::spawn(router.run(shutdown_rx, route_rx));
        route_tx
            .send(RouteRequest {
                session_id: session.id(),
                outcome: Outcome::for_session(Classification::Success, &session),
                source: SignalSource::ScriptMessage,
            })
            .await
            .unwrap();
        drop(route_tx);

        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("run did not return after the route channel closed")
            .unwrap();
        assert_eq!(board.get(session.id()).await.unwrap().resets, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_user_cancel_races_payment_success() {
        for _ in 0..32 {
            let h = harness(RecordingReleaser::default());
            let session = h
                .registry
                .insert(test_session(PaymentTarget::Booking { booking_id: 7 }, "R"))
                .await;

            let (route_tx, route_rx) = route_request_channel();
            let channel = PaymentChannel::new(
                h.registry.clone(),
                ConfigStore::new(ChannelPolicy::default()),
                route_tx.clone(),
            );
            let (event_tx, event_rx) = channel_event_channel();
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let channel_task = tokio::spawn(channel.run(shutdown_rx.clone(), event_rx));

            let Harness {
                router,
                board,
                releaser,
                ..
            } = h;
            let router_task = tokio::spawn(router.run(shutdown_rx, route_rx));

            let cancel = {
                let session = Arc::clone(&session);
                let route_tx = route_tx.clone();
                tokio::spawn(async move { confirm_cancel(&session, true, &route_tx).await })
            };
            event_tx
                .send(ChannelEvent {
                    session_id: session.id(),
                    signal: ChannelSignal::ScriptMessage {
                        payload: r#"{"type":"payment_success"}"#.to_string(),
                    },
                })
                .await
                .unwrap();
            cancel.await.unwrap().unwrap();

            drop(event_tx);
            channel_task.await.unwrap();
            drop(route_tx);
            router_task.await.unwrap();
            drop(shutdown_tx);

            let status = session.status();
            assert!(
                matches!(status, SessionStatus::Succeeded | SessionStatus::Cancelled),
                "{status}"
            );
            let entry = board.get(session.id()).await.unwrap();
            assert_eq!(entry.resets, 1);
            let expected_releases = usize::from(status == SessionStatus::Cancelled);
            assert_eq!(releaser.calls().len(), expected_releases);
        }
    }
}
