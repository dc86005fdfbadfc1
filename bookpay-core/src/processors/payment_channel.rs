//! PaymentChannel processor.
//!
//! The PaymentChannel is responsible for:
//! - Receiving `ChannelEvent`s fed by the host (intercepted navigations and
//!   injected-script messages)
//! - Classifying each against the current channel policy
//! - Emitting a `RouteRequest` for every classified signal
//!
//! It may emit more than one request for the same session when signal paths
//! race. The outcome router keeps the first.

use crate::channel::{SignalError, classify};
use crate::config::{ChannelPolicy, ConfigStore};
use crate::events::{
    ChannelEvent, ChannelEventReceiver, Classification, Outcome, RouteRequest, RouteRequestSender,
};
use crate::session::SessionRegistry;
use kanau::processor::Processor;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum ChannelError {
    /// Unparseable script message. Dropped without affecting the session.
    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error("outcome router is not running")]
    RouterClosed,
}

pub struct PaymentChannel {
    registry: SessionRegistry,
    policy: ConfigStore<ChannelPolicy>,
    route_tx: RouteRequestSender,
}

impl PaymentChannel {
    pub fn new(
        registry: SessionRegistry,
        policy: ConfigStore<ChannelPolicy>,
        route_tx: RouteRequestSender,
    ) -> Self {
        Self {
            registry,
            policy,
            route_tx,
        }
    }

    /// Run the PaymentChannel until shutdown is signaled or every sender is
    /// dropped.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>, mut event_rx: ChannelEventReceiver) {
        info!("PaymentChannel started");
        let mut policy_rx = self.policy.subscribe();

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => match changed {
                    Ok(()) if *shutdown_rx.borrow() => {
                        info!("PaymentChannel received shutdown signal");
                        break;
                    }
                    Ok(()) => {}
                    Err(_) => {
                        info!("Shutdown sender dropped");
                        break;
                    }
                },

                Ok(version) = policy_rx.changed() => {
                    info!(version, "Channel policy reloaded");
                }

                event = event_rx.recv() => match event {
                    Some(event) => {
                        let session_id = event.session_id;
                        match self.process(event).await {
                            Ok(_) => {}
                            Err(ChannelError::Signal(e)) => {
                                debug!(session_id = %session_id, error = %e, "Dropping malformed script message");
                            }
                            Err(e) => {
                                error!(session_id = %session_id, error = %e, "Failed to forward classified signal");
                            }
                        }
                    }
                    None => {
                        info!("ChannelEvent channel closed");
                        break;
                    }
                },
            }
        }

        info!("PaymentChannel shutdown complete");
    }
}

impl Processor<ChannelEvent> for PaymentChannel {
    type Output = Option<Classification>;
    type Error = ChannelError;

    async fn process(&self, event: ChannelEvent) -> Result<Option<Classification>, ChannelError> {
        let Some(session) = self.registry.get(event.session_id).await else {
            debug!(session_id = %event.session_id, "Signal for unknown session ignored");
            return Ok(None);
        };
        if !session.is_pending() {
            debug!(
                session_id = %event.session_id,
                status = %session.status(),
                "Signal for finished session ignored"
            );
            return Ok(None);
        }

        let source = event.signal.source();
        let classification = {
            let policy = self.policy.read().await;
            classify(&event.signal, &policy)?
        };
        let Some(classification) = classification else {
            return Ok(None);
        };

        debug!(
            session_id = %event.session_id,
            source = %source,
            classification = ?classification,
            "Signal classified"
        );

        self.route_tx
            .send(RouteRequest {
                session_id: event.session_id,
                outcome: Outcome::for_session(classification.clone(), &session),
                source,
            })
            .await
            .map_err(|_| ChannelError::RouterClosed)?;

        Ok(Some(classification))
    }
}
