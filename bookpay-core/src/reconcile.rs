//! Best-effort reconciliation after a payment fails or is cancelled.
//!
//! Both the outcome router and the failure screen run these calls. Neither
//! waits on them for anything: a failed call is logged and the caller moves
//! on to the terminal screen it would have shown anyway.

use crate::store::WalletTrail;
use async_trait::async_trait;
use bookpay_sdk::client::{BackendClient, ClientError};
use bookpay_sdk::objects::{OrderCode, UpdateTimeStatusRequest};
use std::sync::Arc;
use tracing::{info, warn};

/// Releases the time slot held for an unpaid booking.
#[async_trait]
pub trait HoldReleaser: Send + Sync {
    async fn release_hold(&self, request: &UpdateTimeStatusRequest) -> Result<(), ClientError>;
}

#[async_trait]
impl HoldReleaser for BackendClient {
    async fn release_hold(&self, request: &UpdateTimeStatusRequest) -> Result<(), ClientError> {
        self.update_time_status(request).await
    }
}

#[derive(Clone)]
pub struct Reconciliation {
    releaser: Arc<dyn HoldReleaser>,
    trail: WalletTrail,
}

impl std::fmt::Debug for Reconciliation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciliation")
            .field("trail", &self.trail)
            .finish_non_exhaustive()
    }
}

impl Reconciliation {
    pub fn new(releaser: Arc<dyn HoldReleaser>, trail: WalletTrail) -> Self {
        Self { releaser, trail }
    }

    /// Release the booking's held slot. Returns whether the backend accepted.
    pub async fn release_booking_hold(&self, booking_id: i64, order_code: &OrderCode) -> bool {
        let request = UpdateTimeStatusRequest {
            booking_id,
            order_code: order_code.clone(),
        };
        match self.releaser.release_hold(&request).await {
            Ok(()) => {
                info!(booking_id, order_code = %order_code, "Booking hold released");
                true
            }
            Err(e) => {
                warn!(
                    booking_id,
                    order_code = %order_code,
                    error = %e,
                    "Failed to release booking hold"
                );
                false
            }
        }
    }

    /// Drop the in-flight wallet deposit trail. Returns whether it was cleared.
    pub async fn clear_wallet_trail(&self) -> bool {
        match self.trail.clear().await {
            Ok(()) => {
                info!("Wallet deposit trail cleared");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to clear wallet deposit trail");
                false
            }
        }
    }
}
