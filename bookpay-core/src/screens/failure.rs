//! Failure screen.

use super::FailureParams;
use crate::reconcile::Reconciliation;
use std::sync::atomic::{AtomicBool, Ordering};

/// What a failure screen mount did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMount {
    /// The mount effect already ran for this screen.
    AlreadyMounted,
    /// Booking failure: the hold release was attempted.
    HoldRelease { released: bool },
    /// Wallet failure: the deposit trail was cleared (or not).
    TrailCleared { cleared: bool },
    /// Not enough identifiers to reconcile anything.
    Nothing,
}

/// The failure screen repeats the router's reconciliation on mount, in case
/// the process died between routing and the screen appearing. The backend
/// call and the trail clear are both idempotent.
#[derive(Debug)]
pub struct FailureScreen {
    params: FailureParams,
    reconciliation: Reconciliation,
    mounted: AtomicBool,
}

impl FailureScreen {
    pub fn new(params: FailureParams, reconciliation: Reconciliation) -> Self {
        Self {
            params,
            reconciliation,
            mounted: AtomicBool::new(false),
        }
    }

    pub fn params(&self) -> &FailureParams {
        &self.params
    }

    /// Run the mount effect. Only the first call does anything.
    pub async fn on_mount(&self) -> FailureMount {
        if self.mounted.swap(true, Ordering::AcqRel) {
            return FailureMount::AlreadyMounted;
        }
        match (&self.params.booking_id, &self.params.order_code) {
            (Some(booking_id), Some(order_code)) => FailureMount::HoldRelease {
                released: self
                    .reconciliation
                    .release_booking_hold(*booking_id, order_code)
                    .await,
            },
            _ if self.params.wallet_id.is_some() => FailureMount::TrailCleared {
                cleared: self.reconciliation.clear_wallet_trail().await,
            },
            _ => FailureMount::Nothing,
        }
    }
}
