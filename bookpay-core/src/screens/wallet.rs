//! Wallet screen.

use super::WalletParams;
use crate::reconcile::Reconciliation;
use std::sync::atomic::{AtomicBool, Ordering};

/// Wallet screen reached after a deposit.
///
/// A refresh mount means the deposit succeeded, so the in-flight trail is no
/// longer needed.
#[derive(Debug)]
pub struct WalletScreen {
    params: WalletParams,
    reconciliation: Reconciliation,
    mounted: AtomicBool,
}

impl WalletScreen {
    pub fn new(params: WalletParams, reconciliation: Reconciliation) -> Self {
        Self {
            params,
            reconciliation,
            mounted: AtomicBool::new(false),
        }
    }

    pub fn params(&self) -> &WalletParams {
        &self.params
    }

    /// Returns whether the trail was cleared by this call.
    pub async fn on_mount(&self) -> bool {
        if !self.params.refresh || self.mounted.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.reconciliation.clear_wallet_trail().await
    }
}
