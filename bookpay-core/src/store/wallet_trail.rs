//! Crash-recovery trail for in-flight wallet deposits.
//!
//! When a wallet deposit checkout opens, the wallet id, order code and amount
//! are written to local storage. They are cleared once the deposit reaches a
//! terminal outcome, so a leftover trail on start-up means the app died with
//! a deposit still open.

use super::{LocalStore, StoreError};
use bookpay_sdk::objects::OrderCode;
use std::sync::Arc;

pub const WALLET_ID_KEY: &str = "customerWalletId";
pub const ORDER_CODE_KEY: &str = "orderCode";
pub const AMOUNT_KEY: &str = "amount";

/// The three persisted keys, read back together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailEntry {
    pub wallet_id: String,
    pub order_code: OrderCode,
    pub amount: u64,
}

/// Reads and writes the wallet deposit trail in a [`LocalStore`].
#[derive(Clone)]
pub struct WalletTrail {
    store: Arc<dyn LocalStore>,
}

impl std::fmt::Debug for WalletTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletTrail").finish_non_exhaustive()
    }
}

impl WalletTrail {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Write all three keys in a single store write.
    pub async fn record(&self, entry: &TrailEntry) -> Result<(), StoreError> {
        let amount = entry.amount.to_string();
        self.store
            .set_many(&[
                (WALLET_ID_KEY, entry.wallet_id.as_str()),
                (ORDER_CODE_KEY, entry.order_code.as_str()),
                (AMOUNT_KEY, amount.as_str()),
            ])
            .await
    }

    /// The recorded trail, if all three keys are present and well formed.
    pub async fn load(&self) -> Result<Option<TrailEntry>, StoreError> {
        let wallet_id = self.store.get(WALLET_ID_KEY).await?;
        let order_code = self.store.get(ORDER_CODE_KEY).await?;
        let amount = self.store.get(AMOUNT_KEY).await?;

        let (Some(wallet_id), Some(order_code), Some(amount)) = (wallet_id, order_code, amount)
        else {
            return Ok(None);
        };
        let Ok(amount) = amount.parse::<u64>() else {
            return Ok(None);
        };
        Ok(Some(TrailEntry {
            wallet_id,
            order_code: OrderCode::new(order_code),
            amount,
        }))
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store
            .remove(&[WALLET_ID_KEY, ORDER_CODE_KEY, AMOUNT_KEY])
            .await
    }
}
