//! Session creation.

use super::{PaymentSession, SessionRegistry};
use crate::amount;
use crate::store::{TrailEntry, WalletTrail};
use async_trait::async_trait;
use bookpay_sdk::client::{BackendClient, ClientError};
use bookpay_sdk::objects::{
    BookingPaymentRequest, CheckoutResponse, PaymentMethod, PaymentTarget, WalletDepositRequest,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while opening a payment session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Invalid amount, method or target. Shown inline, nothing is sent.
    #[error("{0}")]
    Validation(String),

    /// The backend refused or could not be reached. The user may retry.
    #[error("could not start the payment: {0}")]
    Backend(#[from] ClientError),

    /// The backend answered with a checkout URL the app cannot host.
    #[error("backend issued an unusable checkout url: {0}")]
    InvalidCheckoutUrl(String),
}

impl SessionError {
    /// Whether the user should be offered a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::Backend(e) => e.is_retryable(),
            SessionError::Validation(_) | SessionError::InvalidCheckoutUrl(_) => false,
        }
    }
}

/// Issues checkout URLs. Implemented by the backend client; faked in tests.
#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn issue_checkout(
        &self,
        target: &PaymentTarget,
        amount: u64,
        method: PaymentMethod,
    ) -> Result<CheckoutResponse, ClientError>;
}

#[async_trait]
impl CheckoutBackend for BackendClient {
    async fn issue_checkout(
        &self,
        target: &PaymentTarget,
        amount: u64,
        method: PaymentMethod,
    ) -> Result<CheckoutResponse, ClientError> {
        match target {
            PaymentTarget::Wallet { wallet_id } => {
                self.create_wallet_deposit(&WalletDepositRequest {
                    wallet_id: wallet_id.clone(),
                    amount,
                    method,
                })
                .await
            }
            PaymentTarget::Booking { booking_id } => {
                self.create_booking_payment(&BookingPaymentRequest {
                    booking_id: *booking_id,
                    amount,
                    method,
                })
                .await
            }
        }
    }
}

/// Validates a confirmed amount and method, asks the backend for a checkout,
/// and registers the resulting pending session.
#[derive(Clone)]
pub struct SessionFactory {
    backend: Arc<dyn CheckoutBackend>,
    registry: SessionRegistry,
    trail: WalletTrail,
}

impl SessionFactory {
    pub fn new(
        backend: Arc<dyn CheckoutBackend>,
        registry: SessionRegistry,
        trail: WalletTrail,
    ) -> Self {
        Self {
            backend,
            registry,
            trail,
        }
    }

    /// Open a session for `amount` paid with `method` towards `target`.
    ///
    /// Nothing is registered or persisted unless the backend issues a
    /// checkout.
    pub async fn create(
        &self,
        amount: u64,
        method: &str,
        target: PaymentTarget,
    ) -> Result<Arc<PaymentSession>, SessionError> {
        if !amount::is_valid(amount) {
            return Err(SessionError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        if method.trim().is_empty() {
            return Err(SessionError::Validation(
                "a payment method is required".to_string(),
            ));
        }
        let method = method
            .parse::<PaymentMethod>()
            .map_err(|e| SessionError::Validation(e.to_string()))?;
        if target.wallet_id().is_some_and(|id| id.trim().is_empty()) {
            return Err(SessionError::Validation(
                "wallet id is required".to_string(),
            ));
        }

        let checkout = self.backend.issue_checkout(&target, amount, method).await?;

        if !matches!(checkout.checkout_url.scheme(), "http" | "https") {
            return Err(SessionError::InvalidCheckoutUrl(
                checkout.checkout_url.to_string(),
            ));
        }

        let session = self
            .registry
            .insert(PaymentSession::new(
                checkout.order_code,
                target,
                checkout.checkout_url,
                amount,
                method,
            ))
            .await;

        info!(
            session_id = %session.id(),
            order_code = %session.order_code(),
            target = %session.target(),
            amount,
            "Payment session opened"
        );

        if let PaymentTarget::Wallet { wallet_id } = session.target() {
            let entry = TrailEntry {
                wallet_id: wallet_id.clone(),
                order_code: session.order_code().clone(),
                amount,
            };
            if let Err(e) = self.trail.record(&entry).await {
                warn!(
                    session_id = %session.id(),
                    error = %e,
                    "Failed to record wallet deposit trail"
                );
            }
        }

        Ok(session)
    }
}
