//! Payment sessions.
//!
//! A [`PaymentSession`] is one outstanding checkout attempt. It is created by
//! [`SessionFactory`] once the backend has issued a checkout URL, held in the
//! [`SessionRegistry`] while the checkout page is open, and discarded by the
//! outcome router after its single terminal transition.

mod factory;
mod registry;

pub use factory::{CheckoutBackend, SessionError, SessionFactory};
pub use registry::SessionRegistry;

use bookpay_sdk::objects::{OrderCode, PaymentMethod, PaymentTarget};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Locally generated handle for a session.
pub type SessionId = Uuid;

/// Lifecycle of a session. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SessionStatus {
    Pending = 0,
    Succeeded = 1,
    Cancelled = 2,
    Failed = 3,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        self != SessionStatus::Pending
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => SessionStatus::Succeeded,
            2 => SessionStatus::Cancelled,
            3 => SessionStatus::Failed,
            _ => SessionStatus::Pending,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Pending => write!(f, "pending"),
            SessionStatus::Succeeded => write!(f, "succeeded"),
            SessionStatus::Cancelled => write!(f, "cancelled"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Rejected status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("session already finished as {0}")]
    AlreadyTerminal(SessionStatus),
    #[error("{0} is not a terminal status")]
    NotTerminal(SessionStatus),
}

/// One checkout attempt.
#[derive(Debug)]
pub struct PaymentSession {
    id: SessionId,
    order_code: OrderCode,
    target: PaymentTarget,
    checkout_url: Url,
    amount: u64,
    method: PaymentMethod,
    status: AtomicU8,
}

impl PaymentSession {
    /// Create a pending session.
    pub fn new(
        order_code: OrderCode,
        target: PaymentTarget,
        checkout_url: Url,
        amount: u64,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_code,
            target,
            checkout_url,
            amount,
            method,
            status: AtomicU8::new(SessionStatus::Pending as u8),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn order_code(&self) -> &OrderCode {
        &self.order_code
    }

    pub fn target(&self) -> &PaymentTarget {
        &self.target
    }

    pub fn checkout_url(&self) -> &Url {
        &self.checkout_url
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub fn is_pending(&self) -> bool {
        self.status() == SessionStatus::Pending
    }

    /// Move from `Pending` to `terminal`.
    ///
    /// This is a single compare-and-set: when several callers race, exactly
    /// one succeeds and the rest observe the winner's status.
    pub fn try_finish(&self, terminal: SessionStatus) -> Result<(), TransitionError> {
        if !terminal.is_terminal() {
            return Err(TransitionError::NotTerminal(terminal));
        }
        self.status
            .compare_exchange(
                SessionStatus::Pending as u8,
                terminal as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|current| TransitionError::AlreadyTerminal(SessionStatus::from_u8(current)))
    }
}

#[cfg(test)]
pub(crate) fn test_session(target: PaymentTarget, order_code: &str) -> PaymentSession {
    PaymentSession::new(
        OrderCode::new(order_code),
        target,
        Url::parse("https://pay.payos.vn/web/test").unwrap(),
        100_000,
        PaymentMethod::BankTransfer,
    )
}
