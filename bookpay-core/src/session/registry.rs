//! In-memory registry of open sessions.

use super::{PaymentSession, SessionId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Sessions whose checkout page is open, keyed by [`SessionId`].
///
/// Events carry only the id; processors look the session up here. Cloning
/// the registry shares the same map.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<PaymentSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: PaymentSession) -> Arc<PaymentSession> {
        let session = Arc::new(session);
        self.sessions
            .write()
            .await
            .insert(session.id(), Arc::clone(&session));
        session
    }

    pub async fn get(&self, id: SessionId) -> Option<Arc<PaymentSession>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Discard a session. Returns it if it was still registered.
    pub async fn remove(&self, id: SessionId) -> Option<Arc<PaymentSession>> {
        self.sessions.write().await.remove(&id)
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_session;
    use bookpay_sdk::objects::PaymentTarget;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let registry = SessionRegistry::new();
        let session = registry
            .insert(test_session(PaymentTarget::Booking { booking_id: 3 }, "B3"))
            .await;
        let id = session.id();

        assert!(!registry.is_empty().await);
        assert!(Arc::ptr_eq(&registry.get(id).await.unwrap(), &session));

        assert!(registry.remove(id).await.is_some());
        assert!(registry.get(id).await.is_none());
        assert!(registry.remove(id).await.is_none());
        assert!(registry.is_empty().await);
    }
}
