//! In-memory navigator.

use super::{Navigator, Route};
use crate::session::SessionId;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// What the shell should currently show for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub surface_closed: bool,
    pub route: Option<Route>,
    /// Number of stack resets. Anything above one is a routing bug.
    pub resets: u32,
}

/// Records navigation per session so the shell can poll it.
#[derive(Debug, Clone, Default)]
pub struct RouteBoard {
    entries: Arc<RwLock<HashMap<SessionId, RouteEntry>>>,
}

impl RouteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, session_id: SessionId) -> Option<RouteEntry> {
        self.entries.read().await.get(&session_id).cloned()
    }

    /// Remove and return a session's entry once it holds a terminal route.
    ///
    /// Entries that were never routed stay on the board.
    pub async fn take_routed(&self, session_id: SessionId) -> Option<RouteEntry> {
        let mut entries = self.entries.write().await;
        entries.get(&session_id)?.route.as_ref()?;
        entries.remove(&session_id)
    }
}

#[async_trait]
impl Navigator for RouteBoard {
    async fn close_surface(&self, session_id: SessionId) {
        debug!(session_id = %session_id, "Closing checkout surface");
        self.entries
            .write()
            .await
            .entry(session_id)
            .or_default()
            .surface_closed = true;
    }

    async fn reset_stack(&self, session_id: SessionId, route: Route) {
        debug!(
            session_id = %session_id,
            screen = route.screen_name(),
            "Resetting navigation stack"
        );
        let mut entries = self.entries.write().await;
        let entry = entries.entry(session_id).or_default();
        entry.route = Some(route);
        entry.resets += 1;
    }
}
