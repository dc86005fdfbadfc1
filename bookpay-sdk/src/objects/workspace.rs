use serde::{Deserialize, Serialize};

/// Query string for `GET /workspaces/nearby`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
}
