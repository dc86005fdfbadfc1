//! Booking reconciliation and review types.

use serde::{Deserialize, Serialize};

use super::payment::OrderCode;

/// Request body for `PUT /users/booking/updatetimestatus`.
///
/// Releases the time-slot held for a booking whose payment did not go
/// through. The backend treats repeated calls with the same pair as no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeStatusRequest {
    pub booking_id: i64,
    pub order_code: OrderCode,
}

/// Request body for `POST /users/booking/rating`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    pub booking_id: i64,
    pub rate: u8,
    pub comment: String,
    /// URLs previously returned by the image upload endpoint.
    #[serde(default)]
    pub images: Vec<String>,
}
