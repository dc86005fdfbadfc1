//! Request and response types.
//!
//! Field names follow the backend's camelCase JSON. The script payload in
//! [`bridge`] follows the snake_case tags emitted by the injected page script.

pub mod booking;
pub mod bridge;
pub mod payment;
pub mod upload;
pub mod workspace;

pub use booking::{RatingRequest, UpdateTimeStatusRequest};
pub use bridge::ScriptMessage;
pub use payment::{
    BookingPaymentRequest, CheckoutResponse, OrderCode, PaymentMethod, PaymentTarget,
    WalletDepositRequest,
};
pub use upload::UploadResponse;
pub use workspace::NearbyQuery;
