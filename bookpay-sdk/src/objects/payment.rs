//! Checkout issuance types.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Opaque identifier the backend issues for one checkout attempt.
///
/// The backend has been seen to send it both as a JSON string and as a
/// JSON number; both forms are accepted and kept verbatim as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderCode(String);

impl OrderCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OrderCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) if s.is_empty() => {
                Err(serde::de::Error::custom("order code must not be empty"))
            }
            Raw::Text(s) => Ok(Self(s)),
            Raw::Number(n) => Ok(Self(n.to_string())),
        }
    }
}

/// What a payment is for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PaymentTarget {
    /// A deposit into the customer's wallet.
    Wallet { wallet_id: String },
    /// Payment for a held booking time-slot.
    Booking { booking_id: i64 },
}

impl PaymentTarget {
    pub fn wallet_id(&self) -> Option<&str> {
        match self {
            PaymentTarget::Wallet { wallet_id } => Some(wallet_id),
            PaymentTarget::Booking { .. } => None,
        }
    }

    pub fn booking_id(&self) -> Option<i64> {
        match self {
            PaymentTarget::Wallet { .. } => None,
            PaymentTarget::Booking { booking_id } => Some(*booking_id),
        }
    }
}

impl fmt::Display for PaymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentTarget::Wallet { wallet_id } => write!(f, "wallet:{wallet_id}"),
            PaymentTarget::Booking { booking_id } => write!(f, "booking:{booking_id}"),
        }
    }
}

/// Supported payment methods. Only bank transfer via QR exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bank_transfer" | "qr" => Ok(PaymentMethod::BankTransfer),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Returned when a method string names no supported payment method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported payment method: {0:?}")]
pub struct UnknownPaymentMethod(pub String);

/// Request body for `POST /users/wallet/deposit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDepositRequest {
    pub wallet_id: String,
    pub amount: u64,
    pub method: PaymentMethod,
}

/// Request body for `POST /users/booking/payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPaymentRequest {
    pub booking_id: i64,
    pub amount: u64,
    pub method: PaymentMethod,
}

/// Response of both checkout issuance endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_code: OrderCode,
    pub checkout_url: Url,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_code_accepts_string_and_number() {
        let resp: CheckoutResponse = serde_json::from_str(
            r#"{"orderCode":"ABC","checkoutUrl":"https://pay.payos.vn/web/abc"}"#,
        )
        .unwrap();
        assert_eq!(resp.order_code.as_str(), "ABC");

        let resp: CheckoutResponse = serde_json::from_str(
            r#"{"orderCode":1718000123,"checkoutUrl":"https://pay.payos.vn/web/abc"}"#,
        )
        .unwrap();
        assert_eq!(resp.order_code.as_str(), "1718000123");

        assert!(
            serde_json::from_str::<CheckoutResponse>(
                r#"{"orderCode":"","checkoutUrl":"https://pay.payos.vn/web/abc"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_target_wire_shape() {
        let target: PaymentTarget =
            serde_json::from_str(r#"{"kind":"booking","bookingId":42}"#).unwrap();
        assert_eq!(target.booking_id(), Some(42));
        assert_eq!(target.wallet_id(), None);

        let json = serde_json::to_value(PaymentTarget::Wallet {
            wallet_id: "w-1".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "wallet");
        assert_eq!(json["walletId"], "w-1");
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>(),
            Ok(PaymentMethod::BankTransfer)
        );
        assert!("".parse::<PaymentMethod>().is_err());
        assert!("card".parse::<PaymentMethod>().is_err());
    }
}
