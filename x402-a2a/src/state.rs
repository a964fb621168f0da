//! Payment state carried in A2A message metadata.
//!
//! The x402 extension threads payment data through the `metadata` object of
//! A2A messages and tasks under the keys in [`X402Metadata`]. The helpers
//! here only encode and decode those entries; they do not enforce any order
//! of status transitions.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{X402Error, X402ErrorCode};
use crate::proto::{PaymentPayload, PaymentRequired, SettleResponse};

/// A2A metadata object.
pub type Metadata = Map<String, Value>;

/// Where a payment stands in the x402 flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    /// The merchant asked for payment.
    PaymentRequired,
    /// The client sent a signed payment.
    PaymentSubmitted,
    /// The payment was verified and awaits settlement.
    PaymentVerified,
    /// The client declined to pay.
    PaymentRejected,
    /// The payment settled.
    PaymentCompleted,
    /// Verification or settlement failed.
    PaymentFailed,
}

impl PaymentStatus {
    /// Returns the wire string of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentRequired => "payment-required",
            Self::PaymentSubmitted => "payment-submitted",
            Self::PaymentVerified => "payment-verified",
            Self::PaymentRejected => "payment-rejected",
            Self::PaymentCompleted => "payment-completed",
            Self::PaymentFailed => "payment-failed",
        }
    }

    /// Returns `true` once no further payment activity is expected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::PaymentRejected | Self::PaymentCompleted | Self::PaymentFailed
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata keys used by the x402 extension.
#[derive(Debug, Clone, Copy)]
pub struct X402Metadata;

impl X402Metadata {
    /// Current [`PaymentStatus`].
    pub const STATUS_KEY: &'static str = "x402.payment.status";
    /// The [`PaymentRequired`] envelope sent by the merchant.
    pub const REQUIRED_KEY: &'static str = "x402.payment.required";
    /// The [`PaymentPayload`] sent by the client.
    pub const PAYLOAD_KEY: &'static str = "x402.payment.payload";
    /// Array of [`SettleResponse`] receipts.
    pub const RECEIPTS_KEY: &'static str = "x402.payment.receipts";
    /// [`X402ErrorCode`] of the last failure.
    pub const ERROR_KEY: &'static str = "x402.payment.error";
}

fn decode<T: DeserializeOwned>(metadata: &Metadata, key: &str) -> Result<Option<T>, X402Error> {
    metadata
        .get(key)
        .filter(|value| !value.is_null())
        .map(T::deserialize)
        .transpose()
        .map_err(X402Error::from)
}

fn encode<T: Serialize>(metadata: &mut Metadata, key: &str, value: &T) -> Result<(), X402Error> {
    metadata.insert(key.to_owned(), serde_json::to_value(value)?);
    Ok(())
}

/// Reads the payment status.
///
/// # Errors
///
/// Returns [`X402Error::Metadata`] if the entry is not a known status.
pub fn payment_status(metadata: &Metadata) -> Result<Option<PaymentStatus>, X402Error> {
    decode(metadata, X402Metadata::STATUS_KEY)
}

/// Writes the payment status.
pub fn set_payment_status(metadata: &mut Metadata, status: PaymentStatus) {
    metadata.insert(
        X402Metadata::STATUS_KEY.to_owned(),
        Value::String(status.as_str().to_owned()),
    );
}

/// Stores the envelope and marks the payment as required.
///
/// # Errors
///
/// Returns [`X402Error::Metadata`] if the envelope cannot be encoded.
pub fn record_payment_required(
    metadata: &mut Metadata,
    payment_required: &PaymentRequired,
) -> Result<(), X402Error> {
    encode(metadata, X402Metadata::REQUIRED_KEY, payment_required)?;
    set_payment_status(metadata, PaymentStatus::PaymentRequired);
    Ok(())
}

/// Reads the envelope stored by [`record_payment_required`].
///
/// # Errors
///
/// Returns [`X402Error::Metadata`] if the entry is malformed.
pub fn payment_required(metadata: &Metadata) -> Result<Option<PaymentRequired>, X402Error> {
    decode(metadata, X402Metadata::REQUIRED_KEY)
}

/// Stores the client's payment and marks it as submitted.
///
/// # Errors
///
/// Returns [`X402Error::Metadata`] if the payload cannot be encoded.
pub fn record_payment_submitted(
    metadata: &mut Metadata,
    payload: &PaymentPayload,
) -> Result<(), X402Error> {
    encode(metadata, X402Metadata::PAYLOAD_KEY, payload)?;
    set_payment_status(metadata, PaymentStatus::PaymentSubmitted);
    Ok(())
}

/// Reads the client's payment.
///
/// # Errors
///
/// Returns [`X402Error::Metadata`] if the entry is malformed.
pub fn payment_payload(metadata: &Metadata) -> Result<Option<PaymentPayload>, X402Error> {
    decode(metadata, X402Metadata::PAYLOAD_KEY)
}

/// Appends a settlement receipt.
///
/// # Errors
///
/// Returns [`X402Error::Message`] if the receipts entry exists but is not an
/// array, or [`X402Error::Metadata`] if the receipt cannot be encoded.
pub fn append_receipt(metadata: &mut Metadata, receipt: &SettleResponse) -> Result<(), X402Error> {
    let receipt = serde_json::to_value(receipt)?;
    match metadata.get_mut(X402Metadata::RECEIPTS_KEY) {
        None | Some(Value::Null) => {
            metadata.insert(
                X402Metadata::RECEIPTS_KEY.to_owned(),
                Value::Array(vec![receipt]),
            );
        }
        Some(Value::Array(receipts)) => receipts.push(receipt),
        Some(_) => {
            return Err(X402Error::Message(format!(
                "'{}' must be an array",
                X402Metadata::RECEIPTS_KEY
            )));
        }
    }
    Ok(())
}

/// Reads all settlement receipts, oldest first.
///
/// # Errors
///
/// Returns [`X402Error::Metadata`] if the entry is malformed.
pub fn receipts(metadata: &Metadata) -> Result<Vec<SettleResponse>, X402Error> {
    Ok(decode(metadata, X402Metadata::RECEIPTS_KEY)?.unwrap_or_default())
}

/// Records a failure code and marks the payment as failed.
pub fn record_failure(metadata: &mut Metadata, code: X402ErrorCode) {
    metadata.insert(
        X402Metadata::ERROR_KEY.to_owned(),
        Value::String(code.as_str().to_owned()),
    );
    set_payment_status(metadata, PaymentStatus::PaymentFailed);
}

/// Reads the recorded failure code.
///
/// # Errors
///
/// Returns [`X402Error::Metadata`] if the entry is not a known code.
pub fn failure_code(metadata: &Metadata) -> Result<Option<X402ErrorCode>, X402Error> {
    decode(metadata, X402Metadata::ERROR_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAYEE: &str = "0x209693Bc6afc0C5328bA36FaF03C514EF312287C";

    fn requirements() -> Value {
        json!({
            "scheme": "exact",
            "network": "eip155:84532",
            "asset": "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
            "amount": "3100000",
            "payTo": PAYEE,
            "maxTimeoutSeconds": 600
        })
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(
            serde_json::to_value(PaymentStatus::PaymentRequired).unwrap(),
            "payment-required"
        );
        let status: PaymentStatus = serde_json::from_str("\"payment-completed\"").unwrap();
        assert_eq!(status, PaymentStatus::PaymentCompleted);
        assert_eq!(PaymentStatus::PaymentVerified.to_string(), "payment-verified");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!PaymentStatus::PaymentRequired.is_terminal());
        assert!(!PaymentStatus::PaymentSubmitted.is_terminal());
        assert!(!PaymentStatus::PaymentVerified.is_terminal());
        assert!(PaymentStatus::PaymentRejected.is_terminal());
        assert!(PaymentStatus::PaymentCompleted.is_terminal());
        assert!(PaymentStatus::PaymentFailed.is_terminal());
    }

    #[test]
    fn test_record_payment_required() {
        let envelope: PaymentRequired = serde_json::from_value(json!({
            "x402Version": 2,
            "error": "Payment required",
            "accepts": [requirements()]
        }))
        .unwrap();
        let mut metadata = Metadata::new();
        record_payment_required(&mut metadata, &envelope).unwrap();

        assert_eq!(metadata["x402.payment.status"], "payment-required");
        assert_eq!(metadata["x402.payment.required"]["accepts"][0]["payTo"], PAYEE);
        assert_eq!(
            payment_status(&metadata).unwrap(),
            Some(PaymentStatus::PaymentRequired)
        );
        assert_eq!(payment_required(&metadata).unwrap(), Some(envelope));
    }

    #[test]
    fn test_payment_payload_from_client_metadata() {
        let metadata: Metadata = serde_json::from_value(json!({
            "x402.payment.status": "payment-submitted",
            "x402.payment.payload": {
                "x402Version": 2,
                "payload": { "signature": "0xdead" },
                "accepted": requirements()
            }
        }))
        .unwrap();
        let payload = payment_payload(&metadata).unwrap().unwrap();
        assert_eq!(payload.scheme(), "exact");

        let mut echoed = Metadata::new();
        record_payment_submitted(&mut echoed, &payload).unwrap();
        assert_eq!(echoed, metadata);
    }

    #[test]
    fn test_missing_entries_read_as_none() {
        let metadata = Metadata::new();
        assert_eq!(payment_status(&metadata).unwrap(), None);
        assert!(payment_required(&metadata).unwrap().is_none());
        assert!(payment_payload(&metadata).unwrap().is_none());
        assert!(receipts(&metadata).unwrap().is_empty());
        assert_eq!(failure_code(&metadata).unwrap(), None);
    }

    #[test]
    fn test_malformed_entries_fail() {
        let metadata: Metadata = serde_json::from_value(json!({
            "x402.payment.status": "paid",
            "x402.payment.payload": { "x402Version": 2 }
        }))
        .unwrap();
        assert!(matches!(
            payment_status(&metadata),
            Err(X402Error::Metadata(_))
        ));
        assert!(matches!(
            payment_payload(&metadata),
            Err(X402Error::Metadata(_))
        ));
    }

    #[test]
    fn test_append_receipts() {
        let mut metadata = Metadata::new();
        let first = SettleResponse::Error {
            reason: "insufficient_funds".into(),
            message: None,
            network: "eip155:84532".into(),
        };
        let second = SettleResponse::Success {
            payer: "0x857b06519E91e3A54538791bDbb0E22373e36b66".into(),
            transaction: "0xabc".into(),
            network: "eip155:84532".into(),
            extensions: None,
        };
        append_receipt(&mut metadata, &first).unwrap();
        append_receipt(&mut metadata, &second).unwrap();
        assert_eq!(receipts(&metadata).unwrap(), vec![first, second]);
        assert_eq!(metadata["x402.payment.receipts"][1]["success"], true);
    }

    #[test]
    fn test_append_receipt_to_non_array_fails() {
        let mut metadata = Metadata::new();
        metadata.insert(X402Metadata::RECEIPTS_KEY.into(), json!("oops"));
        let receipt = SettleResponse::Error {
            reason: "unexpected".into(),
            message: None,
            network: "eip155:8453".into(),
        };
        let err = append_receipt(&mut metadata, &receipt).unwrap_err();
        assert!(matches!(err, X402Error::Message(_)));
    }

    #[test]
    fn test_record_failure() {
        let mut metadata = Metadata::new();
        record_failure(&mut metadata, X402ErrorCode::InsufficientFunds);
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            json!({
                "x402.payment.status": "payment-failed",
                "x402.payment.error": "INSUFFICIENT_FUNDS"
            })
        );
        assert_eq!(
            failure_code(&metadata).unwrap(),
            Some(X402ErrorCode::InsufficientFunds)
        );
    }
}
