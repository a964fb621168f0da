//! Error types for x402 over A2A.
//!
//! [`RequirementsError`] covers building payment requirements.
//! [`X402Error`] is the error agents raise while running the payment flow;
//! every variant maps to a stable [`X402ErrorCode`] that can be written into
//! message metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chain::{ChainId, ChainIdFormatError};
use crate::price::MoneyError;
use crate::proto::PaymentRequired;

/// Errors produced while building payment requirements.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RequirementsError {
    /// The network is neither a CAIP-2 identifier nor a known network name.
    #[error("Unknown network: {0}")]
    InvalidNetwork(#[from] ChainIdFormatError),
    /// No scheme server handles this scheme on the network's namespace.
    #[error("No '{scheme}' scheme available for network {network}")]
    UnsupportedScheme {
        /// The requested scheme.
        scheme: String,
        /// The requested network.
        network: ChainId,
    },
    /// The network has no default asset to convert money into.
    #[error("No default asset known for network {0}")]
    NoDefaultAsset(ChainId),
    /// The payee address is not valid on the target network.
    #[error("Invalid pay-to address {address:?} for {namespace}: {reason}")]
    InvalidPayTo {
        /// The rejected address.
        address: String,
        /// CAIP-2 namespace the address was checked against.
        namespace: String,
        /// Why the address was rejected.
        reason: String,
    },
    /// The money price cannot be converted to an atomic amount.
    #[error(transparent)]
    Price(#[from] MoneyError),
    /// An explicit asset amount names no asset.
    #[error("Asset must not be empty")]
    EmptyAsset,
    /// An explicit asset amount is not an integer in the asset's smallest unit.
    #[error("Atomic amount must be a non-negative integer string, got {0:?}")]
    InvalidAmount(String),
    /// The resource identifier is empty.
    #[error("Resource must not be empty")]
    EmptyResource,
    /// The resource could not be resolved against the base URL.
    #[error("Invalid resource URL {resource:?}: {source}")]
    InvalidResourceUrl {
        /// The resource as supplied.
        resource: String,
        /// The URL parse failure.
        #[source]
        source: url::ParseError,
    },
    /// An additional field would shadow a schema field.
    #[error("Field '{0}' is reserved by the payment requirements schema")]
    ReservedField(String),
    /// The payment would expire immediately.
    #[error("maxTimeoutSeconds must be greater than zero")]
    ZeroTimeout,
}

/// Stable error codes reported to the paying agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum X402ErrorCode {
    /// The payer cannot cover the amount.
    InsufficientFunds,
    /// The payment signature or payload does not validate.
    InvalidSignature,
    /// The payment authorization has expired.
    ExpiredPayment,
    /// The payment nonce was already used.
    DuplicateNonce,
    /// The payment targets a different network.
    NetworkMismatch,
    /// The payment amount is wrong or malformed.
    InvalidAmount,
    /// The facilitator could not settle the payment.
    SettlementFailed,
    /// Payment is required before the request can proceed.
    PaymentRequired,
    /// Any other failure.
    UnknownError,
}

impl X402ErrorCode {
    /// Returns the wire string for this code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::ExpiredPayment => "EXPIRED_PAYMENT",
            Self::DuplicateNonce => "DUPLICATE_NONCE",
            Self::NetworkMismatch => "NETWORK_MISMATCH",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::SettlementFailed => "SETTLEMENT_FAILED",
            Self::PaymentRequired => "PAYMENT_REQUIRED",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for X402ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base error for the x402 A2A payment flow.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum X402Error {
    /// A message could not be read or does not carry the expected payment data.
    #[error("Message error: {0}")]
    Message(String),
    /// A payment payload failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Payment processing failed.
    #[error("Payment error: {0}")]
    Payment(String),
    /// The task is not in a state that allows the operation.
    #[error("State error: {0}")]
    State(String),
    /// The agent requires payment before continuing.
    ///
    /// Raised from inside an agent; the surrounding runtime turns it into a
    /// payment-required response carrying the envelope.
    #[error("{message}")]
    PaymentRequired {
        /// Human-readable message.
        message: String,
        /// The envelope to return to the client.
        payment_required: Box<PaymentRequired>,
    },
    /// Payment requirements could not be built.
    #[error(transparent)]
    Requirements(#[from] RequirementsError),
    /// Payment data in message metadata could not be encoded or decoded.
    #[error("Invalid payment metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl X402Error {
    /// Creates a payment-required error carrying the given envelope.
    pub fn payment_required<M: Into<String>>(
        message: M,
        payment_required: PaymentRequired,
    ) -> Self {
        Self::PaymentRequired {
            message: message.into(),
            payment_required: Box::new(payment_required),
        }
    }

    /// Returns the envelope of a payment-required error.
    #[must_use]
    pub fn as_payment_required(&self) -> Option<&PaymentRequired> {
        match self {
            Self::PaymentRequired {
                payment_required, ..
            } => Some(&**payment_required),
            _ => None,
        }
    }

    /// Maps this error to its stable code.
    #[must_use]
    pub const fn code(&self) -> X402ErrorCode {
        match self {
            Self::Validation(_) => X402ErrorCode::InvalidSignature,
            Self::Payment(_) => X402ErrorCode::SettlementFailed,
            Self::PaymentRequired { .. } => X402ErrorCode::PaymentRequired,
            Self::Requirements(err) => match err {
                RequirementsError::Price(_) | RequirementsError::InvalidAmount(_) => {
                    X402ErrorCode::InvalidAmount
                }
                RequirementsError::InvalidNetwork(_)
                | RequirementsError::UnsupportedScheme { .. }
                | RequirementsError::NoDefaultAsset(_) => X402ErrorCode::NetworkMismatch,
                _ => X402ErrorCode::UnknownError,
            },
            Self::Message(_) | Self::State(_) | Self::Metadata(_) => X402ErrorCode::UnknownError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::X402Version2;

    #[test]
    fn test_error_code_wire_strings() {
        assert_eq!(X402ErrorCode::InsufficientFunds.as_str(), "INSUFFICIENT_FUNDS");
        assert_eq!(
            serde_json::to_value(X402ErrorCode::SettlementFailed).unwrap(),
            "SETTLEMENT_FAILED"
        );
        let code: X402ErrorCode = serde_json::from_str("\"DUPLICATE_NONCE\"").unwrap();
        assert_eq!(code, X402ErrorCode::DuplicateNonce);
        assert_eq!(X402ErrorCode::UnknownError.to_string(), "UNKNOWN_ERROR");
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            X402Error::Validation("bad sig".into()).code(),
            X402ErrorCode::InvalidSignature
        );
        assert_eq!(
            X402Error::Payment("rpc down".into()).code(),
            X402ErrorCode::SettlementFailed
        );
        assert_eq!(
            X402Error::State("no task".into()).code(),
            X402ErrorCode::UnknownError
        );
        assert_eq!(
            X402Error::from(RequirementsError::Price(MoneyError::Negative)).code(),
            X402ErrorCode::InvalidAmount
        );
        assert_eq!(
            X402Error::from(RequirementsError::NoDefaultAsset(ChainId::eip155(1))).code(),
            X402ErrorCode::NetworkMismatch
        );
        assert_eq!(
            X402Error::from(RequirementsError::EmptyResource).code(),
            X402ErrorCode::UnknownError
        );
    }

    #[test]
    fn test_payment_required_error_carries_envelope() {
        let envelope = PaymentRequired {
            x402_version: X402Version2::default(),
            error: Some("Payment required".into()),
            resource: None,
            accepts: Vec::new(),
            extensions: None,
        };
        let err = X402Error::payment_required("Premium feature", envelope.clone());
        assert_eq!(err.to_string(), "Premium feature");
        assert_eq!(err.code(), X402ErrorCode::PaymentRequired);
        assert_eq!(err.as_payment_required(), Some(&envelope));
        assert!(X402Error::Message("x".into()).as_payment_required().is_none());
    }
}
