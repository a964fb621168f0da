//! V2 payment types for the x402 protocol.
//!
//! These types use CAIP-2 network identifiers and match the x402 V2 JSON
//! schema field for field, so they can be embedded unchanged in an HTTP 402
//! body or in the metadata of an A2A message.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Extensions;
use super::version::Version;
use crate::chain::ChainId;

/// The V2 protocol version marker, serialized as `2`.
pub type X402Version2 = Version<2>;

/// Describes the resource being paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    /// The URL of the resource.
    pub url: String,

    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional MIME type of the resource response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// One accepted way of paying for a resource.
///
/// Fields the schema does not name are kept in [`additional`](Self::additional)
/// and written back at the top level of the object.
///
/// # JSON Format
///
/// ```json
/// {
///   "scheme": "exact",
///   "network": "eip155:84532",
///   "asset": "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
///   "amount": "3100000",
///   "payTo": "0x...",
///   "maxTimeoutSeconds": 600,
///   "extra": { "name": "USDC", "version": "2" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    /// Payment scheme identifier (e.g., "exact").
    pub scheme: String,

    /// CAIP-2 network identifier (e.g., "eip155:84532").
    pub network: ChainId,

    /// Asset address/identifier (e.g., USDC contract address).
    pub asset: String,

    /// Amount in the asset's smallest unit (e.g., "1000000" for 1 USDC).
    pub amount: String,

    /// Recipient address.
    pub pay_to: String,

    /// Maximum time in seconds for payment validity.
    pub max_timeout_seconds: u64,

    /// Scheme-specific data (e.g., EIP-712 domain params).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,

    /// Any further fields, forwarded verbatim.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl PaymentRequirements {
    /// Wire names of the fields defined by the schema.
    pub const RESERVED_FIELDS: &'static [&'static str] = &[
        "scheme",
        "network",
        "asset",
        "amount",
        "payTo",
        "maxTimeoutSeconds",
        "extra",
    ];

    /// Returns the extra metadata, or `None` if it is absent or null.
    #[must_use]
    pub fn extra(&self) -> Option<&Value> {
        self.extra.as_ref().filter(|v| !v.is_null())
    }
}

/// V2 402 response: the envelope an agent returns when payment is required.
///
/// # JSON Format
///
/// ```json
/// {
///   "x402Version": 2,
///   "error": "Payment required",
///   "resource": { "url": "/generate-image", "mimeType": "application/json" },
///   "accepts": [{ "scheme": "exact", "network": "eip155:84532", ... }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    /// Protocol version (always 2).
    pub x402_version: X402Version2,

    /// Optional error or status message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Optional resource information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceInfo>,

    /// Accepted payment requirements.
    pub accepts: Vec<PaymentRequirements>,

    /// Optional protocol extension data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

/// V2 payment payload submitted by a client to fulfil a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Protocol version (always 2).
    pub x402_version: X402Version2,

    /// Scheme-specific payload data (e.g., signed authorization).
    pub payload: Value,

    /// The payment requirements being fulfilled.
    pub accepted: PaymentRequirements,

    /// Optional resource information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceInfo>,

    /// Optional extension data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

impl PaymentPayload {
    /// Returns the payment scheme from accepted requirements.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.accepted.scheme
    }

    /// Returns the network from accepted requirements.
    #[must_use]
    pub const fn network(&self) -> &ChainId {
        &self.accepted.network
    }
}
