//! A2A extension declaration and activation.
//!
//! An agent lists the x402 extension in its agent card; a client activates
//! it per request by naming the extension URI in the `X-A2A-Extensions`
//! header, and the agent echoes the URI back in its response.

use http::HeaderMap;
use http::header::HeaderValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::X402_EXTENSION_URI;

/// Header listing the A2A extensions active for a request.
pub const A2A_EXTENSIONS_HEADER: &str = "x-a2a-extensions";

/// Default description of the x402 extension in an agent card.
pub const DEFAULT_EXTENSION_DESCRIPTION: &str = "Supports payments using the x402 protocol.";

/// An extension entry of an A2A agent card's capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentExtension {
    /// URI identifying the extension.
    pub uri: String,

    /// What the agent uses the extension for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether clients must support the extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Extension-specific parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Declares the x402 extension for an agent card.
///
/// `None` uses [`DEFAULT_EXTENSION_DESCRIPTION`].
#[must_use]
pub fn extension_declaration(description: Option<&str>, required: bool) -> AgentExtension {
    AgentExtension {
        uri: X402_EXTENSION_URI.to_owned(),
        description: Some(description.unwrap_or(DEFAULT_EXTENSION_DESCRIPTION).to_owned()),
        required: Some(required),
        params: None,
    }
}

/// Returns `true` if the request headers activate the x402 extension.
///
/// Every `X-A2A-Extensions` line is read as a comma-separated list of URIs;
/// only an exact match counts.
#[must_use]
pub fn is_extension_activated(headers: &HeaderMap) -> bool {
    headers
        .get_all(A2A_EXTENSIONS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|uri| uri.trim() == X402_EXTENSION_URI)
}

/// Marks the x402 extension as active in response headers.
///
/// Existing extension entries are kept and the URI is not added twice.
pub fn add_extension_activation_header(headers: &mut HeaderMap) {
    if !is_extension_activated(headers) {
        headers.append(
            A2A_EXTENSIONS_HEADER,
            HeaderValue::from_static(X402_EXTENSION_URI),
        );
    }
}
