//! Configuration for the x402 A2A extension.
//!
//! Both types deserialize from any serde format with every optional field
//! defaulted, so a merchant can be configured with as little as a price and
//! a payee:
//!
//! ```rust
//! use x402_a2a::config::X402ServerConfig;
//!
//! let config: X402ServerConfig = serde_json::from_str(
//!     r#"{ "price": "$0.01", "payToAddress": "0x209693Bc6afc0C5328bA36FaF03C514EF312287C" }"#,
//! )?;
//! let required = config.builder_for("/weather").build()?;
//! assert_eq!(required.accepts[0].amount, "10000");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::RequirementsError;
use crate::merchant::{
    DEFAULT_MAX_TIMEOUT_SECONDS, DEFAULT_MIME_TYPE, DEFAULT_NETWORK, DEFAULT_SCHEME,
    PaymentRequirementsBuilder,
};
use crate::price::Price;
use crate::proto::PaymentRequired;

/// URI identifying the x402 payments extension for A2A.
pub const X402_EXTENSION_URI: &str = "https://github.com/google-a2a/a2a-x402/v0.1";

/// Version of the A2A extension.
pub const X402_EXTENSION_VERSION: &str = "0.1";

/// x402 protocol version spoken through the extension.
pub const X402_PROTOCOL_VERSION: u8 = 2;

fn default_extension_uri() -> String {
    X402_EXTENSION_URI.to_owned()
}

fn default_extension_version() -> String {
    X402_EXTENSION_VERSION.to_owned()
}

const fn default_x402_version() -> u8 {
    X402_PROTOCOL_VERSION
}

const fn default_required() -> bool {
    true
}

fn default_network() -> String {
    DEFAULT_NETWORK.to_owned()
}

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.to_owned()
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_owned()
}

const fn default_max_timeout_seconds() -> u64 {
    DEFAULT_MAX_TIMEOUT_SECONDS
}

/// How an agent advertises the x402 extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402ExtensionConfig {
    /// Extension URI.
    #[serde(default = "default_extension_uri")]
    pub extension_uri: String,

    /// Extension version.
    #[serde(default = "default_extension_version")]
    pub version: String,

    /// x402 protocol version.
    #[serde(default = "default_x402_version")]
    pub x402_version: u8,

    /// Whether clients must support the extension to talk to the agent.
    #[serde(default = "default_required")]
    pub required: bool,
}

impl Default for X402ExtensionConfig {
    fn default() -> Self {
        Self {
            extension_uri: default_extension_uri(),
            version: default_extension_version(),
            x402_version: default_x402_version(),
            required: default_required(),
        }
    }
}

/// What a merchant agent charges and where the money goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402ServerConfig {
    /// Price of the protected resource.
    pub price: Price,

    /// Address that receives the payment.
    pub pay_to_address: String,

    /// CAIP-2 identifier or known network name.
    #[serde(default = "default_network")]
    pub network: String,

    /// Human-readable description of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// MIME type of the protected response.
    #[serde(default = "default_mime_type")]
    pub mime_type: String,

    /// Payment scheme.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Payment validity window in seconds.
    #[serde(default = "default_max_timeout_seconds")]
    pub max_timeout_seconds: u64,

    /// Resource charged for when the caller does not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl X402ServerConfig {
    /// Creates a configuration with default network, scheme, MIME type and timeout.
    pub fn new<P: Into<Price>, A: Into<String>>(price: P, pay_to_address: A) -> Self {
        Self {
            price: price.into(),
            pay_to_address: pay_to_address.into(),
            network: default_network(),
            description: None,
            mime_type: default_mime_type(),
            scheme: default_scheme(),
            max_timeout_seconds: default_max_timeout_seconds(),
            resource: None,
        }
    }

    /// Returns a builder preset from this configuration for `resource`.
    pub fn builder_for<R: Into<String>>(&self, resource: R) -> PaymentRequirementsBuilder {
        let builder = PaymentRequirementsBuilder::new(
            self.price.clone(),
            self.pay_to_address.as_str(),
            resource,
        )
        .network(self.network.as_str())
        .mime_type(self.mime_type.as_str())
        .scheme(self.scheme.as_str())
        .max_timeout_seconds(self.max_timeout_seconds);
        match &self.description {
            Some(description) => builder.description(description.as_str()),
            None => builder,
        }
    }

    /// Returns a builder for the configured resource.
    ///
    /// # Errors
    ///
    /// Returns [`RequirementsError::EmptyResource`] if no resource is configured.
    pub fn builder(&self) -> Result<PaymentRequirementsBuilder, RequirementsError> {
        self.resource
            .as_deref()
            .map(|resource| self.builder_for(resource))
            .ok_or(RequirementsError::EmptyResource)
    }

    /// Builds the envelope for the configured resource.
    ///
    /// # Errors
    ///
    /// See [`builder`](Self::builder) and [`PaymentRequirementsBuilder::build`].
    pub fn payment_required(&self) -> Result<PaymentRequired, RequirementsError> {
        self.builder()?.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainId;
    use serde_json::json;

    const PAYEE: &str = "0x209693Bc6afc0C5328bA36FaF03C514EF312287C";

    #[test]
    fn test_extension_config_defaults() {
        let config: X402ExtensionConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, X402ExtensionConfig::default());
        assert_eq!(config.extension_uri, X402_EXTENSION_URI);
        assert_eq!(config.version, "0.1");
        assert_eq!(config.x402_version, 2);
        assert!(config.required);
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "extensionUri": X402_EXTENSION_URI,
                "version": "0.1",
                "x402Version": 2,
                "required": true
            })
        );
    }

    #[test]
    fn test_server_config_defaults() {
        let config: X402ServerConfig = serde_json::from_value(json!({
            "price": "$0.01",
            "payToAddress": PAYEE
        }))
        .unwrap();
        assert_eq!(config, X402ServerConfig::new(Price::money("$0.01").unwrap(), PAYEE));
        assert_eq!(config.network, "eip155:84532");
        assert_eq!(config.mime_type, "application/json");
        assert_eq!(config.scheme, "exact");
        assert_eq!(config.max_timeout_seconds, 600);
        assert!(config.resource.is_none());
    }

    #[test]
    fn test_server_config_builds_envelope() {
        let config: X402ServerConfig = serde_json::from_value(json!({
            "price": {
                "asset": "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
                "amount": "250000"
            },
            "payToAddress": PAYEE,
            "network": "base",
            "description": "Weather report",
            "maxTimeoutSeconds": 90,
            "resource": "https://agent.example.com/weather"
        }))
        .unwrap();
        let required = config.payment_required().unwrap();
        let accepted = &required.accepts[0];
        assert_eq!(accepted.network, ChainId::eip155(8453));
        assert_eq!(accepted.amount, "250000");
        assert_eq!(accepted.max_timeout_seconds, 90);
        let resource = required.resource.unwrap();
        assert_eq!(resource.url, "https://agent.example.com/weather");
        assert_eq!(resource.description.as_deref(), Some("Weather report"));
    }

    #[test]
    fn test_server_config_without_resource() {
        let config = X402ServerConfig::new(Price::money("1").unwrap(), PAYEE);
        assert!(matches!(
            config.payment_required(),
            Err(RequirementsError::EmptyResource)
        ));
        let required = config.builder_for("/premium").build().unwrap();
        assert_eq!(required.accepts[0].amount, "1000000");
    }
}
