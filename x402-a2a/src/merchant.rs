//! Payment requirements for merchant agents.
//!
//! A merchant agent that wants to be paid answers with a
//! [`PaymentRequired`] envelope. [`create_payment_requirements`] builds one
//! with the defaults used across the A2A x402 extension;
//! [`PaymentRequirementsBuilder`] exposes every option.
//!
//! ```rust
//! use x402_a2a::merchant::PaymentRequirementsBuilder;
//! use x402_a2a::price::Price;
//!
//! let required = PaymentRequirementsBuilder::new(
//!     Price::money("$3.10")?,
//!     "0x209693Bc6afc0C5328bA36FaF03C514EF312287C",
//!     "/generate-image",
//! )
//! .description("Generate an image")
//! .max_timeout_seconds(120)
//! .build()?;
//!
//! assert_eq!(required.accepts[0].amount, "3100000");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde_json::{Map, Value};
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::chain::ChainId;
use crate::error::RequirementsError;
use crate::price::{AssetAmount, Price};
use crate::proto::{Extensions, PaymentRequired, PaymentRequirements, ResourceInfo, X402Version2};
use crate::scheme::{DEFAULT_SCHEME_SERVERS, EXACT, SchemeServers};

/// Network used when none is given: Base Sepolia.
pub const DEFAULT_NETWORK: &str = "eip155:84532";

/// MIME type of the protected response when none is given.
pub const DEFAULT_MIME_TYPE: &str = "application/json";

/// Payment scheme used when none is given.
pub const DEFAULT_SCHEME: &str = EXACT;

/// Payment validity window when none is given.
pub const DEFAULT_MAX_TIMEOUT_SECONDS: u64 = 600;

/// The `error` message of every envelope built here.
pub const PAYMENT_REQUIRED_MESSAGE: &str = "Payment required";

/// Key under `extra` that carries the response output schema.
pub const OUTPUT_SCHEMA_KEY: &str = "outputSchema";

const RESERVED_ALIASES: &[&str] = &["pay_to", "max_timeout_seconds"];

/// Builds a [`PaymentRequired`] envelope with a single accepted requirement,
/// using the default network, scheme, MIME type and timeout.
///
/// # Errors
///
/// See [`PaymentRequirementsBuilder::build`].
pub fn create_payment_requirements<P, A, R>(
    price: P,
    pay_to_address: A,
    resource: R,
) -> Result<PaymentRequired, RequirementsError>
where
    P: Into<Price>,
    A: Into<String>,
    R: Into<String>,
{
    PaymentRequirementsBuilder::new(price, pay_to_address, resource).build()
}

/// Configures and builds a [`PaymentRequired`] envelope.
#[derive(Debug, Clone)]
#[must_use]
pub struct PaymentRequirementsBuilder {
    price: Price,
    pay_to: String,
    resource: String,
    network: String,
    description: Option<String>,
    mime_type: String,
    scheme: String,
    max_timeout_seconds: u64,
    output_schema: Option<Value>,
    extra: Map<String, Value>,
    fields: Map<String, Value>,
    extensions: Extensions,
    base_url: Option<Url>,
}

impl PaymentRequirementsBuilder {
    /// Starts a builder for `price`, paid to `pay_to`, for `resource`.
    pub fn new<P, A, R>(price: P, pay_to: A, resource: R) -> Self
    where
        P: Into<Price>,
        A: Into<String>,
        R: Into<String>,
    {
        Self {
            price: price.into(),
            pay_to: pay_to.into(),
            resource: resource.into(),
            network: DEFAULT_NETWORK.to_owned(),
            description: None,
            mime_type: DEFAULT_MIME_TYPE.to_owned(),
            scheme: DEFAULT_SCHEME.to_owned(),
            max_timeout_seconds: DEFAULT_MAX_TIMEOUT_SECONDS,
            output_schema: None,
            extra: Map::new(),
            fields: Map::new(),
            extensions: Extensions::new(),
            base_url: None,
        }
    }

    /// Sets the network, as a CAIP-2 id (`"eip155:8453"`) or a known name (`"base"`).
    pub fn network<S: Into<String>>(mut self, network: S) -> Self {
        self.network = network.into();
        self
    }

    /// Sets the human-readable description of the resource.
    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the MIME type of the protected response.
    pub fn mime_type<S: Into<String>>(mut self, mime_type: S) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Sets the payment scheme.
    pub fn scheme<S: Into<String>>(mut self, scheme: S) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets how long, in seconds, a signed payment stays valid.
    pub const fn max_timeout_seconds(mut self, seconds: u64) -> Self {
        self.max_timeout_seconds = seconds;
        self
    }

    /// Describes the response the client receives after paying.
    pub fn output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Adds a scheme-specific entry to the requirement's `extra` object.
    pub fn extra<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Adds a top-level field to the requirement, forwarded verbatim.
    pub fn field<K: Into<String>>(mut self, name: K, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Attaches protocol extension data to the envelope.
    pub fn extension<K: Into<String>>(mut self, name: K, value: Value) -> Self {
        self.extensions.insert(name.into(), value);
        self
    }

    /// Resolves relative resources (e.g., `/generate-image`) against `base_url`.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Builds the envelope using the built-in scheme servers.
    ///
    /// # Errors
    ///
    /// See [`build_with`](Self::build_with).
    pub fn build(self) -> Result<PaymentRequired, RequirementsError> {
        self.build_with(&DEFAULT_SCHEME_SERVERS)
    }

    /// Builds the envelope, looking up scheme behaviour in `servers`.
    ///
    /// When a server handles the scheme on the target namespace it validates
    /// the payee and converts money prices. Without one, only explicit asset
    /// amounts can be used and the payee is passed through unchecked.
    ///
    /// # Errors
    ///
    /// Returns [`RequirementsError`] if the network is unknown, the payee is
    /// invalid, the price cannot be expressed in the asset, an additional
    /// field shadows a schema field, the timeout is zero, or the resource is
    /// empty or cannot be resolved.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "x402_a2a.create_payment_requirements",
            skip_all,
            err,
            fields(network = %self.network, scheme = %self.scheme)
        )
    )]
    pub fn build_with(self, servers: &SchemeServers) -> Result<PaymentRequired, RequirementsError> {
        let Self {
            price,
            pay_to,
            resource,
            network,
            description,
            mime_type,
            scheme,
            max_timeout_seconds,
            output_schema,
            extra,
            fields,
            extensions,
            base_url,
        } = self;

        let network = ChainId::resolve(&network)?;
        if max_timeout_seconds == 0 {
            return Err(RequirementsError::ZeroTimeout);
        }
        if let Some(name) = fields.keys().find(|name| is_reserved(name)) {
            return Err(RequirementsError::ReservedField(name.clone()));
        }
        let url = resource_url(&resource, base_url.as_ref())?;

        let server = servers.find(&scheme, &network);
        match server {
            Some(server) => server.validate_pay_to(&pay_to)?,
            #[cfg(feature = "telemetry")]
            None => tracing::warn!(
                %network,
                scheme = %scheme,
                "no scheme server, payee left unchecked"
            ),
            #[cfg(not(feature = "telemetry"))]
            None => {}
        }

        let asset_amount = match price {
            Price::Asset(asset_amount) => check_asset_amount(asset_amount)?,
            Price::Money(money) => server
                .ok_or_else(|| RequirementsError::UnsupportedScheme {
                    scheme: scheme.clone(),
                    network: network.clone(),
                })?
                .parse_price(&money, &network)?,
        };

        let mut merged = asset_amount.extra.unwrap_or_default();
        merged.extend(extra);
        if let Some(schema) = output_schema {
            merged.insert(OUTPUT_SCHEMA_KEY.to_owned(), schema);
        }

        let requirements = PaymentRequirements {
            scheme,
            network,
            asset: asset_amount.asset,
            amount: asset_amount.amount,
            pay_to,
            max_timeout_seconds,
            extra: (!merged.is_empty()).then_some(Value::Object(merged)),
            additional: fields,
        };
        let requirements = match server {
            Some(server) => server.enhance_requirements(requirements),
            None => requirements,
        };

        Ok(PaymentRequired {
            x402_version: X402Version2::default(),
            error: Some(PAYMENT_REQUIRED_MESSAGE.to_owned()),
            resource: Some(ResourceInfo {
                url,
                description: description.filter(|d| !d.is_empty()),
                mime_type: Some(mime_type),
            }),
            accepts: vec![requirements],
            extensions: (!extensions.is_empty()).then_some(extensions),
        })
    }
}

fn is_reserved(name: &str) -> bool {
    PaymentRequirements::RESERVED_FIELDS.contains(&name) || RESERVED_ALIASES.contains(&name)
}

fn check_asset_amount(asset_amount: AssetAmount) -> Result<AssetAmount, RequirementsError> {
    if asset_amount.asset.trim().is_empty() {
        return Err(RequirementsError::EmptyAsset);
    }
    if !asset_amount.has_atomic_amount() {
        return Err(RequirementsError::InvalidAmount(asset_amount.amount));
    }
    Ok(asset_amount)
}

/// Absolute URLs are kept as written; relative ones are joined onto
/// `base_url` when there is one and kept verbatim otherwise.
fn resource_url(resource: &str, base_url: Option<&Url>) -> Result<String, RequirementsError> {
    if resource.trim().is_empty() {
        return Err(RequirementsError::EmptyResource);
    }
    let invalid = |source| RequirementsError::InvalidResourceUrl {
        resource: resource.to_owned(),
        source,
    };
    match (Url::parse(resource), base_url) {
        (Ok(_), _) => Ok(resource.to_owned()),
        (Err(url::ParseError::RelativeUrlWithoutBase), Some(base)) => {
            base.join(resource).map(String::from).map_err(invalid)
        }
        (Err(url::ParseError::RelativeUrlWithoutBase), None) => Ok(resource.to_owned()),
        (Err(source), _) => Err(invalid(source)),
    }
}
