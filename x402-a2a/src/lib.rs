#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! x402 payments for agent-to-agent (A2A) messaging.
//!
//! A merchant agent that charges for a skill answers with an x402
//! [`PaymentRequired`] envelope instead of a result. This crate builds those
//! envelopes and carries the small set of types the A2A x402 extension adds
//! on top of the x402 wire format: payment status, metadata keys, error
//! codes, extension configuration and activation headers.
//!
//! # Overview
//!
//! ```rust
//! use x402_a2a::{Price, create_payment_requirements};
//!
//! let required = create_payment_requirements(
//!     Price::money("$3.10")?,
//!     "0x209693Bc6afc0C5328bA36FaF03C514EF312287C",
//!     "/generate-image",
//! )?;
//!
//! assert_eq!(required.accepts[0].network.to_string(), "eip155:84532");
//! assert_eq!(required.accepts[0].amount, "3100000");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`merchant`] - Payment requirements builder
//! - [`price`] - Money and explicit asset amounts
//! - [`scheme`] - Per-scheme payee validation and price conversion
//! - [`chain`] - CAIP-2 chain identifiers
//! - [`networks`] - Known networks and their USDC deployments
//! - [`proto`] - x402 V2 wire types
//! - [`state`] - Payment status and A2A metadata helpers
//! - [`config`] - Extension and merchant configuration
//! - [`extension`] - Agent card declaration and activation headers
//! - [`error`] - Error types and stable error codes
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod chain;
pub mod config;
pub mod error;
pub mod extension;
pub mod merchant;
pub mod networks;
pub mod price;
pub mod proto;
pub mod scheme;
pub mod state;

pub use chain::ChainId;
pub use config::{X402_EXTENSION_URI, X402ExtensionConfig, X402ServerConfig};
pub use error::{RequirementsError, X402Error, X402ErrorCode};
pub use extension::{
    AgentExtension, add_extension_activation_header, extension_declaration,
    is_extension_activated,
};
pub use merchant::{PaymentRequirementsBuilder, create_payment_requirements};
pub use price::{AssetAmount, Money, Price};
pub use proto::{
    Extensions, PaymentPayload, PaymentRequired, PaymentRequirements, ResourceInfo,
    SettleResponse,
};
pub use state::{Metadata, PaymentStatus, X402Metadata};
