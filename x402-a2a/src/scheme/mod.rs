//! Server-side payment schemes.
//!
//! A [`SchemeServer`] knows how one scheme works on one chain namespace: which
//! payee addresses are valid there, and how a human-readable [`Money`] price
//! becomes an [`AssetAmount`] in the network's default token. The payment
//! requirements builder looks servers up in a [`SchemeServers`] set.
//!
//! Built-in servers:
//!
//! - [`ExactEvmScheme`] - `exact` on `eip155:*` (EIP-3009 USDC transfers)
//! - [`ExactSvmScheme`] - `exact` on `solana:*` (SPL USDC transfers)

mod exact_evm;
mod exact_svm;

pub use exact_evm::ExactEvmScheme;
pub use exact_svm::ExactSvmScheme;

use std::fmt;
use std::sync::LazyLock;

use crate::chain::ChainId;
use crate::error::RequirementsError;
use crate::networks::{self, TokenDeployment};
use crate::price::{AssetAmount, Money};
use crate::proto::PaymentRequirements;

/// Name of the `exact` payment scheme.
pub const EXACT: &str = "exact";

/// Server-side behaviour of a payment scheme on one chain namespace.
pub trait SchemeServer: Send + Sync {
    /// Returns the scheme name (e.g., "exact").
    fn scheme(&self) -> &str;

    /// Returns the CAIP-2 namespace this server handles (e.g., "eip155").
    fn namespace(&self) -> &str;

    /// Returns the identifier of this server (e.g., "eip155-exact").
    fn id(&self) -> String {
        format!("{}-{}", self.namespace(), self.scheme())
    }

    /// Checks that `pay_to` is a well-formed recipient on this namespace.
    ///
    /// # Errors
    ///
    /// Returns [`RequirementsError::InvalidPayTo`] describing the problem.
    fn validate_pay_to(&self, pay_to: &str) -> Result<(), RequirementsError>;

    /// Converts a money price into an amount of the network's default asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the network has no default asset or the amount
    /// cannot be represented in the asset's smallest unit.
    fn parse_price(&self, money: &Money, network: &ChainId)
    -> Result<AssetAmount, RequirementsError>;

    /// Adds scheme-specific data to finished requirements.
    ///
    /// The default implementation returns the requirements unchanged.
    fn enhance_requirements(&self, requirements: PaymentRequirements) -> PaymentRequirements {
        requirements
    }
}

/// Converts money into an atomic amount of the network's USDC deployment.
///
/// # Errors
///
/// Returns [`RequirementsError::NoDefaultAsset`] for networks without a
/// known deployment and [`RequirementsError::Price`] if the conversion fails.
pub fn usdc_amount(
    money: &Money,
    network: &ChainId,
) -> Result<(&'static TokenDeployment, AssetAmount), RequirementsError> {
    let deployment = networks::usdc_deployment(network)
        .ok_or_else(|| RequirementsError::NoDefaultAsset(network.clone()))?;
    let atomic = money.to_atomic(deployment.decimals)?;
    #[cfg(feature = "telemetry")]
    tracing::debug!(
        %money,
        %network,
        asset = deployment.address,
        atomic,
        "x402_a2a.price.normalized"
    );
    Ok((deployment, AssetAmount::new(deployment.address, atomic)))
}

/// A set of scheme servers searched by scheme name and namespace.
pub struct SchemeServers(Vec<Box<dyn SchemeServer>>);

impl SchemeServers {
    /// Creates an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Registers a server, replacing any server with the same scheme and namespace.
    pub fn register<S: SchemeServer + 'static>(&mut self, server: S) {
        self.0
            .retain(|s| s.scheme() != server.scheme() || s.namespace() != server.namespace());
        self.0.push(Box::new(server));
    }

    /// Builder-style variant of [`register`](Self::register).
    #[must_use]
    pub fn and_register<S: SchemeServer + 'static>(mut self, server: S) -> Self {
        self.register(server);
        self
    }

    /// Finds the server for `scheme` on the namespace of `network`.
    #[must_use]
    pub fn find(&self, scheme: &str, network: &ChainId) -> Option<&dyn SchemeServer> {
        self.0
            .iter()
            .find(|s| s.scheme() == scheme && s.namespace() == network.namespace())
            .map(|server| &**server)
    }

    /// Returns the identifiers of all registered servers.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.0.iter().map(|s| s.id()).collect()
    }
}

impl Default for SchemeServers {
    /// The built-in `exact` servers for EVM and Solana.
    fn default() -> Self {
        Self::empty()
            .and_register(ExactEvmScheme)
            .and_register(ExactSvmScheme)
    }
}

impl fmt::Debug for SchemeServers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemeServers").field(&self.ids()).finish()
    }
}

/// The built-in scheme servers, shared by [`crate::merchant::create_payment_requirements`].
pub static DEFAULT_SCHEME_SERVERS: LazyLock<SchemeServers> = LazyLock::new(SchemeServers::default);

#[cfg(test)]
mod tests {
    use super::*;

    struct UptoEvm;

    impl SchemeServer for UptoEvm {
        fn scheme(&self) -> &str {
            "upto"
        }

        fn namespace(&self) -> &str {
            "eip155"
        }

        fn validate_pay_to(&self, _pay_to: &str) -> Result<(), RequirementsError> {
            Ok(())
        }

        fn parse_price(
            &self,
            money: &Money,
            network: &ChainId,
        ) -> Result<AssetAmount, RequirementsError> {
            usdc_amount(money, network).map(|(_, amount)| amount)
        }
    }

    #[test]
    fn test_default_servers() {
        let servers = SchemeServers::default();
        assert_eq!(servers.ids(), vec!["eip155-exact", "solana-exact"]);
        assert!(servers.find(EXACT, &ChainId::eip155(84532)).is_some());
        assert!(servers.find("upto", &ChainId::eip155(84532)).is_none());
        assert!(servers.find(EXACT, &ChainId::new("cosmos", "cosmoshub-4")).is_none());
    }

    #[test]
    fn test_register_replaces_same_slot() {
        let servers = SchemeServers::default()
            .and_register(UptoEvm)
            .and_register(ExactEvmScheme);
        assert_eq!(
            servers.ids(),
            vec!["solana-exact", "eip155-upto", "eip155-exact"]
        );
        let upto = servers.find("upto", &ChainId::eip155(8453)).unwrap();
        assert_eq!(upto.id(), "eip155-upto");
    }

    #[test]
    fn test_usdc_amount_unknown_network() {
        let money: Money = "1".parse().unwrap();
        let err = usdc_amount(&money, &ChainId::eip155(999_999)).unwrap_err();
        assert!(matches!(err, RequirementsError::NoDefaultAsset(_)));
    }
}
