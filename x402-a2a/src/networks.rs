//! Well-known networks and their default payment assets.
//!
//! Maps human-readable network names (e.g., `"base-sepolia"`) to CAIP-2
//! chain identifiers and records the USDC deployment used when a price is
//! given as plain money rather than as an explicit asset amount.

use crate::chain::{ChainId, EIP155_NAMESPACE, SOLANA_NAMESPACE};

/// A known network definition with its chain ID parts and human-readable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Human-readable network name (e.g., "base-sepolia", "solana").
    pub name: &'static str,
    /// CAIP-2 namespace (e.g., "eip155", "solana").
    pub namespace: &'static str,
    /// Chain reference (e.g., "84532" for Base Sepolia).
    pub reference: &'static str,
}

impl NetworkInfo {
    /// Creates a `ChainId` from this network info.
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        ChainId::new(self.namespace, self.reference)
    }

    fn is(&self, chain_id: &ChainId) -> bool {
        self.namespace == chain_id.namespace() && self.reference == chain_id.reference()
    }
}

/// EIP-712 domain parameters a token uses for `transferWithAuthorization`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip712Domain {
    /// Domain name (e.g., "USD Coin").
    pub name: &'static str,
    /// Domain version (e.g., "2").
    pub version: &'static str,
}

/// A token contract deployed on a specific network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenDeployment {
    /// The network the token lives on.
    pub network: NetworkInfo,
    /// Token address (checksummed hex for EVM, base58 mint for Solana).
    pub address: &'static str,
    /// Number of decimals of the token's smallest unit.
    pub decimals: u8,
    /// EIP-712 domain, for EVM tokens that support signed authorizations.
    pub eip712: Option<Eip712Domain>,
}

const fn evm(name: &'static str, reference: &'static str) -> NetworkInfo {
    NetworkInfo {
        name,
        namespace: EIP155_NAMESPACE,
        reference,
    }
}

const fn svm(name: &'static str, reference: &'static str) -> NetworkInfo {
    NetworkInfo {
        name,
        namespace: SOLANA_NAMESPACE,
        reference,
    }
}

/// Base Mainnet.
pub const BASE: NetworkInfo = evm("base", "8453");
/// Base Sepolia testnet, the default network for payment requirements.
pub const BASE_SEPOLIA: NetworkInfo = evm("base-sepolia", "84532");
/// Ethereum Mainnet.
pub const ETHEREUM: NetworkInfo = evm("ethereum", "1");
/// Polygon Mainnet.
pub const POLYGON: NetworkInfo = evm("polygon", "137");
/// Polygon Amoy testnet.
pub const POLYGON_AMOY: NetworkInfo = evm("polygon-amoy", "80002");
/// Avalanche C-Chain.
pub const AVALANCHE: NetworkInfo = evm("avalanche", "43114");
/// Avalanche Fuji testnet.
pub const AVALANCHE_FUJI: NetworkInfo = evm("avalanche-fuji", "43113");
/// Celo Mainnet.
pub const CELO: NetworkInfo = evm("celo", "42220");
/// Solana mainnet-beta.
pub const SOLANA: NetworkInfo = svm("solana", "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp");
/// Solana devnet.
pub const SOLANA_DEVNET: NetworkInfo = svm("solana-devnet", "EtWTRABZaYq6iMfeYKouRu166VU2xqa1");

/// All networks known by name.
pub static KNOWN_NETWORKS: &[NetworkInfo] = &[
    BASE,
    BASE_SEPOLIA,
    ETHEREUM,
    POLYGON,
    POLYGON_AMOY,
    AVALANCHE,
    AVALANCHE_FUJI,
    CELO,
    SOLANA,
    SOLANA_DEVNET,
];

const USD_COIN: Option<Eip712Domain> = Some(Eip712Domain {
    name: "USD Coin",
    version: "2",
});

const USDC_TESTNET: Option<Eip712Domain> = Some(Eip712Domain {
    name: "USDC",
    version: "2",
});

/// Native Circle USDC deployments, one per known network.
pub static USDC_DEPLOYMENTS: &[TokenDeployment] = &[
    TokenDeployment {
        network: BASE,
        address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
        decimals: 6,
        eip712: USD_COIN,
    },
    TokenDeployment {
        network: BASE_SEPOLIA,
        address: "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
        decimals: 6,
        eip712: USDC_TESTNET,
    },
    TokenDeployment {
        network: ETHEREUM,
        address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
        decimals: 6,
        eip712: USD_COIN,
    },
    TokenDeployment {
        network: POLYGON,
        address: "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359",
        decimals: 6,
        eip712: USD_COIN,
    },
    TokenDeployment {
        network: POLYGON_AMOY,
        address: "0x41E94eB71Ef8C9faE0235d1E472B21e21b5A4dBf",
        decimals: 6,
        eip712: USDC_TESTNET,
    },
    TokenDeployment {
        network: AVALANCHE,
        address: "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E",
        decimals: 6,
        eip712: USD_COIN,
    },
    TokenDeployment {
        network: AVALANCHE_FUJI,
        address: "0x5425890298aed601595a70AB815c96711a31Bc65",
        decimals: 6,
        eip712: USD_COIN,
    },
    TokenDeployment {
        network: CELO,
        address: "0xcebA9300f2b948710d2653dD7B07f33A8B32118C",
        decimals: 6,
        eip712: USD_COIN,
    },
    TokenDeployment {
        network: SOLANA,
        address: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        decimals: 6,
        eip712: None,
    },
    TokenDeployment {
        network: SOLANA_DEVNET,
        address: "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU",
        decimals: 6,
        eip712: None,
    },
];

/// Looks up a [`ChainId`] by its human-readable network name.
#[must_use]
pub fn chain_id_by_network_name(name: &str) -> Option<ChainId> {
    KNOWN_NETWORKS
        .iter()
        .find(|info| info.name == name)
        .map(NetworkInfo::chain_id)
}

/// Looks up a human-readable network name by its [`ChainId`].
#[must_use]
pub fn network_name_by_chain_id(chain_id: &ChainId) -> Option<&'static str> {
    KNOWN_NETWORKS
        .iter()
        .find(|info| info.is(chain_id))
        .map(|info| info.name)
}

/// Returns the USDC deployment for a chain, if known.
#[must_use]
pub fn usdc_deployment(chain_id: &ChainId) -> Option<&'static TokenDeployment> {
    USDC_DEPLOYMENTS.iter().find(|d| d.network.is(chain_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    #[test]
    fn test_chain_id_by_network_name() {
        let base_sepolia = chain_id_by_network_name("base-sepolia").unwrap();
        assert_eq!(base_sepolia.namespace(), "eip155");
        assert_eq!(base_sepolia.reference(), "84532");

        let solana = chain_id_by_network_name("solana").unwrap();
        assert_eq!(solana.namespace(), "solana");

        assert!(chain_id_by_network_name("unknown").is_none());
    }

    #[test]
    fn test_network_name_by_chain_id() {
        assert_eq!(network_name_by_chain_id(&ChainId::eip155(8453)), Some("base"));
        assert_eq!(network_name_by_chain_id(&ChainId::eip155(42220)), Some("celo"));
        assert!(network_name_by_chain_id(&ChainId::eip155(999_999)).is_none());
    }

    #[test]
    fn test_every_known_network_has_usdc() {
        for info in KNOWN_NETWORKS {
            assert!(usdc_deployment(&info.chain_id()).is_some(), "{}", info.name);
        }
    }

    #[test]
    fn test_evm_usdc_addresses_are_checksummed() {
        for deployment in USDC_DEPLOYMENTS
            .iter()
            .filter(|d| d.network.namespace == EIP155_NAMESPACE)
        {
            let parsed = Address::parse_checksummed(deployment.address, None).unwrap();
            assert_eq!(parsed.to_checksum(None), deployment.address);
            assert!(deployment.eip712.is_some());
        }
    }
}
