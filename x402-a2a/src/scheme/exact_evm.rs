//! The `exact` scheme on EIP-155 chains.

use alloy_primitives::Address;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::{EXACT, SchemeServer, usdc_amount};
use crate::chain::{ChainId, EIP155_NAMESPACE};
use crate::error::RequirementsError;
use crate::price::{AssetAmount, Money};

/// `exact` payments on EVM chains, settled with EIP-3009 `transferWithAuthorization`.
///
/// Money prices resolve to the chain's USDC deployment; the token's EIP-712
/// domain is published in `extra` as `{ "name", "version" }` so clients can
/// sign without an RPC round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactEvmScheme;

impl SchemeServer for ExactEvmScheme {
    fn scheme(&self) -> &str {
        EXACT
    }

    fn namespace(&self) -> &str {
        EIP155_NAMESPACE
    }

    fn validate_pay_to(&self, pay_to: &str) -> Result<(), RequirementsError> {
        let invalid = |reason: &str| RequirementsError::InvalidPayTo {
            address: pay_to.to_owned(),
            namespace: EIP155_NAMESPACE.to_owned(),
            reason: reason.to_owned(),
        };
        let Some(hex) = pay_to.strip_prefix("0x") else {
            return Err(invalid("expected a 0x-prefixed address"));
        };
        let address = Address::from_str(pay_to).map_err(|e| invalid(&e.to_string()))?;
        let mixed_case = hex.bytes().any(|b| b.is_ascii_uppercase())
            && hex.bytes().any(|b| b.is_ascii_lowercase());
        if mixed_case && Address::parse_checksummed(pay_to, None).is_err() {
            return Err(invalid("EIP-55 checksum mismatch"));
        }
        if address.is_zero() {
            return Err(invalid("the zero address cannot receive payments"));
        }
        Ok(())
    }

    fn parse_price(
        &self,
        money: &Money,
        network: &ChainId,
    ) -> Result<AssetAmount, RequirementsError> {
        let (deployment, amount) = usdc_amount(money, network)?;
        Ok(match deployment.eip712 {
            Some(domain) => {
                let mut extra = Map::new();
                extra.insert("name".into(), Value::from(domain.name));
                extra.insert("version".into(), Value::from(domain.version));
                amount.with_extra(extra)
            }
            None => amount,
        })
    }
}
