//! The `exact` scheme on Solana.

use super::{EXACT, SchemeServer, usdc_amount};
use crate::chain::{ChainId, SOLANA_NAMESPACE};
use crate::error::RequirementsError;
use crate::price::{AssetAmount, Money};

const PUBKEY_LEN: usize = 32;

/// `exact` payments on Solana, settled with an SPL token transfer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSvmScheme;

impl SchemeServer for ExactSvmScheme {
    fn scheme(&self) -> &str {
        EXACT
    }

    fn namespace(&self) -> &str {
        SOLANA_NAMESPACE
    }

    fn validate_pay_to(&self, pay_to: &str) -> Result<(), RequirementsError> {
        let invalid = |reason: String| RequirementsError::InvalidPayTo {
            address: pay_to.to_owned(),
            namespace: SOLANA_NAMESPACE.to_owned(),
            reason,
        };
        let bytes = bs58::decode(pay_to)
            .into_vec()
            .map_err(|e| invalid(e.to_string()))?;
        if bytes.len() != PUBKEY_LEN {
            return Err(invalid(format!(
                "expected {PUBKEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
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
