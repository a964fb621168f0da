//! Prices as callers express them.
//!
//! A [`Price`] is either human-readable [`Money`] (`"$3.10"`, `"0.001"`, `0.10`)
//! that still has to be converted to a token's smallest unit, or an
//! [`AssetAmount`] that already names the asset and the atomic amount.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static MONEY_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^\$?\s*(?P<amount>[0-9]+(?:\.[0-9]+)?)$")
        .expect("money pattern is a valid regex")
});

/// Errors produced when parsing or converting a money amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    /// The input is not a recognizable money literal.
    #[error("Invalid money amount {0:?}")]
    InvalidFormat(String),
    /// Negative amounts cannot be paid.
    #[error("Negative amount not allowed")]
    Negative,
    /// The amount has more fractional digits than the token can represent.
    #[error("Amount {amount} has more precision than a token with {decimals} decimals")]
    TooPrecise {
        /// The offending amount.
        amount: Decimal,
        /// Decimals of the target token.
        decimals: u8,
    },
    /// The atomic amount does not fit the supported range.
    #[error("Amount {amount} overflows when scaled to {decimals} decimals")]
    Overflow {
        /// The offending amount.
        amount: Decimal,
        /// Decimals of the target token.
        decimals: u8,
    },
}

/// A non-negative amount of currency, denominated in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Creates a money amount from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative);
        }
        Ok(Self(amount))
    }

    /// Returns the decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Converts this amount to a token's smallest unit.
    ///
    /// `"$3.10"` with 6 decimals becomes `3100000`. Amounts that would need
    /// rounding are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::TooPrecise`] or [`MoneyError::Overflow`].
    pub fn to_atomic(&self, decimals: u8) -> Result<u128, MoneyError> {
        let overflow = || MoneyError::Overflow {
            amount: self.0,
            decimals,
        };
        let factor = 10u64
            .checked_pow(u32::from(decimals))
            .map(Decimal::from)
            .ok_or_else(overflow)?;
        let scaled = self.0.checked_mul(factor).ok_or_else(overflow)?;
        if !scaled.fract().is_zero() {
            return Err(MoneyError::TooPrecise {
                amount: self.0,
                decimals,
            });
        }
        scaled.trunc().to_u128().ok_or_else(overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount = MONEY_PATTERN
            .captures(trimmed)
            .and_then(|caps| caps.name("amount"))
            .ok_or_else(|| MoneyError::InvalidFormat(s.to_owned()))?;
        let decimal = Decimal::from_str(amount.as_str())
            .map_err(|_| MoneyError::InvalidFormat(s.to_owned()))?;
        Self::new(decimal)
    }
}

impl TryFrom<f64> for Money {
    type Error = MoneyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let decimal =
            Decimal::from_f64(value).ok_or_else(|| MoneyError::InvalidFormat(value.to_string()))?;
        Self::new(decimal)
    }
}

impl From<u64> for Money {
    fn from(value: u64) -> Self {
        Self(Decimal::from(value))
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Unsigned(u64),
            Float(f64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => s.parse(),
            Repr::Unsigned(n) => Ok(Self::from(n)),
            Repr::Float(f) => Self::try_from(f),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// An amount of a specific token, already expressed in its smallest unit.
///
/// # JSON Format
///
/// ```json
/// {
///   "asset": "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
///   "amount": "10000",
///   "extra": { "name": "USDC", "version": "2" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAmount {
    /// Token address or identifier.
    pub asset: String,
    /// Amount in the token's smallest unit, as a decimal integer string.
    pub amount: String,
    /// Scheme-specific data for the asset (e.g., EIP-712 domain).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

impl AssetAmount {
    /// Creates an asset amount without extra data.
    pub fn new<A: Into<String>, N: ToString>(asset: A, amount: N) -> Self {
        Self {
            asset: asset.into(),
            amount: amount.to_string(),
            extra: None,
        }
    }

    /// Attaches scheme-specific extra data.
    #[must_use]
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Returns `true` if `amount` is a non-empty string of ASCII digits.
    #[must_use]
    pub fn has_atomic_amount(&self) -> bool {
        !self.amount.is_empty() && self.amount.bytes().all(|b| b.is_ascii_digit())
    }
}

/// The price of a protected resource.
///
/// Serialized untagged: a string or number is [`Money`], an object is an
/// [`AssetAmount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    /// A human-readable amount paid in the network's default stablecoin.
    Money(Money),
    /// An explicit token amount.
    Asset(AssetAmount),
}

impl Price {
    /// Parses a money literal such as `"$3.10"` into a price.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError`] if the literal is not valid money.
    pub fn money(literal: &str) -> Result<Self, MoneyError> {
        literal.parse().map(Self::Money)
    }
}

impl From<Money> for Price {
    fn from(value: Money) -> Self {
        Self::Money(value)
    }
}

impl From<AssetAmount> for Price {
    fn from(value: AssetAmount) -> Self {
        Self::Asset(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_money_parse_literals() {
        let cases = [
            ("$3.10", "3.10"),
            ("0.001", "0.001"),
            (" $1 ", "1"),
            ("$ 2.5", "2.5"),
        ];
        for (input, expected) in cases {
            let money: Money = input.parse().unwrap();
            assert_eq!(money.amount(), Decimal::from_str(expected).unwrap(), "{input}");
        }
    }

    #[test]
    fn test_money_parse_rejects_garbage() {
        for input in ["", "$", "abc", "-1", "$-1.00", "1.2.3", "1e5", "USD 1", "7.", ".25"] {
            assert!(input.parse::<Money>().is_err(), "{input}");
        }
    }

    #[test]
    fn test_money_to_atomic() {
        let money: Money = "$3.10".parse().unwrap();
        assert_eq!(money.to_atomic(6).unwrap(), 3_100_000);

        let money: Money = "0.000001".parse().unwrap();
        assert_eq!(money.to_atomic(6).unwrap(), 1);

        let money = Money::from(0);
        assert_eq!(money.to_atomic(18).unwrap(), 0);
    }

    #[test]
    fn test_money_to_atomic_too_precise() {
        let money: Money = "0.0000001".parse().unwrap();
        assert!(matches!(
            money.to_atomic(6),
            Err(MoneyError::TooPrecise { decimals: 6, .. })
        ));
    }

    #[test]
    fn test_money_to_atomic_overflow() {
        let money = Money::from(u64::MAX);
        assert!(matches!(
            money.to_atomic(18),
            Err(MoneyError::Overflow { .. })
        ));
    }

    #[test]
    fn test_money_from_json_number_and_string() {
        let money: Money = serde_json::from_value(json!(0.1)).unwrap();
        assert_eq!(money.amount(), Decimal::from_str("0.1").unwrap());

        let money: Money = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(money.to_atomic(6).unwrap(), 3_000_000);

        let money: Money = serde_json::from_value(json!("$3.10")).unwrap();
        assert_eq!(serde_json::to_value(money).unwrap(), json!("3.10"));

        assert!(serde_json::from_value::<Money>(json!(-2)).is_err());
    }

    #[test]
    fn test_price_untagged() {
        let price: Price = serde_json::from_value(json!("$0.01")).unwrap();
        assert!(matches!(price, Price::Money(_)));

        let price: Price = serde_json::from_value(json!({
            "asset": "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
            "amount": "10000",
            "extra": { "name": "USDC", "version": "2" }
        }))
        .unwrap();
        let Price::Asset(asset) = price else {
            panic!("expected asset amount");
        };
        assert_eq!(asset.amount, "10000");
        assert!(asset.has_atomic_amount());
        assert_eq!(asset.extra.unwrap()["name"], "USDC");
    }

    #[test]
    fn test_asset_amount_atomic_check() {
        assert!(AssetAmount::new("0xabc", 10_000u64).has_atomic_amount());
        assert!(!AssetAmount::new("0xabc", "1.5").has_atomic_amount());
        assert!(!AssetAmount::new("0xabc", "").has_atomic_amount());
    }
}
