//! Currency normalization and fixed-point FX conversion.
//!
//! All amounts are [`Decimal`] rounded half-up to 2 decimal places. Rates are
//! expressed against a single reference currency; the rate between any two
//! currencies is the ratio of their reference rates. The table is read-only
//! and built once at process start.

use crate::errors::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Read-only conversion table mapping each supported currency to its rate
/// against one reference currency. The reference currency itself maps to 1.
#[derive(Debug, Clone)]
pub struct FxTable {
    reference: String,
    rates: HashMap<String, Decimal>,
}

impl FxTable {
    /// Builds a table from a reference currency and per-currency rates.
    ///
    /// Codes are normalized to uppercase. Fails with `InvalidCurrency` on a
    /// malformed code and `InvalidConfiguration` on a non-positive rate or a
    /// reference currency missing from the rate map.
    pub fn new(reference: &str, rates: impl IntoIterator<Item = (String, Decimal)>) -> Result<Self> {
        let reference = normalize_currency(reference)?;
        let mut normalized = HashMap::new();
        for (code, rate) in rates {
            let code = normalize_currency(&code)?;
            if rate <= Decimal::ZERO {
                return Err(Error::InvalidConfiguration {
                    message: format!("non-positive FX rate {rate} for {code}"),
                });
            }
            normalized.insert(code, rate);
        }
        if !normalized.contains_key(&reference) {
            return Err(Error::InvalidConfiguration {
                message: format!("reference currency {reference} missing from rate table"),
            });
        }
        Ok(Self {
            reference,
            rates: normalized,
        })
    }

    /// The reference currency all table rates are expressed against.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    fn rate_to_reference(&self, code: &str) -> Result<Decimal> {
        self.rates
            .get(code)
            .copied()
            .ok_or_else(|| Error::InvalidCurrency {
                message: format!("unsupported currency: {code}"),
            })
    }

    /// Rate converting one unit of `from` into `to`. A currency's rate to
    /// itself is exactly 1.
    pub fn rate(&self, from: &str, to: &str) -> Result<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        Ok(self.rate_to_reference(from)? / self.rate_to_reference(to)?)
    }
}

impl Default for FxTable {
    /// The built-in table: PLN is the reference, EUR and USD at fixed rates.
    fn default() -> Self {
        let rates = [
            ("PLN".to_string(), Decimal::ONE),
            ("EUR".to_string(), Decimal::new(430, 2)),
            ("USD".to_string(), Decimal::new(395, 2)),
        ];
        // The built-in constants satisfy every constructor check.
        #[allow(clippy::expect_used)]
        Self::new("PLN", rates).expect("built-in FX table is valid")
    }
}

/// How a user-entered amount maps onto the wallet's base currency.
///
/// The three FX fields are set together or not at all; modeling them as a
/// tagged variant removes the partial-state possibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FxBreakdown {
    /// Entered in the wallet currency; stored as-is.
    Direct {
        /// Rounded amount in the wallet's base currency
        amount_base: Decimal,
    },
    /// Entered in a foreign currency and converted at a fixed rate.
    Converted {
        /// Rounded converted amount in the wallet's base currency
        amount_base: Decimal,
        /// Rounded amount as entered by the user
        amount_original: Decimal,
        /// The currency the user entered
        currency_original: String,
        /// The rounded rate used for the conversion
        fx_rate: Decimal,
    },
}

impl FxBreakdown {
    /// The amount in the wallet's base currency, whichever variant applies.
    #[must_use]
    pub fn amount_base(&self) -> Decimal {
        match self {
            Self::Direct { amount_base } | Self::Converted { amount_base, .. } => *amount_base,
        }
    }
}

/// Rounds half-up to 2 decimal places.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Normalizes a currency code: trimmed, uppercased, exactly 3 ASCII letters.
pub fn normalize_currency(value: &str) -> Result<String> {
    let code = value.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidCurrency {
            message: format!("currency must be a 3-letter code, got '{value}'"),
        });
    }
    Ok(code)
}

/// Converts a user-entered amount into the wallet's base currency.
///
/// The rate is rounded to 2 decimals before multiplication, so the stored
/// base amount can always be re-derived from the stored original amount and
/// rate. Fails with `InvalidAmount` for non-positive amounts and
/// `InvalidCurrency` for malformed or unsupported codes.
pub fn compute_amounts(
    amount: Decimal,
    input_currency: &str,
    wallet_currency: &str,
    fx: &FxTable,
) -> Result<FxBreakdown> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }

    let input_currency = normalize_currency(input_currency)?;
    let wallet_currency = normalize_currency(wallet_currency)?;

    if input_currency == wallet_currency {
        return Ok(FxBreakdown::Direct {
            amount_base: round2(amount),
        });
    }

    let rate = round2(fx.rate(&input_currency, &wallet_currency)?);
    let amount_original = round2(amount);
    let amount_base = round2(amount_original * rate);

    Ok(FxBreakdown::Converted {
        amount_base,
        amount_original,
        currency_original: input_currency,
        fx_rate: rate,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_normalize_currency_uppercases_and_trims() {
        assert_eq!(normalize_currency(" eur ").unwrap(), "EUR");
        assert_eq!(normalize_currency("PLN").unwrap(), "PLN");
    }

    #[test]
    fn test_normalize_currency_rejects_bad_codes() {
        assert!(matches!(
            normalize_currency("EU"),
            Err(Error::InvalidCurrency { .. })
        ));
        assert!(matches!(
            normalize_currency("EURO"),
            Err(Error::InvalidCurrency { .. })
        ));
        assert!(matches!(
            normalize_currency("E1R"),
            Err(Error::InvalidCurrency { .. })
        ));
        assert!(matches!(
            normalize_currency(""),
            Err(Error::InvalidCurrency { .. })
        ));
    }

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(dec("1.005")), dec("1.01"));
        assert_eq!(round2(dec("1.004")), dec("1.00"));
        assert_eq!(round2(dec("2.675")), dec("2.68"));
        assert_eq!(round2(dec("-1.005")), dec("-1.01"));
    }

    #[test]
    fn test_rate_to_self_is_one() {
        let fx = FxTable::default();
        assert_eq!(fx.rate("EUR", "EUR").unwrap(), Decimal::ONE);
        assert_eq!(fx.rate("PLN", "PLN").unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_rate_is_ratio_of_reference_rates() {
        let fx = FxTable::default();
        // EUR->PLN = 4.30 / 1
        assert_eq!(fx.rate("EUR", "PLN").unwrap(), dec("4.30"));
        // EUR->USD = 4.30 / 3.95
        let rate = fx.rate("EUR", "USD").unwrap();
        assert_eq!(round2(rate), dec("1.09"));
    }

    #[test]
    fn test_rate_unsupported_currency() {
        let fx = FxTable::default();
        assert!(matches!(
            fx.rate("GBP", "PLN"),
            Err(Error::InvalidCurrency { .. })
        ));
    }

    #[test]
    fn test_table_rejects_non_positive_rate() {
        let result = FxTable::new("PLN", [("PLN".to_string(), Decimal::ZERO)]);
        assert!(matches!(
            result,
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_table_requires_reference_rate() {
        let result = FxTable::new("PLN", [("EUR".to_string(), dec("4.30"))]);
        assert!(matches!(
            result,
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_compute_amounts_same_currency_is_direct() {
        let fx = FxTable::default();
        let breakdown = compute_amounts(dec("12.345"), "PLN", "PLN", &fx).unwrap();
        assert_eq!(
            breakdown,
            FxBreakdown::Direct {
                amount_base: dec("12.35")
            }
        );
    }

    #[test]
    fn test_compute_amounts_eur_to_pln_scenario() {
        // 100 EUR into a PLN wallet at EUR->ref=4.30, PLN->ref=1
        let fx = FxTable::default();
        let breakdown = compute_amounts(dec("100"), "EUR", "PLN", &fx).unwrap();
        assert_eq!(
            breakdown,
            FxBreakdown::Converted {
                amount_base: dec("430.00"),
                amount_original: dec("100.00"),
                currency_original: "EUR".to_string(),
                fx_rate: dec("4.30"),
            }
        );
    }

    #[test]
    fn test_compute_amounts_round_trip_invariant() {
        let fx = FxTable::default();
        for amount in ["0.01", "19.99", "123.456", "7.77"] {
            let breakdown = compute_amounts(dec(amount), "USD", "EUR", &fx).unwrap();
            if let FxBreakdown::Converted {
                amount_base,
                amount_original,
                fx_rate,
                ..
            } = breakdown
            {
                assert_eq!(amount_base, round2(amount_original * fx_rate));
            } else {
                panic!("expected converted breakdown");
            }
        }
    }

    #[test]
    fn test_compute_amounts_rejects_non_positive() {
        let fx = FxTable::default();
        assert!(matches!(
            compute_amounts(Decimal::ZERO, "PLN", "PLN", &fx),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            compute_amounts(dec("-5"), "EUR", "PLN", &fx),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_compute_amounts_normalizes_input_case() {
        let fx = FxTable::default();
        let breakdown = compute_amounts(dec("10"), "eur", "pln", &fx).unwrap();
        assert!(matches!(breakdown, FxBreakdown::Converted { .. }));
    }
}
