//! FX rate table loading from fx.toml.
//!
//! The conversion table is static per process: it is loaded once at startup
//! and passed into the core by reference. Rates are written as strings so
//! they parse into exact decimals.

use crate::core::fx::FxTable;
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Configuration structure representing an fx.toml file:
///
/// ```toml
/// reference = "PLN"
///
/// [rates]
/// PLN = "1"
/// EUR = "4.30"
/// USD = "3.95"
/// ```
#[derive(Debug, Deserialize)]
pub struct FxConfig {
    /// Currency every rate is expressed against
    pub reference: String,
    /// Rate to the reference currency, per currency code
    pub rates: HashMap<String, Decimal>,
}

impl FxConfig {
    /// Validates the parsed config and builds the runtime table.
    pub fn into_table(self) -> Result<FxTable> {
        FxTable::new(&self.reference, self.rates)
    }
}

/// Loads an FX table from a TOML file.
pub fn load_fx_table<P: AsRef<Path>>(path: P) -> Result<FxTable> {
    let contents = std::fs::read_to_string(path.as_ref())?;

    let config: FxConfig = toml::from_str(&contents).map_err(|e| Error::InvalidConfiguration {
        message: format!("failed to parse FX config: {e}"),
    })?;

    config.into_table()
}

/// Loads the FX table from the default location (./fx.toml), falling back to
/// the built-in table when the file does not exist.
pub fn load_default_fx_table() -> Result<FxTable> {
    if Path::new("fx.toml").exists() {
        load_fx_table("fx.toml")
    } else {
        Ok(FxTable::default())
    }
}
