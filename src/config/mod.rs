/// Database connection and table creation
pub mod database;

/// FX rate table loading from fx.toml
pub mod fx;
