//! Core business logic, framework-agnostic.
//!
//! Every function takes the database connection and, where time matters, an
//! injected `now_utc`. Nothing in here reads the wall clock or knows about
//! any transport layer.

/// Category catalog operations
pub mod category;
/// Currency normalization and FX conversion into the wallet base currency
pub mod fx;
/// Billing-period resolution in the user's timezone
pub mod period;
/// Product catalog operations and importance ratings
pub mod product;
/// Recurring templates and their once-per-period application
pub mod recurring;
/// Per-user settings validation and storage
pub mod settings;
/// Spending aggregation: category/product breakdowns, importance, history
pub mod summary;
/// Expense recording, listing, refunds and soft deletion
pub mod transaction;
/// Wallet lifecycle
pub mod wallet;
