//! Shared test utilities.
//!
//! Helpers for setting up in-memory databases and creating test entities
//! with sensible defaults. Time is always the fixed [`test_now`] instant so
//! period assertions stay deterministic.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{category, fx::FxTable, product, transaction, wallet},
    entities::{
        CategoryModel, ProductImportance, ProductModel, TransactionModel, UserSettingsModel,
        WalletModel,
    },
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use sea_orm::prelude::*;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Database plus one PLN wallet, the most common starting point.
pub async fn setup_with_wallet() -> Result<(DatabaseConnection, WalletModel)> {
    let db = setup_test_db().await?;
    let wallet = create_test_wallet(&db, "PLN").await?;
    Ok((db, wallet))
}

/// Fixed reference instant: a mid-July Wednesday morning, safely inside the
/// billing period of any day 1-28 and away from DST transitions.
pub fn test_now() -> DateTime<Utc> {
    "2024-07-17T09:30:00Z".parse().unwrap()
}

/// Parses a decimal literal.
pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Settings row with the given billing day and timezone; other fields get
/// defaults that no test depends on.
pub fn test_settings(billing_day: i32, timezone: &str) -> UserSettingsModel {
    UserSettingsModel {
        user_id: Uuid::new_v4(),
        language: "pl".to_string(),
        currency: "PLN".to_string(),
        billing_day,
        timezone: timezone.to_string(),
    }
}

/// Creates a wallet with the given base currency.
pub async fn create_test_wallet(
    db: &DatabaseConnection,
    currency: &str,
) -> Result<WalletModel> {
    wallet::create_wallet(db, "test wallet".to_string(), currency, test_now()).await
}

/// Creates a category with no color or icon.
pub async fn create_test_category(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    name: &str,
) -> Result<CategoryModel> {
    category::create_category(db, wallet_id, name.to_string(), None, None, test_now()).await
}

/// Creates a product under the given category.
pub async fn create_test_product(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    category_id: Uuid,
    name: &str,
    importance: ProductImportance,
) -> Result<ProductModel> {
    product::create_product(
        db,
        wallet_id,
        category_id,
        name.to_string(),
        importance,
        test_now(),
    )
    .await
}

/// Records an expense in the wallet's own currency, occurring at
/// [`test_now`].
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    wallet: &WalletModel,
    category_id: Uuid,
    product_id: Option<Uuid>,
    amount: &str,
) -> Result<TransactionModel> {
    transaction::create_transaction(
        db,
        &FxTable::default(),
        wallet,
        transaction::NewTransaction {
            category_id,
            product_id,
            amount: dec(amount),
            currency: wallet.currency.clone(),
            occurred_at: None,
        },
        test_now(),
    )
    .await
}
