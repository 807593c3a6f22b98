//! Wallet lifecycle.
//!
//! A wallet fixes the base currency every stored amount is denominated in.
//! Deleting a wallet removes everything it owns in one database transaction;
//! there is no soft delete at this level.

use crate::{
    entities::{
        Category, Product, RecurringTransaction, Transaction, Wallet, WalletModel, category,
        product, recurring_transaction, transaction, wallet,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::info;

/// Creates a wallet with the given base currency.
pub async fn create_wallet(
    db: &DatabaseConnection,
    name: String,
    currency: &str,
    now_utc: DateTime<Utc>,
) -> Result<WalletModel> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidConfiguration {
            message: "wallet name cannot be empty".to_string(),
        });
    }
    let currency = crate::core::fx::normalize_currency(currency)?;

    let model = wallet::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        currency: Set(currency),
        created_at: Set(now_utc),
    };

    Ok(model.insert(db).await?)
}

/// Looks up a wallet by id.
pub async fn get_wallet(db: &DatabaseConnection, wallet_id: Uuid) -> Result<WalletModel> {
    Wallet::find_by_id(wallet_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "wallet" })
}

/// Deletes a wallet and everything it owns.
///
/// Children are removed explicitly, leaves first, inside one database
/// transaction: transactions, recurring templates, products, categories,
/// then the wallet row itself.
pub async fn delete_wallet(db: &DatabaseConnection, wallet_id: Uuid) -> Result<()> {
    let wallet = get_wallet(db, wallet_id).await?;

    let txn = db.begin().await?;

    Transaction::delete_many()
        .filter(transaction::Column::WalletId.eq(wallet_id))
        .exec(&txn)
        .await?;
    RecurringTransaction::delete_many()
        .filter(recurring_transaction::Column::WalletId.eq(wallet_id))
        .exec(&txn)
        .await?;
    Product::delete_many()
        .filter(product::Column::WalletId.eq(wallet_id))
        .exec(&txn)
        .await?;
    Category::delete_many()
        .filter(category::Column::WalletId.eq(wallet_id))
        .exec(&txn)
        .await?;
    wallet.delete(&txn).await?;

    txn.commit().await?;
    info!(wallet_id = %wallet_id, "deleted wallet and all its records");
    Ok(())
}
