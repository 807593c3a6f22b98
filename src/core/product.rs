//! Product business logic.
//!
//! Products refine a category and carry the importance rating used by the
//! importance summary. Like categories they are soft-deleted; hard deletion
//! first unlinks any transaction or template references inside one database
//! transaction so no money record is orphaned.

use crate::{
    entities::{
        Product, ProductImportance, ProductModel, RecurringTransaction, Transaction, product,
        recurring_transaction, transaction,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Creates a product under a category of the same wallet.
pub async fn create_product(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    category_id: Uuid,
    name: String,
    importance: ProductImportance,
    now_utc: DateTime<Utc>,
) -> Result<ProductModel> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidConfiguration {
            message: "product name cannot be empty".to_string(),
        });
    }

    // The category must exist in this wallet and be live.
    crate::core::category::get_active_category(db, wallet_id, category_id).await?;

    let model = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        wallet_id: Set(wallet_id),
        category_id: Set(category_id),
        name: Set(name),
        importance: Set(importance),
        created_at: Set(now_utc),
        deleted_at: Set(None),
    };

    Ok(model.insert(db).await?)
}

/// Lists the wallet's products, live or soft-deleted, ordered by creation
/// time.
pub async fn list_products(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    deleted: bool,
) -> Result<Vec<ProductModel>> {
    let mut query = Product::find().filter(product::Column::WalletId.eq(wallet_id));
    query = if deleted {
        query.filter(product::Column::DeletedAt.is_not_null())
    } else {
        query.filter(product::Column::DeletedAt.is_null())
    };

    query
        .order_by_asc(product::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up a product within the wallet scope, regardless of deletion state.
pub async fn get_product<C>(
    db: &C,
    wallet_id: Uuid,
    product_id: Uuid,
) -> Result<Option<ProductModel>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .filter(product::Column::WalletId.eq(wallet_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Looks up a product that must exist in the wallet and not be soft-deleted.
pub async fn get_active_product<C>(
    db: &C,
    wallet_id: Uuid,
    product_id: Uuid,
) -> Result<ProductModel>
where
    C: ConnectionTrait,
{
    let product = get_product(db, wallet_id, product_id)
        .await?
        .ok_or(Error::NotFound { entity: "product" })?;
    if product.deleted_at.is_some() {
        return Err(Error::NotFound { entity: "product" });
    }
    Ok(product)
}

/// Soft-deletes a product. Fails with `NotFound` when absent or already
/// soft-deleted.
pub async fn soft_delete_product(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    product_id: Uuid,
    now_utc: DateTime<Utc>,
) -> Result<()> {
    let product = get_active_product(db, wallet_id, product_id).await?;

    let mut active: product::ActiveModel = product.into();
    active.deleted_at = Set(Some(now_utc));
    active.update(db).await?;

    Ok(())
}

/// Hard-deletes a product that was soft-deleted first.
///
/// Transactions and recurring templates that referenced the product keep
/// their category but lose the product link; the unlink and the row removal
/// happen in one database transaction.
pub async fn hard_delete_product(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    product_id: Uuid,
) -> Result<()> {
    let product = get_product(db, wallet_id, product_id)
        .await?
        .ok_or(Error::NotFound { entity: "product" })?;
    if product.deleted_at.is_none() {
        return Err(Error::Conflict {
            message: "soft delete product first".to_string(),
        });
    }

    let txn = db.begin().await?;

    Transaction::update_many()
        .col_expr(
            transaction::Column::ProductId,
            Expr::value(Option::<Uuid>::None),
        )
        .filter(transaction::Column::WalletId.eq(wallet_id))
        .filter(transaction::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;

    RecurringTransaction::update_many()
        .col_expr(
            recurring_transaction::Column::ProductId,
            Expr::value(Option::<Uuid>::None),
        )
        .filter(recurring_transaction::Column::WalletId.eq(wallet_id))
        .filter(recurring_transaction::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;

    product.delete(&txn).await?;
    txn.commit().await?;

    Ok(())
}
