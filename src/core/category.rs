//! Category business logic.
//!
//! Categories are the primary spending dimension. They are soft-deleted so
//! historic transactions keep a valid reference; hard deletion is only
//! permitted once the category is soft-deleted and nothing references it.

use crate::{
    entities::{
        Category, CategoryModel, ProductModel, RecurringTransaction, Transaction, category,
        recurring_transaction, transaction,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a category in the wallet, enforcing per-wallet name uniqueness.
pub async fn create_category(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    name: String,
    color: Option<String>,
    icon: Option<String>,
    now_utc: DateTime<Utc>,
) -> Result<CategoryModel> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidConfiguration {
            message: "category name cannot be empty".to_string(),
        });
    }

    let exists = Category::find()
        .filter(category::Column::WalletId.eq(wallet_id))
        .filter(category::Column::Name.eq(name.clone()))
        .one(db)
        .await?;
    if exists.is_some() {
        return Err(Error::Conflict {
            message: format!("category '{name}' already exists in this wallet"),
        });
    }

    let model = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        wallet_id: Set(wallet_id),
        name: Set(name),
        color: Set(color),
        icon: Set(icon),
        created_at: Set(now_utc),
        deleted_at: Set(None),
    };

    Ok(model.insert(db).await?)
}

/// Lists the wallet's categories, either live or soft-deleted ones,
/// ordered by creation time.
pub async fn list_categories(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    deleted: bool,
) -> Result<Vec<CategoryModel>> {
    let mut query = Category::find().filter(category::Column::WalletId.eq(wallet_id));
    query = if deleted {
        query.filter(category::Column::DeletedAt.is_not_null())
    } else {
        query.filter(category::Column::DeletedAt.is_null())
    };

    query
        .order_by_asc(category::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up a category within the wallet scope, regardless of deletion state.
pub async fn get_category<C>(
    db: &C,
    wallet_id: Uuid,
    category_id: Uuid,
) -> Result<Option<CategoryModel>>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .filter(category::Column::WalletId.eq(wallet_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Looks up a category that must exist in the wallet and not be soft-deleted.
pub async fn get_active_category<C>(
    db: &C,
    wallet_id: Uuid,
    category_id: Uuid,
) -> Result<CategoryModel>
where
    C: ConnectionTrait,
{
    let category = get_category(db, wallet_id, category_id)
        .await?
        .ok_or(Error::NotFound { entity: "category" })?;
    if category.deleted_at.is_some() {
        return Err(Error::NotFound { entity: "category" });
    }
    Ok(category)
}

/// Validates a category reference and, when present, a product reference.
///
/// Both must exist in the wallet and not be soft-deleted; the product must
/// belong to the category (`Conflict` otherwise). Shared by transaction
/// creation and recurring template create/update.
pub async fn validate_category_and_optional_product<C>(
    db: &C,
    wallet_id: Uuid,
    category_id: Uuid,
    product_id: Option<Uuid>,
) -> Result<(CategoryModel, Option<ProductModel>)>
where
    C: ConnectionTrait,
{
    let category = get_active_category(db, wallet_id, category_id).await?;

    let Some(product_id) = product_id else {
        return Ok((category, None));
    };

    let product = crate::core::product::get_active_product(db, wallet_id, product_id).await?;
    if product.category_id != category.id {
        return Err(Error::Conflict {
            message: "product does not belong to this category".to_string(),
        });
    }

    Ok((category, Some(product)))
}

/// Soft-deletes a category. Fails with `NotFound` when the category is
/// absent or already soft-deleted.
pub async fn soft_delete_category(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    category_id: Uuid,
    now_utc: DateTime<Utc>,
) -> Result<()> {
    let category = get_active_category(db, wallet_id, category_id).await?;

    let mut active: category::ActiveModel = category.into();
    active.deleted_at = Set(Some(now_utc));
    active.update(db).await?;

    Ok(())
}

/// Hard-deletes a category.
///
/// The category must be soft-deleted first, and nothing may reference it:
/// a category still used by transactions or recurring templates cannot be
/// removed without orphaning money records.
pub async fn hard_delete_category(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    category_id: Uuid,
) -> Result<()> {
    let category = get_category(db, wallet_id, category_id)
        .await?
        .ok_or(Error::NotFound { entity: "category" })?;
    if category.deleted_at.is_none() {
        return Err(Error::Conflict {
            message: "soft delete category first".to_string(),
        });
    }

    let has_transactions = Transaction::find()
        .filter(transaction::Column::CategoryId.eq(category_id))
        .one(db)
        .await?
        .is_some();
    let has_recurring = RecurringTransaction::find()
        .filter(recurring_transaction::Column::CategoryId.eq(category_id))
        .one(db)
        .await?
        .is_some();

    if has_transactions || has_recurring {
        return Err(Error::Conflict {
            message: "category is still referenced and cannot be hard deleted".to_string(),
        });
    }

    category.delete(db).await?;
    Ok(())
}
