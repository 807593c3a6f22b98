//! Transaction business logic.
//!
//! Transactions are immutable money records: corrections happen by inserting
//! a refund row that negates the original, or by soft deletion. All
//! validation (amount, currency, category/product ownership) runs before any
//! mutation is issued, so a failure never leaves partial state behind.

use crate::{
    core::fx::{FxBreakdown, FxTable, compute_amounts},
    core::period::{PeriodQuery, resolve_period_range_utc},
    entities::{
        TYPE_EXPENSE, Transaction, TransactionModel, UserSettingsModel, WalletModel, transaction,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Input for recording a new expense.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Category the expense is recorded under
    pub category_id: Uuid,
    /// Optional product within that category
    pub product_id: Option<Uuid>,
    /// Amount as entered by the user, in `currency`
    pub amount: Decimal,
    /// Currency the amount was entered in
    pub currency: String,
    /// When the expense occurred; the injected now when absent
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Optional narrowing filters for transaction listing.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Restrict to a resolved billing period or explicit range
    pub period: Option<PeriodQuery>,
    /// Restrict to one category
    pub category_id: Option<Uuid>,
    /// Restrict to one product
    pub product_id: Option<Uuid>,
}

/// Records an expense in the wallet, converting the entered amount into the
/// wallet's base currency.
///
/// The FX breakdown is computed exactly once, here at creation time;
/// aggregation later sums the stored `amount_base` without touching rates.
pub async fn create_transaction(
    db: &DatabaseConnection,
    fx: &FxTable,
    wallet: &WalletModel,
    input: NewTransaction,
    now_utc: DateTime<Utc>,
) -> Result<TransactionModel> {
    crate::core::category::validate_category_and_optional_product(
        db,
        wallet.id,
        input.category_id,
        input.product_id,
    )
    .await?;

    let breakdown = compute_amounts(input.amount, &input.currency, &wallet.currency, fx)?;

    let (amount_base, amount_original, currency_original, fx_rate) = match breakdown {
        FxBreakdown::Direct { amount_base } => (amount_base, None, None, None),
        FxBreakdown::Converted {
            amount_base,
            amount_original,
            currency_original,
            fx_rate,
        } => (
            amount_base,
            Some(amount_original),
            Some(currency_original),
            Some(fx_rate),
        ),
    };

    let model = transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        wallet_id: Set(wallet.id),
        category_id: Set(input.category_id),
        product_id: Set(input.product_id),
        tx_type: Set(TYPE_EXPENSE.to_string()),
        amount_base: Set(amount_base),
        currency_base: Set(wallet.currency.clone()),
        amount_original: Set(amount_original),
        currency_original: Set(currency_original),
        fx_rate: Set(fx_rate),
        occurred_at: Set(input.occurred_at.unwrap_or(now_utc)),
        created_at: Set(now_utc),
        refund_of_transaction_id: Set(None),
        deleted_at: Set(None),
    };

    Ok(model.insert(db).await?)
}

/// Lists visible (non-deleted) transactions in the wallet, newest first.
///
/// A period filter resolves through the user's billing settings; category
/// and product filters are validated to exist in the wallet.
pub async fn list_transactions(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    settings: &UserSettingsModel,
    filter: &TransactionFilter,
    now_utc: DateTime<Utc>,
) -> Result<Vec<TransactionModel>> {
    let mut query = Transaction::find()
        .filter(transaction::Column::WalletId.eq(wallet_id))
        .filter(transaction::Column::DeletedAt.is_null());

    if let Some(period_query) = &filter.period {
        let range = resolve_period_range_utc(
            settings.billing_day,
            &settings.timezone,
            period_query,
            now_utc,
        )?;
        query = query
            .filter(transaction::Column::OccurredAt.gte(range.start_utc))
            .filter(transaction::Column::OccurredAt.lt(range.end_utc));
    }

    if let Some(category_id) = filter.category_id {
        crate::core::category::get_active_category(db, wallet_id, category_id).await?;
        query = query.filter(transaction::Column::CategoryId.eq(category_id));
    }

    if let Some(product_id) = filter.product_id {
        crate::core::product::get_active_product(db, wallet_id, product_id).await?;
        query = query.filter(transaction::Column::ProductId.eq(product_id));
    }

    query
        .order_by_desc(transaction::Column::OccurredAt)
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up a visible transaction in the wallet scope.
async fn get_visible_transaction(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    transaction_id: Uuid,
) -> Result<TransactionModel> {
    let tx = Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::WalletId.eq(wallet_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "transaction",
        })?;
    if tx.deleted_at.is_some() {
        return Err(Error::NotFound {
            entity: "transaction",
        });
    }
    Ok(tx)
}

/// Whether any refund row points at the given transaction.
async fn has_refund(db: &DatabaseConnection, transaction_id: Uuid) -> Result<bool> {
    Ok(Transaction::find()
        .filter(transaction::Column::RefundOfTransactionId.eq(transaction_id))
        .one(db)
        .await?
        .is_some())
}

/// Refunds a transaction by inserting a negated copy pointing back at it.
///
/// Refund chains are depth-1 only: a refund cannot be refunded, and a
/// transaction can be refunded at most once. The FX fields are carried over
/// with negated amounts; the rate is never re-derived at refund time.
pub async fn refund_transaction(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    transaction_id: Uuid,
    now_utc: DateTime<Utc>,
) -> Result<TransactionModel> {
    let original = get_visible_transaction(db, wallet_id, transaction_id).await?;

    if original.refund_of_transaction_id.is_some() {
        return Err(Error::Conflict {
            message: "cannot refund a refund transaction".to_string(),
        });
    }
    if has_refund(db, original.id).await? {
        return Err(Error::Conflict {
            message: "transaction already refunded".to_string(),
        });
    }

    let model = transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        wallet_id: Set(wallet_id),
        category_id: Set(original.category_id),
        product_id: Set(original.product_id),
        tx_type: Set(original.tx_type.clone()),
        amount_base: Set(-original.amount_base),
        currency_base: Set(original.currency_base.clone()),
        amount_original: Set(original.amount_original.map(|a| -a)),
        currency_original: Set(original.currency_original.clone()),
        fx_rate: Set(original.fx_rate),
        occurred_at: Set(now_utc),
        created_at: Set(now_utc),
        refund_of_transaction_id: Set(Some(original.id)),
        deleted_at: Set(None),
    };

    Ok(model.insert(db).await?)
}

/// Soft-deletes a transaction, excluding it from all future aggregation.
///
/// A transaction with a refund pointing at it cannot be deleted; delete the
/// refund first or the books would show an uncompensated reversal.
pub async fn soft_delete_transaction(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    transaction_id: Uuid,
    now_utc: DateTime<Utc>,
) -> Result<()> {
    let tx = get_visible_transaction(db, wallet_id, transaction_id).await?;

    if has_refund(db, tx.id).await? {
        return Err(Error::Conflict {
            message: "cannot delete transaction with refunds".to_string(),
        });
    }

    let mut active: transaction::ActiveModel = tx.into();
    active.deleted_at = Set(Some(now_utc));
    active.update(db).await?;

    Ok(())
}
