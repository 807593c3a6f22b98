//! Recurring transaction templates and their periodic application.
//!
//! A template describes an expense that recurs once per billing period.
//! Application is idempotent per period: the `last_applied_at` stamp is
//! compared against the current period start, and the same predicate is
//! repeated in the UPDATE that writes the stamp, so two concurrent callers
//! cannot both materialize the same template.

use crate::{
    core::period::{PeriodQuery, resolve_period_range_utc},
    entities::{
        RecurringTransaction, RecurringTransactionModel, TYPE_EXPENSE, TransactionModel,
        UserSettingsModel, WalletModel, recurring_transaction, transaction,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Input for creating or replacing a recurring template.
#[derive(Debug, Clone)]
pub struct RecurringInput {
    /// Category the materialized expense is recorded under
    pub category_id: Uuid,
    /// Optional product within that category
    pub product_id: Option<Uuid>,
    /// Amount per period, in the wallet's base currency
    pub amount: Decimal,
    /// Currency of the amount; must match the wallet currency
    pub currency: String,
    /// Free-form label shown in listings
    pub description: Option<String>,
}

/// Validates template input against the wallet it belongs to.
///
/// Recurring amounts are stored verbatim and copied without FX at
/// application time, so the template currency must already be the wallet's
/// base currency.
async fn validate_input(
    db: &DatabaseConnection,
    wallet: &WalletModel,
    input: &RecurringInput,
) -> Result<String> {
    if input.amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: input.amount,
        });
    }

    let currency = crate::core::fx::normalize_currency(&input.currency)?;
    if currency != wallet.currency {
        return Err(Error::InvalidCurrency {
            message: format!(
                "recurring amounts must be in the wallet currency {}, got {currency}",
                wallet.currency
            ),
        });
    }

    crate::core::category::validate_category_and_optional_product(
        db,
        wallet.id,
        input.category_id,
        input.product_id,
    )
    .await?;

    Ok(currency)
}

/// Creates an active recurring template in the wallet.
pub async fn create_recurring(
    db: &DatabaseConnection,
    wallet: &WalletModel,
    input: RecurringInput,
    now_utc: DateTime<Utc>,
) -> Result<RecurringTransactionModel> {
    let currency = validate_input(db, wallet, &input).await?;

    let model = recurring_transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        wallet_id: Set(wallet.id),
        category_id: Set(input.category_id),
        product_id: Set(input.product_id),
        amount_base: Set(input.amount),
        currency_base: Set(currency),
        description: Set(input.description),
        active: Set(true),
        created_at: Set(now_utc),
        updated_at: Set(now_utc),
        last_applied_at: Set(None),
    };

    Ok(model.insert(db).await?)
}

/// Replaces the template's definition with new input.
///
/// The `last_applied_at` stamp is preserved: editing a template does not
/// make it fire again within the same period.
pub async fn update_recurring(
    db: &DatabaseConnection,
    wallet: &WalletModel,
    recurring_id: Uuid,
    input: RecurringInput,
    now_utc: DateTime<Utc>,
) -> Result<RecurringTransactionModel> {
    let template = get_recurring(db, wallet.id, recurring_id).await?;
    let currency = validate_input(db, wallet, &input).await?;

    let mut active: recurring_transaction::ActiveModel = template.into();
    active.category_id = Set(input.category_id);
    active.product_id = Set(input.product_id);
    active.amount_base = Set(input.amount);
    active.currency_base = Set(currency);
    active.description = Set(input.description);
    active.updated_at = Set(now_utc);

    Ok(active.update(db).await?)
}

/// Lists the wallet's templates, optionally filtered by active state,
/// ordered by creation time.
pub async fn list_recurring(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    active: Option<bool>,
) -> Result<Vec<RecurringTransactionModel>> {
    let mut query = RecurringTransaction::find()
        .filter(recurring_transaction::Column::WalletId.eq(wallet_id));
    if let Some(active) = active {
        query = query.filter(recurring_transaction::Column::Active.eq(active));
    }

    query
        .order_by_asc(recurring_transaction::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up a template in the wallet scope.
pub async fn get_recurring(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    recurring_id: Uuid,
) -> Result<RecurringTransactionModel> {
    RecurringTransaction::find_by_id(recurring_id)
        .filter(recurring_transaction::Column::WalletId.eq(wallet_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "recurring transaction",
        })
}

/// Re-activates a deactivated template. `Conflict` when already active.
pub async fn activate_recurring(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    recurring_id: Uuid,
    now_utc: DateTime<Utc>,
) -> Result<RecurringTransactionModel> {
    let template = get_recurring(db, wallet_id, recurring_id).await?;
    if template.active {
        return Err(Error::Conflict {
            message: "recurring transaction is already active".to_string(),
        });
    }

    let mut active: recurring_transaction::ActiveModel = template.into();
    active.active = Set(true);
    active.updated_at = Set(now_utc);
    Ok(active.update(db).await?)
}

/// Deactivates a template so it is skipped by application.
/// `NotFound` when the template is absent or already inactive.
pub async fn deactivate_recurring(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    recurring_id: Uuid,
    now_utc: DateTime<Utc>,
) -> Result<RecurringTransactionModel> {
    let template = get_recurring(db, wallet_id, recurring_id).await?;
    if !template.active {
        return Err(Error::NotFound {
            entity: "recurring transaction",
        });
    }

    let mut active: recurring_transaction::ActiveModel = template.into();
    active.active = Set(false);
    active.updated_at = Set(now_utc);
    Ok(active.update(db).await?)
}

/// Condition shared by the due-template selection and the stamping UPDATE:
/// the template has not yet fired in the period starting at `period_start`.
fn not_yet_applied(period_start: DateTime<Utc>) -> Condition {
    Condition::any()
        .add(recurring_transaction::Column::LastAppliedAt.is_null())
        .add(recurring_transaction::Column::LastAppliedAt.lt(period_start))
}

/// Materializes every due active template into an expense transaction,
/// at most once per billing period.
///
/// The period is resolved from the invoking user's settings. All writes run
/// inside one database transaction; each template is stamped with a
/// conditional UPDATE that repeats the idempotency predicate, so a template
/// another caller already stamped is skipped rather than applied twice.
/// Amounts are copied verbatim with no FX involvement.
pub async fn apply_recurring(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    settings: &UserSettingsModel,
    now_utc: DateTime<Utc>,
) -> Result<Vec<TransactionModel>> {
    let range = resolve_period_range_utc(
        settings.billing_day,
        &settings.timezone,
        &PeriodQuery::Current,
        now_utc,
    )?;

    let due = RecurringTransaction::find()
        .filter(recurring_transaction::Column::WalletId.eq(wallet_id))
        .filter(recurring_transaction::Column::Active.eq(true))
        .filter(not_yet_applied(range.start_utc))
        .order_by_asc(recurring_transaction::Column::CreatedAt)
        .all(db)
        .await?;

    let txn = db.begin().await?;
    let mut created = Vec::with_capacity(due.len());

    for template in due {
        let stamped = RecurringTransaction::update_many()
            .col_expr(
                recurring_transaction::Column::LastAppliedAt,
                Expr::value(Some(now_utc)),
            )
            .col_expr(recurring_transaction::Column::UpdatedAt, Expr::value(now_utc))
            .filter(recurring_transaction::Column::Id.eq(template.id))
            .filter(recurring_transaction::Column::Active.eq(true))
            .filter(not_yet_applied(range.start_utc))
            .exec(&txn)
            .await?;
        if stamped.rows_affected == 0 {
            // A concurrent caller stamped this template first.
            continue;
        }

        let tx = transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_id: Set(wallet_id),
            category_id: Set(template.category_id),
            product_id: Set(template.product_id),
            tx_type: Set(TYPE_EXPENSE.to_string()),
            amount_base: Set(template.amount_base),
            currency_base: Set(template.currency_base.clone()),
            amount_original: Set(None),
            currency_original: Set(None),
            fx_rate: Set(None),
            occurred_at: Set(now_utc),
            created_at: Set(now_utc),
            refund_of_transaction_id: Set(None),
            deleted_at: Set(None),
        };
        created.push(tx.insert(&txn).await?);
    }

    txn.commit().await?;
    info!(wallet_id = %wallet_id, applied = created.len(), "applied recurring transactions");
    Ok(created)
}
