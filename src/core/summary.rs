//! Spending aggregation over billing periods.
//!
//! All views share the same scope: one wallet, expense rows only, soft
//! deletes excluded, `occurred_at` inside the resolved half-open period.
//! Sums are taken over the stored base amounts; FX never re-enters here.
//! Refunds are ordinary negative rows, so they subtract naturally.

use crate::{
    core::period::{PeriodQuery, PeriodRange, last_n_period_ranges_utc, resolve_period_range_utc},
    entities::{
        Category, CategoryModel, Product, ProductImportance, ProductModel, TYPE_EXPENSE,
        Transaction, TransactionModel, UserSettingsModel, WalletModel, category, product,
        transaction,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, prelude::*};
use std::collections::HashMap;

/// One product row inside a category breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithSum {
    pub product: ProductModel,
    pub total: Decimal,
}

/// One category with its per-product breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWithSum {
    pub category: CategoryModel,
    /// All expenses in the category, with and without a product
    pub total: Decimal,
    /// Expenses recorded directly on the category, no product attached
    pub without_product: Decimal,
    pub products: Vec<ProductWithSum>,
}

/// Full category/product breakdown for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoriesProductsSummary {
    pub range: PeriodRange,
    pub currency: String,
    pub total: Decimal,
    pub categories: Vec<CategoryWithSum>,
}

/// Expense totals bucketed by the product importance rating.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceSummary {
    pub range: PeriodRange,
    pub currency: String,
    pub necessary: Decimal,
    pub important: Decimal,
    pub unnecessary: Decimal,
    /// Expenses with no product attached
    pub unassigned: Decimal,
    pub total: Decimal,
}

/// Expense total of one past billing period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotal {
    pub range: PeriodRange,
    pub total: Decimal,
}

/// Loads the transactions in scope for a resolved period.
async fn expenses_in_range(
    db: &DatabaseConnection,
    wallet_id: Uuid,
    range: &PeriodRange,
) -> Result<Vec<TransactionModel>> {
    Transaction::find()
        .filter(transaction::Column::WalletId.eq(wallet_id))
        .filter(transaction::Column::TxType.eq(TYPE_EXPENSE))
        .filter(transaction::Column::DeletedAt.is_null())
        .filter(transaction::Column::OccurredAt.gte(range.start_utc))
        .filter(transaction::Column::OccurredAt.lt(range.end_utc))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Breaks period spending down by category and product.
///
/// With `include_empty` every live category and product of the wallet is
/// listed with a zero sum, plus any soft-deleted ones that still carry
/// in-period spending. Without it only rows with a nonzero sum appear, and a
/// period with no transactions at all short-circuits to an empty list.
/// Categories are ordered by name, products by creation time within their
/// category.
pub async fn summary_categories_products(
    db: &DatabaseConnection,
    wallet: &WalletModel,
    settings: &UserSettingsModel,
    query: &PeriodQuery,
    include_empty: bool,
    now_utc: DateTime<Utc>,
) -> Result<CategoriesProductsSummary> {
    let range =
        resolve_period_range_utc(settings.billing_day, &settings.timezone, query, now_utc)?;
    let expenses = expenses_in_range(db, wallet.id, &range).await?;

    if expenses.is_empty() && !include_empty {
        return Ok(CategoriesProductsSummary {
            range,
            currency: wallet.currency.clone(),
            total: Decimal::ZERO,
            categories: Vec::new(),
        });
    }

    let mut category_sums: HashMap<Uuid, Decimal> = HashMap::new();
    let mut product_sums: HashMap<Uuid, Decimal> = HashMap::new();
    let mut no_product_sums: HashMap<Uuid, Decimal> = HashMap::new();
    let mut total = Decimal::ZERO;

    for tx in &expenses {
        total += tx.amount_base;
        *category_sums.entry(tx.category_id).or_default() += tx.amount_base;
        match tx.product_id {
            Some(product_id) => *product_sums.entry(product_id).or_default() += tx.amount_base,
            None => *no_product_sums.entry(tx.category_id).or_default() += tx.amount_base,
        }
    }

    // Soft-deleted categories and products stay in the breakdown as long as
    // in-period transactions reference them.
    let categories: Vec<CategoryModel> = Category::find()
        .filter(category::Column::WalletId.eq(wallet.id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .filter(|c| {
            let nonzero = category_sums.get(&c.id).is_some_and(|s| !s.is_zero());
            if include_empty {
                c.deleted_at.is_none() || nonzero
            } else {
                nonzero
            }
        })
        .collect();

    let products: Vec<ProductModel> = Product::find()
        .filter(product::Column::WalletId.eq(wallet.id))
        .order_by_asc(product::Column::CreatedAt)
        .all(db)
        .await?;

    let categories = categories
        .into_iter()
        .map(|cat| {
            let rows: Vec<ProductWithSum> = products
                .iter()
                .filter(|p| p.category_id == cat.id)
                .filter(|p| {
                    let nonzero = product_sums.get(&p.id).is_some_and(|s| !s.is_zero());
                    if include_empty {
                        p.deleted_at.is_none() || nonzero
                    } else {
                        nonzero
                    }
                })
                .map(|p| ProductWithSum {
                    product: p.clone(),
                    total: product_sums.get(&p.id).copied().unwrap_or_default(),
                })
                .collect();

            CategoryWithSum {
                total: category_sums.get(&cat.id).copied().unwrap_or_default(),
                without_product: no_product_sums.get(&cat.id).copied().unwrap_or_default(),
                products: rows,
                category: cat,
            }
        })
        .collect();

    Ok(CategoriesProductsSummary {
        range,
        currency: wallet.currency.clone(),
        total,
        categories,
    })
}

/// Buckets period spending by the importance rating of the product each
/// transaction was recorded against.
///
/// Transactions without a product land in the `unassigned` bucket. A
/// soft-deleted product still contributes its rating; historic spending does
/// not migrate buckets when the catalog changes.
pub async fn summary_by_importance(
    db: &DatabaseConnection,
    wallet: &WalletModel,
    settings: &UserSettingsModel,
    query: &PeriodQuery,
    now_utc: DateTime<Utc>,
) -> Result<ImportanceSummary> {
    let range =
        resolve_period_range_utc(settings.billing_day, &settings.timezone, query, now_utc)?;
    let expenses = expenses_in_range(db, wallet.id, &range).await?;

    let importance_by_product: HashMap<Uuid, ProductImportance> = Product::find()
        .filter(product::Column::WalletId.eq(wallet.id))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.importance))
        .collect();

    let mut summary = ImportanceSummary {
        range,
        currency: wallet.currency.clone(),
        necessary: Decimal::ZERO,
        important: Decimal::ZERO,
        unnecessary: Decimal::ZERO,
        unassigned: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    for tx in &expenses {
        summary.total += tx.amount_base;
        let bucket = match tx.product_id.and_then(|id| importance_by_product.get(&id)) {
            Some(ProductImportance::Necessary) => &mut summary.necessary,
            Some(ProductImportance::Important) => &mut summary.important,
            Some(ProductImportance::Unnecessary) => &mut summary.unnecessary,
            None => &mut summary.unassigned,
        };
        *bucket += tx.amount_base;
    }

    Ok(summary)
}

/// Expense totals of the last `periods` billing periods, newest first.
///
/// `periods` must be between 2 and 8.
pub async fn history_last_periods(
    db: &DatabaseConnection,
    wallet: &WalletModel,
    settings: &UserSettingsModel,
    periods: usize,
    now_utc: DateTime<Utc>,
) -> Result<Vec<PeriodTotal>> {
    if !(2..=8).contains(&periods) {
        return Err(Error::InvalidConfiguration {
            message: format!("history spans 2 to 8 periods, got {periods}"),
        });
    }

    let ranges =
        last_n_period_ranges_utc(settings.billing_day, &settings.timezone, periods, now_utc)?;

    // The ranges are contiguous; one query covers them all.
    let span = PeriodRange {
        start_utc: ranges[ranges.len() - 1].start_utc,
        end_utc: ranges[0].end_utc,
    };
    let expenses = expenses_in_range(db, wallet.id, &span).await?;

    Ok(ranges
        .into_iter()
        .map(|range| {
            let total = expenses
                .iter()
                .filter(|tx| tx.occurred_at >= range.start_utc && tx.occurred_at < range.end_utc)
                .map(|tx| tx.amount_base)
                .sum();
            PeriodTotal { range, total }
        })
        .collect())
}
