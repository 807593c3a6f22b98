//! Recurring transaction entity - a standing expense template.
//!
//! A template materializes one expense transaction per billing period while
//! `active` is true. `last_applied_at` records the instant of the most recent
//! materialization and gates re-application within the same period. Amounts
//! are always in the wallet's base currency; no FX is permitted on templates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recurring transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_transactions")]
pub struct Model {
    /// Unique identifier for the template
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Wallet this template belongs to
    pub wallet_id: Uuid,
    /// Category the materialized expense is recorded under
    pub category_id: Uuid,
    /// Optional product within the category
    pub product_id: Option<Uuid>,
    /// Expense amount in the wallet's base currency
    pub amount_base: Decimal,
    /// Must equal the wallet currency (validated at create/update)
    pub currency_base: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Whether the template is currently materializing transactions
    pub active: bool,
    /// When the template was created
    pub created_at: DateTimeUtc,
    /// Last modification instant
    pub updated_at: DateTimeUtc,
    /// Instant of the most recent materialization, None if never applied
    pub last_applied_at: Option<DateTimeUtc>,
}

/// Defines relationships between RecurringTransaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each template belongs to one wallet
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id"
    )]
    Wallet,
    /// Each template is recorded under one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// A template may reference a product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
