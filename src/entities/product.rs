//! Product entity - an optional refinement of a category.
//!
//! A product always belongs to exactly one category of the same wallet and
//! carries an [`ProductImportance`] rating used by the importance summary.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How essential purchases of this product are, used for the importance
/// summary buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ProductImportance {
    /// Essential spending (rent, groceries)
    #[sea_orm(string_value = "necessary")]
    Necessary,
    /// Worthwhile but deferrable spending
    #[sea_orm(string_value = "important")]
    Important,
    /// Discretionary spending
    #[sea_orm(string_value = "unnecessary")]
    Unnecessary,
}

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Wallet this product belongs to
    pub wallet_id: Uuid,
    /// Category this product refines; must belong to the same wallet
    pub category_id: Uuid,
    /// Human-readable name of the product
    pub name: String,
    /// Importance rating used by the importance summary
    pub importance: ProductImportance,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// Soft delete marker
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one wallet
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id"
    )]
    Wallet,
    /// Each product belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One product has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
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

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
