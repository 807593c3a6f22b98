//! Category entity - spending dimension for grouping transactions.
//!
//! Names are unique within a wallet. Categories are soft-deleted via
//! `deleted_at` so historic transactions keep a valid reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Wallet this category belongs to
    pub wallet_id: Uuid,
    /// Human-readable name, unique per wallet
    pub name: String,
    /// Optional display color
    pub color: Option<String>,
    /// Optional display icon
    pub icon: Option<String>,
    /// When the category was created
    pub created_at: DateTimeUtc,
    /// Soft delete marker - a deleted category is hidden but keeps its data
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category belongs to one wallet
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id"
    )]
    Wallet,
    /// One category has many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
    /// One category has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
