//! Wallet entity - the aggregation root for all money records.
//!
//! Every category, product, transaction, and recurring template is scoped by
//! `wallet_id`; the wallet's `currency` is the base currency all sums are
//! expressed in and is fixed at creation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wallet database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    /// Unique identifier for the wallet
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-readable name of the wallet
    pub name: String,
    /// Base settlement currency (3-letter uppercase code), fixed at creation
    pub currency: String,
    /// When the wallet was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Wallet and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One wallet has many categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
    /// One wallet has many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
    /// One wallet has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One wallet has many recurring templates
    #[sea_orm(has_many = "super::recurring_transaction::Entity")]
    RecurringTransactions,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
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

impl Related<super::recurring_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
