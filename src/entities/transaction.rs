//! Transaction entity - an immutable money record in a wallet.
//!
//! Amounts are stored in the wallet's base currency (`amount_base`). When the
//! user entered a different currency, the original amount, its currency, and
//! the applied rate are stored alongside; those three columns are set
//! together or all null. Transactions are never edited in place: corrections
//! happen via refund rows (`refund_of_transaction_id`) or soft deletion.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction type produced by all flows in scope.
pub const TYPE_EXPENSE: &str = "expense";

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Wallet this transaction belongs to
    pub wallet_id: Uuid,
    /// Category the spend is recorded under
    pub category_id: Uuid,
    /// Optional product within the category
    pub product_id: Option<Uuid>,
    /// Transaction type; `"expense"` is the only value produced in scope
    pub tx_type: String,
    /// Amount in the wallet's base currency, fixed-point 2 decimals
    pub amount_base: Decimal,
    /// The wallet's base currency code at recording time
    pub currency_base: String,
    /// Amount as entered by the user, when a foreign currency was used
    pub amount_original: Option<Decimal>,
    /// Currency the user entered, when different from the base
    pub currency_original: Option<String>,
    /// Rate applied to derive `amount_base` from `amount_original`
    pub fx_rate: Option<Decimal>,
    /// UTC instant the spend occurred at
    pub occurred_at: DateTimeUtc,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// Set when this transaction is a refund of another one
    pub refund_of_transaction_id: Option<Uuid>,
    /// Soft delete marker - deleted transactions are excluded from all sums
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one wallet
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id"
    )]
    Wallet,
    /// Each transaction is recorded under one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// A transaction may reference a product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// A refund points back at the transaction it reverses
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::RefundOfTransactionId",
        to = "Column::Id"
    )]
    RefundOf,
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
