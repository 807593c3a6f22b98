//! User settings entity - per-user billing and localization preferences.
//!
//! Owned 1:1 by a user (the primary key is the user's id). `billing_day` is
//! constrained to 1-28 so the billing anchor exists in every month, and
//! `timezone` holds a valid IANA zone name.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User settings database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_settings")]
pub struct Model {
    /// Id of the owning user
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    /// Preferred UI language (2-letter lowercase code)
    pub language: String,
    /// Preferred display currency (3-letter uppercase code)
    pub currency: String,
    /// Day-of-month the billing period starts on (1-28)
    pub billing_day: i32,
    /// IANA timezone name used for period boundaries (e.g. "Europe/Warsaw")
    pub timezone: String,
}

/// Defines relationships between UserSettings and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
