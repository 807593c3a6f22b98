//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables
//! are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! struct definitions without hand-written SQL.

use crate::entities::{Category, Product, RecurringTransaction, Transaction, UserSettings, Wallet};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default
/// `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/budgetbook.sqlite".to_string())
}

/// Establishes a connection to the database using the `DATABASE_URL`
/// environment variable, falling back to a local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Uses `SeaORM`'s schema generation so the database schema matches the
/// `DeriveEntityModel` structs exactly.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let wallet_table = schema.create_table_from_entity(Wallet);
    let user_settings_table = schema.create_table_from_entity(UserSettings);
    let category_table = schema.create_table_from_entity(Category);
    let product_table = schema.create_table_from_entity(Product);
    let transaction_table = schema.create_table_from_entity(Transaction);
    let recurring_table = schema.create_table_from_entity(RecurringTransaction);

    db.execute(builder.build(&wallet_table)).await?;
    db.execute(builder.build(&user_settings_table)).await?;
    db.execute(builder.build(&category_table)).await?;
    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;
    db.execute(builder.build(&recurring_table)).await?;

    Ok(())
}
