//! Per-user settings: language, display currency, billing day and timezone.
//!
//! The billing day and timezone drive period resolution for every summary
//! and recurring application the user triggers, so they are validated here
//! once, at write time.

use crate::{
    entities::{UserSettings, UserSettingsModel, user_settings},
    errors::{Error, Result},
};
use chrono_tz::Tz;
use sea_orm::{Set, prelude::*};

/// Initial values for a user's settings row.
#[derive(Debug, Clone)]
pub struct SettingsInput {
    pub language: String,
    pub currency: String,
    pub billing_day: i32,
    pub timezone: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub language: Option<String>,
    pub currency: Option<String>,
    pub billing_day: Option<i32>,
    pub timezone: Option<String>,
}

/// Lowercase two-letter language code.
pub fn validate_language(language: &str) -> Result<String> {
    let language = language.trim().to_lowercase();
    if language.len() != 2 || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidConfiguration {
            message: format!("language must be a two-letter code, got '{language}'"),
        });
    }
    Ok(language)
}

/// IANA timezone name the period resolver can parse.
pub fn validate_timezone(timezone: &str) -> Result<String> {
    let timezone = timezone.trim();
    timezone
        .parse::<Tz>()
        .map_err(|_| Error::InvalidConfiguration {
            message: format!("unresolvable timezone '{timezone}'"),
        })?;
    Ok(timezone.to_string())
}

/// Billing day of month; capped at 28 so it exists in every month.
pub fn validate_billing_day(billing_day: i32) -> Result<i32> {
    if !(1..=28).contains(&billing_day) {
        return Err(Error::InvalidConfiguration {
            message: format!("billing_day must be between 1 and 28, got {billing_day}"),
        });
    }
    Ok(billing_day)
}

/// Looks up the user's settings row.
pub async fn get_settings(db: &DatabaseConnection, user_id: Uuid) -> Result<UserSettingsModel> {
    UserSettings::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "user settings",
        })
}

/// Creates the user's settings row. `Conflict` when one already exists.
pub async fn init_settings(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: SettingsInput,
) -> Result<UserSettingsModel> {
    if UserSettings::find_by_id(user_id).one(db).await?.is_some() {
        return Err(Error::Conflict {
            message: "settings already initialized for this user".to_string(),
        });
    }

    let model = user_settings::ActiveModel {
        user_id: Set(user_id),
        language: Set(validate_language(&input.language)?),
        currency: Set(crate::core::fx::normalize_currency(&input.currency)?),
        billing_day: Set(validate_billing_day(input.billing_day)?),
        timezone: Set(validate_timezone(&input.timezone)?),
    };

    Ok(model.insert(db).await?)
}

/// Applies the provided fields to the user's settings; everything is
/// validated before any write.
pub async fn update_settings(
    db: &DatabaseConnection,
    user_id: Uuid,
    update: SettingsUpdate,
) -> Result<UserSettingsModel> {
    let settings = get_settings(db, user_id).await?;
    let mut active: user_settings::ActiveModel = settings.into();

    if let Some(language) = update.language {
        active.language = Set(validate_language(&language)?);
    }
    if let Some(currency) = update.currency {
        active.currency = Set(crate::core::fx::normalize_currency(&currency)?);
    }
    if let Some(billing_day) = update.billing_day {
        active.billing_day = Set(validate_billing_day(billing_day)?);
    }
    if let Some(timezone) = update.timezone {
        active.timezone = Set(validate_timezone(&timezone)?);
    }

    Ok(active.update(db).await?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn input() -> SettingsInput {
        SettingsInput {
            language: "PL".to_string(),
            currency: "pln".to_string(),
            billing_day: 10,
            timezone: "Europe/Warsaw".to_string(),
        }
    }

    #[tokio::test]
    async fn test_init_normalizes_and_get_roundtrips() -> Result<()> {
        let db = setup_test_db().await?;
        let user_id = Uuid::new_v4();

        let created = init_settings(&db, user_id, input()).await?;
        assert_eq!(created.language, "pl");
        assert_eq!(created.currency, "PLN");

        let fetched = get_settings(&db, user_id).await?;
        assert_eq!(fetched, created);
        Ok(())
    }

    #[tokio::test]
    async fn test_init_twice_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        let user_id = Uuid::new_v4();

        init_settings(&db, user_id, input()).await?;
        let result = init_settings(&db, user_id, input()).await;
        assert!(matches!(result, Err(Error::Conflict { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_partial_update() -> Result<()> {
        let db = setup_test_db().await?;
        let user_id = Uuid::new_v4();
        init_settings(&db, user_id, input()).await?;

        let updated = update_settings(
            &db,
            user_id,
            SettingsUpdate {
                billing_day: Some(1),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.billing_day, 1);
        assert_eq!(updated.language, "pl");
        assert_eq!(updated.timezone, "Europe/Warsaw");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_values() -> Result<()> {
        let db = setup_test_db().await?;
        let user_id = Uuid::new_v4();
        init_settings(&db, user_id, input()).await?;

        let bad_day = update_settings(
            &db,
            user_id,
            SettingsUpdate {
                billing_day: Some(29),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad_day, Err(Error::InvalidConfiguration { .. })));

        let bad_tz = update_settings(
            &db,
            user_id,
            SettingsUpdate {
                timezone: Some("Nowhere/Void".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad_tz, Err(Error::InvalidConfiguration { .. })));

        let bad_lang = update_settings(
            &db,
            user_id,
            SettingsUpdate {
                language: Some("polish".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad_lang, Err(Error::InvalidConfiguration { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_settings() -> Result<()> {
        let db = setup_test_db().await?;
        let result = get_settings(&db, Uuid::new_v4()).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }
}
