//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row};
use tracing::info;

use crate::models::preferences::{
    DEFAULT_COINS, DEFAULT_INVESTOR_TYPE, PreferencesDocument, PreferencesInput,
};
use crate::models::user::{User, UserProfile};

/// True when the error is a Postgres unique-constraint violation (23505)
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| match e {
            sqlx::Error::Database(db) => db.code().map(|code| code == "23505"),
            _ => None,
        })
        .unwrap_or(false)
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a freshly hashed password
    pub async fn create(&self, email: &str, name: &str, password: &str) -> Result<User> {
        info!("Creating new user: {}", email);

        // Hash the password
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        let row = sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, preferences, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        let user = User {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            password_hash: row.get("password_hash"),
            preferences: row.get("preferences"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        };

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, preferences, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let user = User {
                    id: row.get("id"),
                    email: row.get("email"),
                    name: row.get("name"),
                    password_hash: row.get("password_hash"),
                    preferences: row.get("preferences"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                };
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Find a user by ID, excluding the password hash
    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, preferences, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let profile = UserProfile {
                    id: row.get("id"),
                    email: row.get("email"),
                    name: row.get("name"),
                    preferences: row.get("preferences"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                };
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    /// Verify a user's password
    pub async fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Get the raw stored preferences blob, if any
    pub async fn get_preferences(&self, user_id: i64) -> Result<Option<serde_json::Value>> {
        let row = sqlx::query(
            r#"
            SELECT preferences
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|row| row.get("preferences")))
    }

    /// Replace the stored preferences document
    ///
    /// Returns `None` when the user no longer exists.
    pub async fn update_preferences(
        &self,
        user_id: i64,
        document: &PreferencesDocument,
    ) -> Result<Option<PreferencesDocument>> {
        let value = serde_json::to_value(document)?;

        let row = sqlx::query(
            r#"
            UPDATE users
            SET preferences = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING preferences
            "#,
        )
        .bind(user_id)
        .bind(&value)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let stored: serde_json::Value = row.get("preferences");
                Ok(Some(serde_json::from_value(stored)?))
            }
            None => Ok(None),
        }
    }

    /// Coins from the stored preferences, re-validated defensively
    ///
    /// Falls back to the default coin set when preferences are missing or
    /// fail validation (the blob can be edited outside the API).
    pub async fn get_user_coins(&self, user_id: i64) -> Result<Vec<String>> {
        let (coins, _) = self.dashboard_preferences(user_id).await?;
        Ok(coins)
    }

    /// Coins and investor archetype used by the dashboard endpoints,
    /// with defaults when preferences are missing or invalid
    pub async fn dashboard_preferences(&self, user_id: i64) -> Result<(Vec<String>, String)> {
        if let Some(value) = self.get_preferences(user_id).await? {
            if let Ok(document) = serde_json::from_value::<PreferencesDocument>(value) {
                let input = PreferencesInput::from(&document);
                if let Ok(valid) = input.validate() {
                    return Ok((valid.coins, valid.investor_type));
                }
            }
        }

        Ok((
            DEFAULT_COINS.iter().map(|c| c.to_string()).collect(),
            DEFAULT_INVESTOR_TYPE.to_string(),
        ))
    }
}
