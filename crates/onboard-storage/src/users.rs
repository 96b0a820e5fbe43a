//! SQLite user store.
//!
//! Upserts happen when the bot is installed or a user toggles pair-up
//! matching; everything else is read-only queries from the notifiers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

use onboard_core::error::{OnboardError, Result};
use onboard_core::traits::UserDirectory;
use onboard_core::types::{UserRecord, UserRole};

/// SQLite-backed user directory.
pub struct UserStore {
    conn: Mutex<Connection>,
}

impl UserStore {
    /// Open or create the user database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| OnboardError::Storage(format!("DB open: {e}")))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// In-memory store, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| OnboardError::Storage(format!("DB open: {e}")))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                aad_object_id TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                user_principal_name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                conversation_id TEXT NOT NULL,
                service_url TEXT NOT NULL,
                user_role INTEGER NOT NULL DEFAULT 0,
                bot_installed_on TEXT NOT NULL,
                opted_in INTEGER NOT NULL DEFAULT 0,
                profile_image_url TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_users_role ON users(user_role);",
        )
        .map_err(|e| OnboardError::Storage(format!("Migration: {e}")))?;
        Ok(())
    }

    /// Store or update a user. The identifiers that proactive delivery needs
    /// are mandatory.
    pub fn upsert_user(&self, user: &UserRecord) -> Result<()> {
        if user.aad_object_id.trim().is_empty()
            || user.conversation_id.trim().is_empty()
            || user.service_url.trim().is_empty()
        {
            return Err(OnboardError::Storage(
                "User record requires aad_object_id, conversation_id and service_url".into(),
            ));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO users
             (aad_object_id, name, user_principal_name, email, conversation_id,
              service_url, user_role, bot_installed_on, opted_in, profile_image_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                user.aad_object_id,
                user.name,
                user.user_principal_name,
                user.email,
                user.conversation_id,
                user.service_url,
                user.role.as_i64(),
                user.bot_installed_on.to_rfc3339(),
                user.opted_in as i64,
                user.profile_image_url,
            ],
        )
        .map_err(|e| OnboardError::Storage(format!("Upsert user: {e}")))?;
        tracing::debug!("💾 Stored user {}", user.aad_object_id);
        Ok(())
    }

    /// Fetch one user by AAD object id.
    pub fn get_user(&self, aad_object_id: &str) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT * FROM users WHERE aad_object_id = ?1")
            .map_err(|e| OnboardError::Storage(format!("Prepare: {e}")))?;
        let mut rows = stmt
            .query_map([aad_object_id], row_to_user)
            .map_err(|e| OnboardError::Storage(format!("Query: {e}")))?;
        match rows.next() {
            Some(row) => row
                .map(Some)
                .map_err(|e| OnboardError::Storage(format!("Row: {e}"))),
            None => Ok(None),
        }
    }

    /// All users with the given role.
    pub fn list_by_role(&self, role: UserRole) -> Result<Vec<UserRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT * FROM users WHERE user_role = ?1 ORDER BY aad_object_id")
            .map_err(|e| OnboardError::Storage(format!("Prepare: {e}")))?;
        let rows = stmt
            .query_map([role.as_i64()], row_to_user)
            .map_err(|e| OnboardError::Storage(format!("Query: {e}")))?;
        collect_users(rows)
    }

    /// All users who opted in to pair-up matching.
    pub fn list_opted_in(&self) -> Result<Vec<UserRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT * FROM users WHERE opted_in = 1 ORDER BY aad_object_id")
            .map_err(|e| OnboardError::Storage(format!("Prepare: {e}")))?;
        let rows = stmt
            .query_map([], row_to_user)
            .map_err(|e| OnboardError::Storage(format!("Query: {e}")))?;
        collect_users(rows)
    }

    /// Toggle pair-up matching for a user (the "pause all matches" command).
    pub fn set_opted_in(&self, aad_object_id: &str, opted_in: bool) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE users SET opted_in = ?2 WHERE aad_object_id = ?1",
                rusqlite::params![aad_object_id, opted_in as i64],
            )
            .map_err(|e| OnboardError::Storage(format!("Update opt-in: {e}")))?;
        Ok(changed > 0)
    }

    /// Remove a user (bot uninstalled).
    pub fn delete_user(&self, aad_object_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "DELETE FROM users WHERE aad_object_id = ?1",
                [aad_object_id],
            )
            .map_err(|e| OnboardError::Storage(format!("Delete user: {e}")))?;
        Ok(changed > 0)
    }

    pub fn user_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(|e| OnboardError::Storage(format!("Count: {e}")))
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRecord> {
    let role_raw: i64 = row.get("user_role")?;
    let installed_raw: String = row.get("bot_installed_on")?;
    Ok(UserRecord {
        aad_object_id: row.get("aad_object_id")?,
        name: row.get("name")?,
        user_principal_name: row.get("user_principal_name")?,
        email: row.get("email")?,
        conversation_id: row.get("conversation_id")?,
        service_url: row.get("service_url")?,
        role: UserRole::from_i64(role_raw).unwrap_or(UserRole::NewHire),
        bot_installed_on: DateTime::parse_from_rfc3339(&installed_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        opted_in: row.get::<_, i64>("opted_in")? != 0,
        profile_image_url: row.get("profile_image_url")?,
    })
}

fn collect_users(
    rows: impl Iterator<Item = rusqlite::Result<UserRecord>>,
) -> Result<Vec<UserRecord>> {
    let mut users = Vec::new();
    for row in rows {
        users.push(row.map_err(|e| OnboardError::Storage(format!("Row: {e}")))?);
    }
    Ok(users)
}

#[async_trait]
impl UserDirectory for UserStore {
    async fn users_by_role(&self, role: UserRole) -> Result<Vec<UserRecord>> {
        self.list_by_role(role)
    }

    async fn users_opted_for_pair_up(&self) -> Result<Vec<UserRecord>> {
        self.list_opted_in()
    }
}
