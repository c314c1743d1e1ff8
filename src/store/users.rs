use anyhow::{Context, Result, bail};
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};

use super::Store;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Scout,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Scout => "scout",
        }
    }

    /// Unknown roles degrade to scout, the least privileged.
    pub fn parse(s: &str) -> Role {
        if s.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Scout
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// SHA-256 hex digest of a password.
pub fn hash_password(password: &str) -> String {
    Sha256::digest(password.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn map_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        role: Role::parse(&row.get::<_, String>(2)?),
    })
}

impl Store {
    /// Insert the default admin account into an empty users table.
    pub(super) fn seed_admin(&self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if count == 0 {
            self.conn
                .execute(
                    "INSERT INTO users (username, password, role) VALUES (?1, ?2, 'admin')",
                    params!["admin", hash_password("admin123")],
                )
                .context("seeding admin account")?;
            log::info!("seeded default admin account");
        }
        Ok(())
    }

    /// Check credentials; `None` means unknown user or wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, role FROM users WHERE username = ?1 AND password = ?2",
                params![username, hash_password(password)],
                map_user,
            )
            .optional()
            .context("querying credentials")
    }

    pub fn create_user(&self, username: &str, password: &str, role: Role) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            bail!("username must not be empty");
        }
        if password.is_empty() {
            bail!("password must not be empty");
        }
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
            params![username],
            |row| row.get(0),
        )?;
        if exists {
            bail!("user '{username}' already exists");
        }
        self.conn
            .execute(
                "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
                params![username, hash_password(password), role.as_str()],
            )
            .context("inserting user")?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            role,
        })
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, role FROM users ORDER BY username")?;
        let users = stmt
            .query_map([], map_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    pub fn delete_user(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .context("deleting user")?;
        Ok(())
    }

    /// Replace a password after verifying the current one. Returns
    /// `false` when the current password does not match.
    pub fn change_password(&self, id: i64, current: &str, new_password: &str) -> Result<bool> {
        let matches: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1 AND password = ?2)",
            params![id, hash_password(current)],
            |row| row.get(0),
        )?;
        if !matches {
            return Ok(false);
        }
        self.conn
            .execute(
                "UPDATE users SET password = ?1 WHERE id = ?2",
                params![hash_password(new_password), id],
            )
            .context("updating password")?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_hex_sha256() {
        let hash = hash_password("admin123");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_password("admin123"));
        assert_ne!(hash, hash_password("admin124"));
    }

    #[test]
    fn fresh_store_seeds_the_admin_account() {
        let store = Store::open_in_memory().unwrap();
        let admin = store.authenticate("admin", "admin123").unwrap().unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.role, Role::Admin);
    }

    #[test]
    fn wrong_credentials_yield_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.authenticate("admin", "nope").unwrap().is_none());
        assert!(store.authenticate("fantasma", "admin123").unwrap().is_none());
    }

    #[test]
    fn created_users_can_log_in() {
        let store = Store::open_in_memory().unwrap();
        let user = store.create_user("ojeadora", "segura1", Role::Scout).unwrap();
        assert!(user.id > 1);
        let again = store.authenticate("ojeadora", "segura1").unwrap().unwrap();
        assert_eq!(again, user);
    }

    #[test]
    fn duplicate_usernames_are_rejected() {
        let store = Store::open_in_memory().unwrap();
        store.create_user("ojeadora", "pw1", Role::Scout).unwrap();
        assert!(store.create_user("ojeadora", "pw2", Role::Scout).is_err());
        assert!(store.create_user("", "pw", Role::Scout).is_err());
    }

    #[test]
    fn listing_is_sorted_by_username() {
        let store = Store::open_in_memory().unwrap();
        store.create_user("zoe", "pw", Role::Scout).unwrap();
        store.create_user("borja", "pw", Role::Admin).unwrap();
        let names: Vec<String> = store
            .list_users()
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["admin", "borja", "zoe"]);
    }

    #[test]
    fn deleted_users_cannot_log_in() {
        let store = Store::open_in_memory().unwrap();
        let user = store.create_user("temporal", "pw", Role::Scout).unwrap();
        store.delete_user(user.id).unwrap();
        assert!(store.authenticate("temporal", "pw").unwrap().is_none());
    }

    #[test]
    fn password_change_requires_the_current_one() {
        let store = Store::open_in_memory().unwrap();
        let user = store.create_user("ojeadora", "vieja", Role::Scout).unwrap();

        assert!(!store.change_password(user.id, "mala", "nueva").unwrap());
        assert!(store.authenticate("ojeadora", "vieja").unwrap().is_some());

        assert!(store.change_password(user.id, "vieja", "nueva").unwrap());
        assert!(store.authenticate("ojeadora", "vieja").unwrap().is_none());
        assert!(store.authenticate("ojeadora", "nueva").unwrap().is_some());
    }

    #[test]
    fn unknown_role_text_degrades_to_scout() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("director"), Role::Scout);
    }
}
