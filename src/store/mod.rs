/// Persistence layer: a single SQLite database holding user accounts
/// and scouting reports. The player table never touches the database;
/// it always comes from the export files.

pub mod reports;
pub mod users;

pub use reports::StoredReport;
pub use users::{Role, User};

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'scout',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS scouting_reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_date TEXT NOT NULL,
    match_date TEXT NOT NULL,
    local_team TEXT NOT NULL,
    visitor_team TEXT NOT NULL,
    result TEXT,
    player_name TEXT NOT NULL,
    player_club TEXT NOT NULL,
    position TEXT,
    overall_rating INTEGER NOT NULL,
    is_starter INTEGER NOT NULL,
    minutes_played INTEGER NOT NULL,
    technical_aspects TEXT,
    tactical_aspects TEXT,
    physical_aspects TEXT,
    psychological_aspects TEXT,
    observations TEXT,
    photo_path TEXT,
    created_by INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file and apply the schema. A fresh
    /// database gets the default admin account.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening database {}", path.display()))?;
        let store = Store { conn };
        store.init()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let store = Store {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .context("applying database schema")?;
        self.seed_admin()
    }
}
