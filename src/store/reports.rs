use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, params};

use crate::report::ScoutingReport;

use super::Store;

// ---------------------------------------------------------------------------
// Stored reports
// ---------------------------------------------------------------------------

/// A report as read back from the database, with its row id and the
/// author's username resolved through the users table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReport {
    pub id: i64,
    pub scout_name: String,
    pub created_at: String,
    pub report: ScoutingReport,
}

const REPORT_SELECT: &str = "SELECT r.id, r.report_date, r.match_date, r.local_team, \
     r.visitor_team, r.result, r.player_name, r.player_club, r.position, \
     r.overall_rating, r.is_starter, r.minutes_played, r.technical_aspects, \
     r.tactical_aspects, r.physical_aspects, r.psychological_aspects, \
     r.observations, r.photo_path, r.created_at, u.username \
     FROM scouting_reports r JOIN users u ON u.id = r.created_by";

impl Store {
    pub fn insert_report(&self, report: &ScoutingReport, created_by: i64) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO scouting_reports (report_date, match_date, local_team, \
                 visitor_team, result, player_name, player_club, position, \
                 overall_rating, is_starter, minutes_played, technical_aspects, \
                 tactical_aspects, physical_aspects, psychological_aspects, \
                 observations, photo_path, created_by) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, \
                 ?14, ?15, ?16, ?17, ?18)",
                params![
                    report.report_date.to_string(),
                    report.match_date.to_string(),
                    report.local_team,
                    report.visitor_team,
                    report.result,
                    report.player_name,
                    report.player_club,
                    report.position,
                    report.overall_rating,
                    report.is_starter,
                    report.minutes_played,
                    report.technical,
                    report.tactical,
                    report.physical,
                    report.psychological,
                    report.observations,
                    report.photo_path,
                    created_by,
                ],
            )
            .context("inserting scouting report")?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn report_by_id(&self, id: i64) -> Result<Option<StoredReport>> {
        let sql = format!("{REPORT_SELECT} WHERE r.id = ?1");
        self.conn
            .query_row(&sql, params![id], map_report)
            .optional()
            .context("querying report")
    }

    /// One page of reports, newest match first. `player` filters by a
    /// case-insensitive substring of the player name.
    pub fn list_reports(
        &self,
        player: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<StoredReport>> {
        let order = "ORDER BY r.match_date DESC, r.id DESC LIMIT ?1 OFFSET ?2";
        let reports = match name_pattern(player) {
            Some(pattern) => {
                let sql = format!("{REPORT_SELECT} WHERE r.player_name LIKE ?3 {order}");
                let mut stmt = self.conn.prepare(&sql)?;
                stmt.query_map(params![limit as i64, offset as i64, pattern], map_report)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let sql = format!("{REPORT_SELECT} {order}");
                let mut stmt = self.conn.prepare(&sql)?;
                stmt.query_map(params![limit as i64, offset as i64], map_report)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(reports)
    }

    /// Total reports matching the player filter.
    pub fn count_reports(&self, player: Option<&str>) -> Result<usize> {
        let count: i64 = match name_pattern(player) {
            Some(pattern) => self.conn.query_row(
                "SELECT COUNT(*) FROM scouting_reports WHERE player_name LIKE ?1",
                params![pattern],
                |row| row.get(0),
            )?,
            None => {
                self.conn
                    .query_row("SELECT COUNT(*) FROM scouting_reports", [], |row| {
                        row.get(0)
                    })?
            }
        };
        Ok(count as usize)
    }
}

fn name_pattern(player: Option<&str>) -> Option<String> {
    let needle = player?.trim();
    if needle.is_empty() {
        None
    } else {
        Some(format!("%{needle}%"))
    }
}

fn map_report(row: &rusqlite::Row) -> rusqlite::Result<StoredReport> {
    Ok(StoredReport {
        id: row.get(0)?,
        report: ScoutingReport {
            report_date: parse_date(row.get::<_, String>(1)?)?,
            match_date: parse_date(row.get::<_, String>(2)?)?,
            local_team: row.get(3)?,
            visitor_team: row.get(4)?,
            result: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            player_name: row.get(6)?,
            player_club: row.get(7)?,
            position: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            overall_rating: row.get(9)?,
            is_starter: row.get(10)?,
            minutes_played: row.get(11)?,
            technical: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
            tactical: row.get::<_, Option<String>>(13)?.unwrap_or_default(),
            physical: row.get::<_, Option<String>>(14)?.unwrap_or_default(),
            psychological: row.get::<_, Option<String>>(15)?.unwrap_or_default(),
            observations: row.get::<_, Option<String>>(16)?.unwrap_or_default(),
            photo_path: row.get(17)?,
        },
        created_at: row.get(18)?,
        scout_name: row.get(19)?,
    })
}

fn parse_date(text: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
