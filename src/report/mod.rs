/// Scouting reports: the domain type plus PDF rendering.

pub mod pdf;

use chrono::NaiveDate;

/// A match-scouting report as filled in by a scout. Dates are calendar
/// dates; the photo is kept as a path into the local filesystem and
/// only read when rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoutingReport {
    pub report_date: NaiveDate,
    pub match_date: NaiveDate,
    pub local_team: String,
    pub visitor_team: String,
    pub result: String,
    pub player_name: String,
    pub player_club: String,
    pub position: String,
    /// 1 to 10.
    pub overall_rating: u8,
    pub is_starter: bool,
    pub minutes_played: u32,
    pub technical: String,
    pub tactical: String,
    pub physical: String,
    pub psychological: String,
    pub observations: String,
    pub photo_path: Option<String>,
}

impl ScoutingReport {
    /// The five free-text sections in presentation order.
    pub fn sections(&self) -> [(&'static str, &str); 5] {
        [
            ("ASPECTOS TÉCNICOS", self.technical.as_str()),
            ("ASPECTOS TÁCTICOS", self.tactical.as_str()),
            ("ASPECTOS FÍSICOS", self.physical.as_str()),
            ("ASPECTOS PSICOLÓGICOS", self.psychological.as_str()),
            ("OBSERVACIONES", self.observations.as_str()),
        ]
    }
}
