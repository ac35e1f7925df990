use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum League {
    #[serde(rename = "E0", alias = "e0")]
    PremierLeague,
    #[serde(rename = "SP1", alias = "sp1")]
    LaLiga,
    #[serde(rename = "D1", alias = "d1")]
    Bundesliga,
    #[serde(rename = "I1", alias = "i1")]
    SerieA,
}

impl League {
    pub const ALL: [League; 4] = [
        League::PremierLeague,
        League::LaLiga,
        League::Bundesliga,
        League::SerieA,
    ];

    pub fn code(self) -> &'static str {
        match self {
            League::PremierLeague => "E0",
            League::LaLiga => "SP1",
            League::Bundesliga => "D1",
            League::SerieA => "I1",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            League::PremierLeague => "Premier League",
            League::LaLiga => "La Liga",
            League::Bundesliga => "Bundesliga",
            League::SerieA => "Serie A",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for League {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let code = raw.trim().to_ascii_uppercase();
        League::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| anyhow!("unknown league code {raw:?} (expected E0, SP1, D1 or I1)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FullTimeResult {
    #[serde(alias = "H")]
    Home,
    #[serde(alias = "D")]
    Draw,
    #[serde(alias = "A")]
    Away,
}

/// One finished fixture as produced by the ingestion stage.
///
/// Every statistic is optional: a missing value is "no value", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_goals: Option<u32>,
    #[serde(default)]
    pub away_goals: Option<u32>,
    #[serde(default)]
    pub home_shots: Option<u32>,
    #[serde(default)]
    pub away_shots: Option<u32>,
    #[serde(default)]
    pub home_shots_on_target: Option<u32>,
    #[serde(default)]
    pub away_shots_on_target: Option<u32>,
    #[serde(default)]
    pub result: Option<FullTimeResult>,
    #[serde(default)]
    pub odds_home: Option<f64>,
    #[serde(default)]
    pub odds_draw: Option<f64>,
    #[serde(default)]
    pub odds_away: Option<f64>,
    #[serde(default)]
    pub odds_over_25: Option<f64>,
    #[serde(default)]
    pub odds_under_25: Option<f64>,
}

impl MatchRecord {
    /// Bare record with only the identifying fields set.
    pub fn new(date: NaiveDate, home_team: &str, away_team: &str) -> Self {
        Self {
            date,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_goals: None,
            away_goals: None,
            home_shots: None,
            away_shots: None,
            home_shots_on_target: None,
            away_shots_on_target: None,
            result: None,
            odds_home: None,
            odds_draw: None,
            odds_away: None,
            odds_over_25: None,
            odds_under_25: None,
        }
    }

    pub fn total_goals(&self) -> Option<u32> {
        let (Some(home), Some(away)) = (self.home_goals, self.away_goals) else {
            return None;
        };
        Some(home + away)
    }
}

/// The match to predict. The date stays textual; an unparseable date is a
/// valid input that degrades to an empty form window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixtureDescriptor {
    pub league: League,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl FixtureDescriptor {
    pub fn new(league: League, home_team: &str, away_team: &str, date: &str) -> Self {
        Self {
            league,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            date: Some(date.to_string()),
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_fixture_date)
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y"];

pub fn parse_fixture_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    // `%Y` happily reads "24" as year 24, so try the two-digit form first for short input.
    if s.len() <= 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%y")
    {
        return Some(d);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn league_codes_parse_case_insensitively() {
        assert_eq!("e0".parse::<League>().unwrap(), League::PremierLeague);
        assert_eq!(" SP1 ".parse::<League>().unwrap(), League::LaLiga);
        assert!("F1".parse::<League>().is_err());
    }

    #[test]
    fn fixture_dates_accept_known_formats() {
        let want = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_fixture_date("2024-03-09"), Some(want));
        assert_eq!(parse_fixture_date("09/03/2024"), Some(want));
        assert_eq!(parse_fixture_date("09/03/24"), Some(want));
        assert_eq!(parse_fixture_date("March 9th"), None);
        assert_eq!(parse_fixture_date("  "), None);
    }

    #[test]
    fn missing_fields_deserialize_as_absent() {
        let raw = r#"{"date":"2024-01-20","home_team":"Arsenal","away_team":"Fulham","home_goals":2,"result":"H"}"#;
        let rec: MatchRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.home_goals, Some(2));
        assert_eq!(rec.away_goals, None);
        assert_eq!(rec.home_shots, None);
        assert_eq!(rec.result, Some(FullTimeResult::Home));
        assert_eq!(rec.total_goals(), None);
    }
}
