use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::records::{FixtureDescriptor, League, MatchRecord};

/// Immutable view of one league's data, valid for the lifetime of a request.
#[derive(Debug, Clone)]
pub struct LeagueSnapshot {
    pub league: League,
    pub generation: u64,
    pub matches: Arc<Vec<MatchRecord>>,
    pub fixtures: Arc<Vec<FixtureDescriptor>>,
}

#[derive(Debug, Clone, Default)]
struct LeagueData {
    generation: u64,
    matches: Arc<Vec<MatchRecord>>,
    fixtures: Arc<Vec<FixtureDescriptor>>,
}

/// Match collections and upcoming fixtures per league.
///
/// Collections are replaced wholesale; readers keep whatever snapshot they took.
#[derive(Debug, Default)]
pub struct LeagueStore {
    leagues: HashMap<League, LeagueData>,
    next_generation: u64,
}

impl LeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_matches(&mut self, league: League, mut matches: Vec<MatchRecord>) -> u64 {
        matches.sort_by(|a, b| a.date.cmp(&b.date));
        self.next_generation += 1;
        let generation = self.next_generation;
        let entry = self.leagues.entry(league).or_default();
        entry.generation = generation;
        entry.matches = Arc::new(matches);
        generation
    }

    pub fn replace_fixtures(&mut self, league: League, fixtures: Vec<FixtureDescriptor>) {
        let entry = self.leagues.entry(league).or_default();
        entry.fixtures = Arc::new(fixtures);
    }

    pub fn snapshot(&self, league: League) -> LeagueSnapshot {
        let data = self.leagues.get(&league).cloned().unwrap_or_default();
        LeagueSnapshot {
            league,
            generation: data.generation,
            matches: data.matches,
            fixtures: data.fixtures,
        }
    }

    pub fn leagues(&self) -> Vec<League> {
        let mut out: Vec<League> = self.leagues.keys().copied().collect();
        out.sort_unstable();
        out
    }
}

pub fn load_matches_json(path: &Path) -> Result<Vec<MatchRecord>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str::<Vec<MatchRecord>>(&raw)
        .with_context(|| format!("invalid match records json in {}", path.display()))
}

pub fn load_fixtures_json(path: &Path) -> Result<Vec<FixtureDescriptor>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str::<Vec<FixtureDescriptor>>(&raw)
        .with_context(|| format!("invalid fixtures json in {}", path.display()))
}

pub fn matches_path(dir: &Path, league: League) -> PathBuf {
    dir.join(format!("{}.json", league.code()))
}

pub fn fixtures_path(dir: &Path, league: League) -> PathBuf {
    dir.join(format!("{}_fixtures.json", league.code()))
}

/// Load `<CODE>.json` and `<CODE>_fixtures.json` for each requested league.
/// Missing files are skipped; malformed ones are errors.
pub fn load_dir(dir: &Path, leagues: &[League]) -> Result<LeagueStore> {
    let mut store = LeagueStore::new();
    for league in leagues {
        let path = matches_path(dir, *league);
        if path.exists() {
            let matches = load_matches_json(&path)?;
            info!(league = %league, matches = matches.len(), "loaded match records");
            store.replace_matches(*league, matches);
        } else {
            warn!(league = %league, path = %path.display(), "no match records file");
        }

        let path = fixtures_path(dir, *league);
        if path.exists() {
            let fixtures = load_fixtures_json(&path)?;
            store.replace_fixtures(*league, fixtures);
        }
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn old_snapshots_survive_replacement() {
        let mut store = LeagueStore::new();
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let g1 = store.replace_matches(League::LaLiga, vec![MatchRecord::new(d, "A", "B")]);
        let before = store.snapshot(League::LaLiga);

        let g2 = store.replace_matches(League::LaLiga, Vec::new());
        let after = store.snapshot(League::LaLiga);

        assert!(g2 > g1);
        assert_eq!(before.generation, g1);
        assert_eq!(before.matches.len(), 1);
        assert!(after.matches.is_empty());
    }

    #[test]
    fn unknown_league_is_empty_snapshot() {
        let store = LeagueStore::new();
        let snap = store.snapshot(League::Bundesliga);
        assert_eq!(snap.generation, 0);
        assert!(snap.matches.is_empty());
        assert!(snap.fixtures.is_empty());
    }

    #[test]
    fn load_dir_skips_missing_files() {
        let dir = std::env::temp_dir().join(format!("form_predict_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            matches_path(&dir, League::PremierLeague),
            r#"[{"date":"2024-02-03","home_team":"Spurs","away_team":"Everton","home_goals":2,"away_goals":2}]"#,
        )
        .unwrap();
        let store = load_dir(&dir, &League::ALL).unwrap();
        assert_eq!(store.leagues(), vec![League::PremierLeague]);
        assert_eq!(store.snapshot(League::PremierLeague).matches.len(), 1);
        fs::remove_dir_all(&dir).ok();
    }
}
