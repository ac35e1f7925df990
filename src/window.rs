use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::records::{FixtureDescriptor, League, MatchRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowPreset {
    Days60,
    #[default]
    Days90,
    Days120,
    Days150,
}

impl WindowPreset {
    pub const ALL: [WindowPreset; 4] = [
        WindowPreset::Days60,
        WindowPreset::Days90,
        WindowPreset::Days120,
        WindowPreset::Days150,
    ];

    pub fn days(self) -> u32 {
        match self {
            WindowPreset::Days60 => 60,
            WindowPreset::Days90 => 90,
            WindowPreset::Days120 => 120,
            WindowPreset::Days150 => 150,
        }
    }

    /// Snap an arbitrary day count to the closest preset (ties go to the shorter window).
    pub fn from_days(days: u32) -> Self {
        let mut best = WindowPreset::Days60;
        for preset in WindowPreset::ALL {
            if preset.days().abs_diff(days) < best.days().abs_diff(days) {
                best = preset;
            }
        }
        best
    }
}

/// Records dated in `[fixture_date - window_days, fixture_date)`.
///
/// The fixture day itself is excluded so a played fixture never sees its own result.
pub fn filter_window(
    records: &[MatchRecord],
    fixture_date: Option<NaiveDate>,
    window_days: u32,
) -> Vec<MatchRecord> {
    let Some(end) = fixture_date else {
        return Vec::new();
    };
    let Some(start) = end.checked_sub_signed(Duration::days(i64::from(window_days))) else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|m| m.date >= start && m.date < end)
        .cloned()
        .collect()
}

pub fn filter_for_fixture(
    records: &[MatchRecord],
    fixture: &FixtureDescriptor,
    window: WindowPreset,
) -> Vec<MatchRecord> {
    let out = filter_window(records, fixture.parsed_date(), window.days());
    debug!(
        league = %fixture.league,
        home = %fixture.home_team,
        away = %fixture.away_team,
        window_days = window.days(),
        matches = out.len(),
        "filtered form window"
    );
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WindowKey {
    league: League,
    home_team: String,
    away_team: String,
    date: Option<String>,
    window_days: u32,
}

impl WindowKey {
    fn new(fixture: &FixtureDescriptor, window: WindowPreset) -> Self {
        Self {
            league: fixture.league,
            home_team: fixture.home_team.clone(),
            away_team: fixture.away_team.clone(),
            date: fixture.date.clone(),
            window_days: window.days(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedWindow {
    generation: u64,
    matches: Arc<Vec<MatchRecord>>,
}

/// Memoizes filtered windows per (league, fixture, window).
///
/// Entries remember the collection generation they were built from; a lookup
/// against a newer generation rebuilds the entry.
#[derive(Debug, Default)]
pub struct FilteredMatchCache {
    entries: HashMap<WindowKey, CachedWindow>,
}

impl FilteredMatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_filter(
        &mut self,
        records: &[MatchRecord],
        generation: u64,
        fixture: &FixtureDescriptor,
        window: WindowPreset,
    ) -> Arc<Vec<MatchRecord>> {
        let key = WindowKey::new(fixture, window);
        if let Some(hit) = self.entries.get(&key)
            && hit.generation == generation
        {
            return Arc::clone(&hit.matches);
        }
        let matches = Arc::new(filter_for_fixture(records, fixture, window));
        self.entries.insert(
            key,
            CachedWindow {
                generation,
                matches: Arc::clone(&matches),
            },
        );
        matches
    }

    /// Drop every entry for a league whose collection was replaced.
    pub fn invalidate_league(&mut self, league: League) {
        self.entries.retain(|k, _| k.league != league);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn presets_snap_to_nearest() {
        assert_eq!(WindowPreset::from_days(0), WindowPreset::Days60);
        assert_eq!(WindowPreset::from_days(100), WindowPreset::Days90);
        assert_eq!(WindowPreset::from_days(105), WindowPreset::Days90);
        assert_eq!(WindowPreset::from_days(140), WindowPreset::Days150);
        assert_eq!(WindowPreset::from_days(999), WindowPreset::Days150);
    }

    #[test]
    fn cache_rebuilds_on_new_generation() {
        let fixture = FixtureDescriptor::new(League::SerieA, "Roma", "Lazio", "2024-04-01");
        let old = vec![MatchRecord::new(day(2024, 3, 1), "Roma", "Milan")];
        let new = vec![
            MatchRecord::new(day(2024, 3, 1), "Roma", "Milan"),
            MatchRecord::new(day(2024, 3, 8), "Lazio", "Inter"),
        ];

        let mut cache = FilteredMatchCache::new();
        assert_eq!(cache.get_or_filter(&old, 1, &fixture, WindowPreset::Days60).len(), 1);
        // Same generation: stale input is ignored, the memoized window is returned.
        assert_eq!(cache.get_or_filter(&new, 1, &fixture, WindowPreset::Days60).len(), 1);
        assert_eq!(cache.get_or_filter(&new, 2, &fixture, WindowPreset::Days60).len(), 2);
        assert_eq!(cache.len(), 1);

        cache.invalidate_league(League::SerieA);
        assert!(cache.is_empty());
    }
}
