use std::collections::BTreeMap;

use serde::Serialize;

use crate::records::{FullTimeResult, MatchRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    HomeGoals,
    AwayGoals,
    HomeShots,
    AwayShots,
    HomeShotsOnTarget,
    AwayShotsOnTarget,
    OddsHome,
    OddsDraw,
    OddsAway,
    OddsOver25,
    OddsUnder25,
}

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::HomeGoals,
        Metric::AwayGoals,
        Metric::HomeShots,
        Metric::AwayShots,
        Metric::HomeShotsOnTarget,
        Metric::AwayShotsOnTarget,
        Metric::OddsHome,
        Metric::OddsDraw,
        Metric::OddsAway,
        Metric::OddsOver25,
        Metric::OddsUnder25,
    ];

    pub fn value(self, m: &MatchRecord) -> Option<f64> {
        match self {
            Metric::HomeGoals => m.home_goals.map(f64::from),
            Metric::AwayGoals => m.away_goals.map(f64::from),
            Metric::HomeShots => m.home_shots.map(f64::from),
            Metric::AwayShots => m.away_shots.map(f64::from),
            Metric::HomeShotsOnTarget => m.home_shots_on_target.map(f64::from),
            Metric::AwayShotsOnTarget => m.away_shots_on_target.map(f64::from),
            Metric::OddsHome => m.odds_home,
            Metric::OddsDraw => m.odds_draw,
            Metric::OddsAway => m.odds_away,
            Metric::OddsOver25 => m.odds_over_25,
            Metric::OddsUnder25 => m.odds_under_25,
        }
    }
}

/// Which matches of the window feed an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleFilter {
    /// Every match: the league baseline.
    All,
    /// Matches the team played at home.
    HomeTeam(String),
    /// Matches the team played away.
    AwayTeam(String),
}

impl RoleFilter {
    pub fn accepts(&self, m: &MatchRecord) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::HomeTeam(team) => m.home_team == *team,
            RoleFilter::AwayTeam(team) => m.away_team == *team,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub games: usize,
    pub home_wins: usize,
    pub draws: usize,
    pub away_wins: usize,
    pub over_25: usize,
    pub under_25: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub averages: BTreeMap<Metric, Option<f64>>,
    pub totals: Totals,
}

impl AggregateResult {
    pub fn avg(&self, metric: Metric) -> Option<f64> {
        self.averages.get(&metric).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.games == 0
    }
}

pub fn aggregate(matches: &[MatchRecord], filter: &RoleFilter) -> AggregateResult {
    let selected: Vec<&MatchRecord> = matches.iter().filter(|m| filter.accepts(m)).collect();

    let averages = Metric::ALL
        .into_iter()
        .map(|metric| (metric, mean_present(&selected, metric)))
        .collect();

    let mut totals = Totals {
        games: selected.len(),
        ..Totals::default()
    };
    for m in &selected {
        match m.result {
            Some(FullTimeResult::Home) => totals.home_wins += 1,
            Some(FullTimeResult::Draw) => totals.draws += 1,
            Some(FullTimeResult::Away) => totals.away_wins += 1,
            None => {}
        }
        // Both scores are needed; a half-known score counts toward neither side of the line.
        if let Some(goals) = m.total_goals() {
            if goals > 2 {
                totals.over_25 += 1;
            } else {
                totals.under_25 += 1;
            }
        }
    }

    AggregateResult { averages, totals }
}

fn mean_present(matches: &[&MatchRecord], metric: Metric) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for m in matches {
        let Some(v) = metric.value(m) else { continue };
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(home: &str, away: &str, hg: Option<u32>, ag: Option<u32>) -> MatchRecord {
        let mut m = MatchRecord::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), home, away);
        m.home_goals = hg;
        m.away_goals = ag;
        m
    }

    #[test]
    fn absent_values_leave_other_metrics_alone() {
        let mut a = rec("A", "B", Some(2), None);
        a.home_shots = Some(10);
        let mut b = rec("C", "D", Some(1), Some(1));
        b.home_shots = None;
        let agg = aggregate(&[a, b], &RoleFilter::All);

        assert_eq!(agg.avg(Metric::HomeGoals), Some(1.5));
        assert_eq!(agg.avg(Metric::AwayGoals), Some(1.0));
        assert_eq!(agg.avg(Metric::HomeShots), Some(10.0));
        assert_eq!(agg.avg(Metric::OddsHome), None);
        assert_eq!(agg.totals.games, 2);
    }

    #[test]
    fn goal_line_needs_both_scores() {
        let rows = vec![
            rec("A", "B", Some(2), Some(1)),
            rec("A", "C", Some(1), Some(1)),
            rec("A", "D", Some(5), None),
            rec("A", "E", None, None),
        ];
        let agg = aggregate(&rows, &RoleFilter::All);
        assert_eq!(agg.totals.over_25, 1);
        assert_eq!(agg.totals.under_25, 1);
        assert_eq!(agg.totals.games, 4);
    }

    #[test]
    fn role_filters_select_venue() {
        let mut w = rec("A", "B", Some(3), Some(0));
        w.result = Some(FullTimeResult::Home);
        let mut l = rec("B", "A", Some(2), Some(0));
        l.result = Some(FullTimeResult::Home);
        let rows = vec![w, l];

        let home = aggregate(&rows, &RoleFilter::HomeTeam("A".to_string()));
        assert_eq!(home.totals.games, 1);
        assert_eq!(home.totals.home_wins, 1);
        assert_eq!(home.avg(Metric::HomeGoals), Some(3.0));

        let away = aggregate(&rows, &RoleFilter::AwayTeam("A".to_string()));
        assert_eq!(away.totals.games, 1);
        assert_eq!(away.avg(Metric::HomeGoals), Some(2.0));
        assert_eq!(away.avg(Metric::AwayGoals), Some(0.0));
    }

    #[test]
    fn empty_input_is_all_absent() {
        let agg = aggregate(&[], &RoleFilter::All);
        assert!(agg.is_empty());
        assert!(Metric::ALL.iter().all(|m| agg.avg(*m).is_none()));
        assert_eq!(agg.totals, Totals::default());
    }
}
