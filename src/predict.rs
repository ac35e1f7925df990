use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{AggregateResult, RoleFilter, aggregate};
use crate::config::ModelConfig;
use crate::dataset::LeagueSnapshot;
use crate::deviation::adjusted_lambda;
use crate::distribution::ScoringDistribution;
use crate::grid::{Btts, CorrectScore, GoalLine, OutcomeProbs, ScoreGrid};
use crate::market::{FairOdds, ImpliedMarket, fair_odds, implied_from_averages};
use crate::rating::{Ratings, compute_ratings};
use crate::records::{FixtureDescriptor, MatchRecord};
use crate::window::{FilteredMatchCache, WindowPreset, filter_for_fixture};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub ratings: Ratings,
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub expected_total_goals: f64,
    pub home_goals: ScoringDistribution,
    pub away_goals: ScoringDistribution,
    pub grid: ScoreGrid,
    pub outcome: OutcomeProbs,
    pub goal_lines: Vec<GoalLine>,
    pub btts: Btts,
    pub top_scores: Vec<CorrectScore>,
    pub fair_odds: FairOdds,
}

impl PredictionResult {
    pub fn goal_line(&self, line: f64) -> Option<&GoalLine> {
        self.goal_lines.iter().find(|l| (l.line - line).abs() < 1e-9)
    }

    pub fn most_likely_score(&self) -> Option<&CorrectScore> {
        self.top_scores.first()
    }
}

/// Everything the presentation side needs for one fixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub fixture: FixtureDescriptor,
    pub window_days: u32,
    pub home_form: AggregateResult,
    pub away_form: AggregateResult,
    pub league: AggregateResult,
    pub league_market: ImpliedMarket,
    pub prediction: PredictionResult,
}

pub fn predict_from_aggregates(
    home_form: &AggregateResult,
    away_form: &AggregateResult,
    league: &AggregateResult,
    top_n: usize,
) -> PredictionResult {
    let ratings = compute_ratings(home_form, away_form, league);
    let lambda_home = adjusted_lambda(ratings.blended_home, ratings.league_home_goals);
    let lambda_away = adjusted_lambda(ratings.blended_away, ratings.league_away_goals);

    let home_goals = ScoringDistribution::from_lambda(lambda_home);
    let away_goals = ScoringDistribution::from_lambda(lambda_away);
    let grid = ScoreGrid::build(&home_goals, &away_goals);

    let outcome = grid.outcome();
    let goal_lines = grid.goal_lines();
    let btts = grid.btts();
    let top_scores = grid.top_scores(top_n);
    let line_25 = goal_lines.iter().find(|l| (l.line - 2.5).abs() < 1e-9);
    let odds = fair_odds(&outcome, line_25, &btts);

    PredictionResult {
        ratings,
        lambda_home,
        lambda_away,
        expected_total_goals: lambda_home + lambda_away,
        home_goals,
        away_goals,
        grid,
        outcome,
        goal_lines,
        btts,
        top_scores,
        fair_odds: odds,
    }
}

/// Predict from an already filtered window.
pub fn predict_from_window(
    window: &[MatchRecord],
    fixture: &FixtureDescriptor,
    window_days: u32,
    top_n: usize,
) -> PredictionReport {
    let home_form = aggregate(window, &RoleFilter::HomeTeam(fixture.home_team.clone()));
    let away_form = aggregate(window, &RoleFilter::AwayTeam(fixture.away_team.clone()));
    let league = aggregate(window, &RoleFilter::All);

    if league.is_empty() {
        warn!(
            league = %fixture.league,
            home = %fixture.home_team,
            away = %fixture.away_team,
            "no matches in form window"
        );
    }

    let prediction = predict_from_aggregates(&home_form, &away_form, &league, top_n);
    debug!(
        home = %fixture.home_team,
        away = %fixture.away_team,
        home_games = home_form.totals.games,
        away_games = away_form.totals.games,
        lambda_home = prediction.lambda_home,
        lambda_away = prediction.lambda_away,
        "fixture predicted"
    );

    PredictionReport {
        fixture: fixture.clone(),
        window_days,
        league_market: implied_from_averages(&league),
        home_form,
        away_form,
        league,
        prediction,
    }
}

pub fn predict(
    snapshot: &LeagueSnapshot,
    fixture: &FixtureDescriptor,
    window: WindowPreset,
    top_n: usize,
) -> PredictionReport {
    let matches = filter_for_fixture(&snapshot.matches, fixture, window);
    predict_from_window(&matches, fixture, window.days(), top_n)
}

pub fn predict_cached(
    cache: &mut FilteredMatchCache,
    snapshot: &LeagueSnapshot,
    fixture: &FixtureDescriptor,
    window: WindowPreset,
    top_n: usize,
) -> PredictionReport {
    let matches = cache.get_or_filter(&snapshot.matches, snapshot.generation, fixture, window);
    predict_from_window(&matches, fixture, window.days(), top_n)
}

/// Every upcoming fixture of the snapshot, in fixture order.
pub fn predict_upcoming(snapshot: &LeagueSnapshot, config: &ModelConfig) -> Vec<PredictionReport> {
    let reports: Vec<PredictionReport> = snapshot
        .fixtures
        .par_iter()
        .filter(|f| f.league == snapshot.league)
        .map(|f| predict(snapshot, f, config.window, config.top_scores))
        .collect();
    info!(
        league = %snapshot.league,
        fixtures = reports.len(),
        window_days = config.window.days(),
        "predicted upcoming fixtures"
    );
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::League;
    use chrono::NaiveDate;

    fn played(d: u32, home: &str, away: &str, hg: u32, ag: u32) -> MatchRecord {
        let mut m = MatchRecord::new(NaiveDate::from_ymd_opt(2024, 3, d).unwrap(), home, away);
        m.home_goals = Some(hg);
        m.away_goals = Some(ag);
        m.home_shots = Some(10 + hg * 2);
        m.away_shots = Some(8 + ag * 2);
        m.home_shots_on_target = Some(3 + hg);
        m.away_shots_on_target = Some(2 + ag);
        m
    }

    #[test]
    fn market_summaries_are_consistent() {
        let window = vec![
            played(1, "A", "B", 2, 0),
            played(2, "C", "D", 1, 1),
            played(3, "B", "A", 0, 1),
            played(4, "D", "C", 3, 2),
            played(5, "A", "C", 2, 1),
        ];
        let fixture = FixtureDescriptor::new(League::PremierLeague, "A", "D", "2024-03-10");
        let report = predict_from_window(&window, &fixture, 90, 3);
        let p = &report.prediction;

        assert!(p.lambda_home > 0.0 && p.lambda_away > 0.0);
        assert!((p.outcome.home + p.outcome.draw + p.outcome.away - 1.0).abs() < 1e-6);
        assert!((p.btts.yes + p.btts.no - 1.0).abs() < 1e-9);
        assert_eq!(p.top_scores.len(), 3);
        assert_eq!(p.goal_lines.len(), 3);
        assert!(p.goal_line(2.5).is_some());
        assert!((p.expected_total_goals - (p.lambda_home + p.lambda_away)).abs() < 1e-12);
        assert!(p.fair_odds.home.is_some_and(|o| o > 1.0));
        assert_eq!(report.home_form.totals.games, 2);
        assert_eq!(report.away_form.totals.games, 1);
        assert_eq!(report.league.totals.games, 5);
    }

    #[test]
    fn fixtures_of_other_leagues_are_skipped() {
        let snapshot = LeagueSnapshot {
            league: League::SerieA,
            generation: 1,
            matches: std::sync::Arc::new(vec![played(1, "A", "B", 1, 0)]),
            fixtures: std::sync::Arc::new(vec![
                FixtureDescriptor::new(League::SerieA, "A", "B", "2024-03-20"),
                FixtureDescriptor::new(League::LaLiga, "X", "Y", "2024-03-20"),
                FixtureDescriptor::new(League::SerieA, "B", "A", "2024-03-21"),
            ]),
        };
        let reports = predict_upcoming(&snapshot, &ModelConfig::default());
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].fixture.home_team, "A");
        assert_eq!(reports[1].fixture.home_team, "B");
    }
}
