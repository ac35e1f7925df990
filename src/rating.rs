use serde::Serialize;

use crate::aggregate::{AggregateResult, Metric};

/// Stand-in denominator when the real one is absent or zero.
pub const DIV_EPSILON: f64 = 1e-6;

/// Weights of the goals model and the shot-based estimates in the blended figure.
pub const BLEND_GOALS: f64 = 0.5;
pub const BLEND_SHOTS: f64 = 0.25;
pub const BLEND_SOT: f64 = 0.25;

/// Attack/defence scores and the expected count they imply for one metric family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StrengthPair {
    pub home_attack: f64,
    pub home_defence: f64,
    pub away_attack: f64,
    pub away_defence: f64,
    pub expected_home: f64,
    pub expected_away: f64,
}

/// Raw per-team conversion rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Conversion {
    /// Goals scored per shot taken.
    pub scored_per_shot: f64,
    /// Goals conceded per shot faced.
    pub conceded_per_shot: f64,
    pub scored_per_sot: f64,
    pub conceded_per_sot: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Ratings {
    pub goals: StrengthPair,
    pub shots: StrengthPair,
    pub shots_on_target: StrengthPair,
    pub home_conversion: Conversion,
    pub away_conversion: Conversion,
    pub home_goals_from_shots: f64,
    pub away_goals_from_shots: f64,
    pub home_goals_from_sot: f64,
    pub away_goals_from_sot: f64,
    pub blended_home: f64,
    pub blended_away: f64,
    /// League same-side goal averages, zero when absent.
    pub league_home_goals: f64,
    pub league_away_goals: f64,
}

/// Absent numerators count as zero; absent or zero denominators become [`DIV_EPSILON`].
pub fn guarded_div(num: Option<f64>, den: Option<f64>) -> f64 {
    let num = finite_or_zero(num.unwrap_or(0.0));
    let den = match den {
        Some(d) if d.is_finite() && d != 0.0 => d,
        _ => DIV_EPSILON,
    };
    finite_or_zero(num / den)
}

pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// `home` is aggregated over the home side's home matches, `away` over the away
/// side's away matches, `league` over the whole window.
pub fn compute_ratings(
    home: &AggregateResult,
    away: &AggregateResult,
    league: &AggregateResult,
) -> Ratings {
    let goals = strength(home, away, league, Metric::HomeGoals, Metric::AwayGoals);
    let shots = strength(home, away, league, Metric::HomeShots, Metric::AwayShots);
    let shots_on_target = strength(
        home,
        away,
        league,
        Metric::HomeShotsOnTarget,
        Metric::AwayShotsOnTarget,
    );

    let home_conversion = conversion(home, Side::Home);
    let away_conversion = conversion(away, Side::Away);

    let home_goals_from_shots = finite_or_zero(shots.expected_home * away_conversion.conceded_per_shot);
    let away_goals_from_shots = finite_or_zero(shots.expected_away * home_conversion.conceded_per_shot);
    let home_goals_from_sot =
        finite_or_zero(shots_on_target.expected_home * away_conversion.conceded_per_sot);
    let away_goals_from_sot =
        finite_or_zero(shots_on_target.expected_away * home_conversion.conceded_per_sot);

    let blended_home = blend(goals.expected_home, home_goals_from_shots, home_goals_from_sot);
    let blended_away = blend(goals.expected_away, away_goals_from_shots, away_goals_from_sot);

    Ratings {
        goals,
        shots,
        shots_on_target,
        home_conversion,
        away_conversion,
        home_goals_from_shots,
        away_goals_from_shots,
        home_goals_from_sot,
        away_goals_from_sot,
        blended_home,
        blended_away,
        league_home_goals: finite_or_zero(league.avg(Metric::HomeGoals).unwrap_or(0.0)),
        league_away_goals: finite_or_zero(league.avg(Metric::AwayGoals).unwrap_or(0.0)),
    }
}

fn blend(goals_model: f64, from_shots: f64, from_sot: f64) -> f64 {
    finite_or_zero(BLEND_GOALS * goals_model + BLEND_SHOTS * from_shots + BLEND_SOT * from_sot)
}

fn strength(
    home: &AggregateResult,
    away: &AggregateResult,
    league: &AggregateResult,
    home_metric: Metric,
    away_metric: Metric,
) -> StrengthPair {
    let league_home = league.avg(home_metric);
    let league_away = league.avg(away_metric);

    // "For" at home is the home column; "against" at home is the away column. Mirrored away.
    let home_attack = guarded_div(home.avg(home_metric), league_home);
    let home_defence = guarded_div(home.avg(away_metric), league_away);
    let away_attack = guarded_div(away.avg(away_metric), league_away);
    let away_defence = guarded_div(away.avg(home_metric), league_home);

    StrengthPair {
        home_attack,
        home_defence,
        away_attack,
        away_defence,
        expected_home: finite_or_zero(home_attack * away_defence * league_home.unwrap_or(0.0)),
        expected_away: finite_or_zero(away_attack * home_defence * league_away.unwrap_or(0.0)),
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Home,
    Away,
}

fn conversion(team: &AggregateResult, side: Side) -> Conversion {
    let (goals_for, goals_against, shots_for, shots_against, sot_for, sot_against) = match side {
        Side::Home => (
            Metric::HomeGoals,
            Metric::AwayGoals,
            Metric::HomeShots,
            Metric::AwayShots,
            Metric::HomeShotsOnTarget,
            Metric::AwayShotsOnTarget,
        ),
        Side::Away => (
            Metric::AwayGoals,
            Metric::HomeGoals,
            Metric::AwayShots,
            Metric::HomeShots,
            Metric::AwayShotsOnTarget,
            Metric::HomeShotsOnTarget,
        ),
    };
    Conversion {
        scored_per_shot: guarded_div(team.avg(goals_for), team.avg(shots_for)),
        conceded_per_shot: guarded_div(team.avg(goals_against), team.avg(shots_against)),
        scored_per_sot: guarded_div(team.avg(goals_for), team.avg(sot_for)),
        conceded_per_sot: guarded_div(team.avg(goals_against), team.avg(sot_against)),
    }
}
