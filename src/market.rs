use serde::Serialize;

use crate::aggregate::{AggregateResult, Metric};
use crate::grid::{Btts, GoalLine, OutcomeProbs};

/// Bookmaker view of a fixture with the margin removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ImpliedMarket {
    pub outcome: Option<OutcomeProbs>,
    pub over_25: Option<f64>,
    pub under_25: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FairOdds {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
    pub over_25: Option<f64>,
    pub under_25: Option<f64>,
    pub btts_yes: Option<f64>,
    pub btts_no: Option<f64>,
}

pub fn no_vig_three_way(home: f64, draw: f64, away: f64) -> Option<OutcomeProbs> {
    if home <= 1.0 || draw <= 1.0 || away <= 1.0 {
        return None;
    }
    let ih = 1.0 / home;
    let id = 1.0 / draw;
    let ia = 1.0 / away;
    let sum = ih + id + ia;
    if !sum.is_finite() || sum <= 0.0 {
        return None;
    }
    Some(OutcomeProbs {
        home: ih / sum,
        draw: id / sum,
        away: ia / sum,
    })
}

pub fn no_vig_two_way(over: f64, under: f64) -> Option<(f64, f64)> {
    if over <= 1.0 || under <= 1.0 {
        return None;
    }
    let io = 1.0 / over;
    let iu = 1.0 / under;
    let sum = io + iu;
    Some((io / sum, iu / sum))
}

/// Margin-free probabilities from the average closing prices of an aggregate.
pub fn implied_from_averages(agg: &AggregateResult) -> ImpliedMarket {
    let outcome = match (
        agg.avg(Metric::OddsHome),
        agg.avg(Metric::OddsDraw),
        agg.avg(Metric::OddsAway),
    ) {
        (Some(h), Some(d), Some(a)) => no_vig_three_way(h, d, a),
        _ => None,
    };
    let totals = match (agg.avg(Metric::OddsOver25), agg.avg(Metric::OddsUnder25)) {
        (Some(o), Some(u)) => no_vig_two_way(o, u),
        _ => None,
    };
    ImpliedMarket {
        outcome,
        over_25: totals.map(|t| t.0),
        under_25: totals.map(|t| t.1),
    }
}

pub fn fair_price(p: f64) -> Option<f64> {
    if p.is_finite() && p > 0.0 { Some(1.0 / p) } else { None }
}

pub fn fair_odds(outcome: &OutcomeProbs, line_25: Option<&GoalLine>, btts: &Btts) -> FairOdds {
    FairOdds {
        home: fair_price(outcome.home),
        draw: fair_price(outcome.draw),
        away: fair_price(outcome.away),
        over_25: line_25.and_then(|l| fair_price(l.over)),
        under_25: line_25.and_then(|l| fair_price(l.under)),
        btts_yes: fair_price(btts.yes),
        btts_no: fair_price(btts.no),
    }
}
