use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::records::{FixtureDescriptor, FullTimeResult, League, MatchRecord};

const TEAMS: &[&str] = &[
    "Northbridge",
    "Eastfield",
    "Harbour City",
    "Kingsmoor",
    "Riverside",
    "Ashford Town",
    "Westgate",
    "Millbrook",
    "Stonehill",
    "Larkspur",
];

#[derive(Debug, Clone)]
pub struct SyntheticLeague {
    pub matches: Vec<MatchRecord>,
    pub fixtures: Vec<FixtureDescriptor>,
}

/// Seeded fake season: `rounds` of played matches ending the day before `end`,
/// plus one round of upcoming fixtures on `end`.
pub fn generate_league(league: League, end: NaiveDate, rounds: usize, seed: u64) -> SyntheticLeague {
    let mut rng = StdRng::seed_from_u64(seed);
    let strength: Vec<(f64, f64)> = TEAMS
        .iter()
        .map(|_| (rng.gen_range(0.7..1.4), rng.gen_range(0.7..1.4)))
        .collect();

    let mut matches = Vec::with_capacity(rounds * TEAMS.len() / 2);
    for round in 0..rounds {
        let days_back = 7 * (rounds - round) as i64;
        let date = end - Duration::days(days_back);
        for (h, a) in round_pairs(round) {
            matches.push(simulate_match(&mut rng, date, h, a, &strength));
        }
    }

    let fixtures = round_pairs(rounds)
        .into_iter()
        .map(|(h, a)| FixtureDescriptor {
            league,
            home_team: TEAMS[h].to_string(),
            away_team: TEAMS[a].to_string(),
            date: Some(end.format("%Y-%m-%d").to_string()),
        })
        .collect();

    SyntheticLeague { matches, fixtures }
}

/// Circle-method pairing for one round, alternating venue by round.
fn round_pairs(round: usize) -> Vec<(usize, usize)> {
    let n = TEAMS.len();
    let mut order: Vec<usize> = (0..n).collect();
    order[1..].rotate_right(round % (n - 1));
    (0..n / 2)
        .map(|i| {
            let (x, y) = (order[i], order[n - 1 - i]);
            if round % 2 == 0 { (x, y) } else { (y, x) }
        })
        .collect()
}

fn simulate_match(
    rng: &mut StdRng,
    date: NaiveDate,
    home: usize,
    away: usize,
    strength: &[(f64, f64)],
) -> MatchRecord {
    let (h_att, h_def) = strength[home];
    let (a_att, a_def) = strength[away];
    let lambda_home = 1.45 * h_att / a_def;
    let lambda_away = 1.15 * a_att / h_def;

    let hg = sample_poisson(rng, lambda_home);
    let ag = sample_poisson(rng, lambda_away);
    let hs = hg + sample_poisson(rng, lambda_home * 7.0);
    let as_ = ag + sample_poisson(rng, lambda_away * 7.0);
    let hst = hg + sample_poisson(rng, lambda_home * 2.0).min(hs - hg);
    let ast = ag + sample_poisson(rng, lambda_away * 2.0).min(as_ - ag);

    let mut m = MatchRecord::new(date, TEAMS[home], TEAMS[away]);
    m.home_goals = Some(hg);
    m.away_goals = Some(ag);
    m.home_shots = Some(hs);
    m.away_shots = Some(as_);
    m.home_shots_on_target = Some(hst);
    m.away_shots_on_target = Some(ast);
    m.result = Some(match hg.cmp(&ag) {
        std::cmp::Ordering::Greater => FullTimeResult::Home,
        std::cmp::Ordering::Less => FullTimeResult::Away,
        std::cmp::Ordering::Equal => FullTimeResult::Draw,
    });

    // Rough prices with a ~5% margin; some rows miss them, as real feeds do.
    if rng.gen_bool(0.9) {
        let ph = (lambda_home / (lambda_home + lambda_away)) * 0.72;
        let pa = (lambda_away / (lambda_home + lambda_away)) * 0.72;
        let pd = 1.0 - ph - pa;
        m.odds_home = Some(round2(1.0 / (ph * 1.05)));
        m.odds_draw = Some(round2(1.0 / (pd * 1.05)));
        m.odds_away = Some(round2(1.0 / (pa * 1.05)));
        m.odds_over_25 = Some(round2(rng.gen_range(1.6..2.3)));
        m.odds_under_25 = Some(round2(rng.gen_range(1.6..2.3)));
    }
    m
}

fn sample_poisson(rng: &mut StdRng, lambda: f64) -> u32 {
    let limit = (-lambda).exp();
    let mut k = 0u32;
    let mut p = 1.0;
    loop {
        p *= rng.r#gen::<f64>();
        if p <= limit || k >= 60 {
            return k;
        }
        k += 1;
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
