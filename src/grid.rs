use std::cmp::Ordering;

use serde::Serialize;

use crate::distribution::{BUCKETS, ScoringDistribution, bucket_goals, bucket_label};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreGrid {
    /// `cells[home][away]`; index 10 on either axis is the "9+" tail.
    pub cells: [[f64; BUCKETS]; BUCKETS],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutcomeProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GoalLine {
    pub line: f64,
    pub over: f64,
    pub under: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Btts {
    pub yes: f64,
    pub no: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectScore {
    pub rank: usize,
    pub home_bucket: usize,
    pub away_bucket: usize,
    pub label: String,
    pub probability: f64,
}

pub const GOAL_LINES: [f64; 3] = [1.5, 2.5, 3.5];

impl ScoreGrid {
    pub fn build(home: &ScoringDistribution, away: &ScoringDistribution) -> Self {
        let mut cells = [[0.0; BUCKETS]; BUCKETS];
        for (i, row) in cells.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = home.probs[i] * away.probs[j];
            }
        }
        Self { cells }
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// Tail buckets compare as more than any exact count, and equal to each other.
    pub fn outcome(&self) -> OutcomeProbs {
        let mut out = OutcomeProbs::default();
        for (i, row) in self.cells.iter().enumerate() {
            for (j, p) in row.iter().enumerate() {
                match i.cmp(&j) {
                    Ordering::Greater => out.home += p,
                    Ordering::Equal => out.draw += p,
                    Ordering::Less => out.away += p,
                }
            }
        }
        out
    }

    pub fn goal_line(&self, line: f64) -> GoalLine {
        let mut over = 0.0;
        let mut under = 0.0;
        for (i, row) in self.cells.iter().enumerate() {
            for (j, p) in row.iter().enumerate() {
                let goals = (bucket_goals(i) + bucket_goals(j)) as f64;
                if goals > line {
                    over += p;
                } else {
                    under += p;
                }
            }
        }
        GoalLine { line, over, under }
    }

    pub fn goal_lines(&self) -> Vec<GoalLine> {
        GOAL_LINES.iter().map(|line| self.goal_line(*line)).collect()
    }

    /// "No" is row 0 union column 0.
    pub fn btts(&self) -> Btts {
        let home_blank: f64 = self.cells[0].iter().sum();
        let away_blank: f64 = self.cells.iter().map(|row| row[0]).sum();
        let no = (home_blank + away_blank - self.cells[0][0]).clamp(0.0, 1.0);
        Btts { yes: 1.0 - no, no }
    }

    /// Most likely scores first; ties go to the lower combined index, then the lower home index.
    pub fn top_scores(&self, n: usize) -> Vec<CorrectScore> {
        let mut ranked: Vec<(usize, usize, f64)> = Vec::with_capacity(BUCKETS * BUCKETS);
        for (i, row) in self.cells.iter().enumerate() {
            for (j, p) in row.iter().enumerate() {
                ranked.push((i, j, *p));
            }
        }
        ranked.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then((a.0 + a.1).cmp(&(b.0 + b.1)))
                .then(a.0.cmp(&b.0))
        });
        ranked
            .into_iter()
            .take(n)
            .enumerate()
            .map(|(idx, (i, j, p))| CorrectScore {
                rank: idx + 1,
                home_bucket: i,
                away_bucket: j,
                label: format!("{}-{}", bucket_label(i), bucket_label(j)),
                probability: p,
            })
            .collect()
    }
}
