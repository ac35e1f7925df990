//! Pull blended expected goals back toward the league mean when they stray far from it.

/// (delta at or above, multiplier), checked top-down.
const OVERSHOOT_BANDS: [(f64, f64); 8] = [
    (2.00, 0.75),
    (1.75, 0.78),
    (1.50, 0.81),
    (1.25, 0.84),
    (1.00, 0.88),
    (0.75, 0.91),
    (0.50, 0.94),
    (0.25, 0.97),
];

/// (delta at or below, multiplier), checked top-down.
const UNDERSHOOT_BANDS: [(f64, f64); 8] = [
    (-2.00, 1.25),
    (-1.75, 1.22),
    (-1.50, 1.19),
    (-1.25, 1.16),
    (-1.00, 1.12),
    (-0.75, 1.09),
    (-0.50, 1.06),
    (-0.25, 1.03),
];

pub fn deviation_multiplier(delta: f64) -> f64 {
    if delta.is_nan() {
        return 1.0;
    }
    if delta >= 0.0 {
        OVERSHOOT_BANDS
            .iter()
            .find(|(edge, _)| delta >= *edge)
            .map_or(1.0, |(_, mult)| *mult)
    } else {
        UNDERSHOOT_BANDS
            .iter()
            .find(|(edge, _)| delta <= *edge)
            .map_or(1.0, |(_, mult)| *mult)
    }
}

/// Final scoring rate for one side; never negative.
pub fn adjusted_lambda(blended: f64, league_baseline: f64) -> f64 {
    let blended = if blended.is_finite() { blended } else { 0.0 };
    let mult = deviation_multiplier(blended - league_baseline);
    (blended * mult).max(0.0)
}
