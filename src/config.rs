use std::env;
use std::path::PathBuf;

use crate::window::WindowPreset;

const DEFAULT_WINDOW_DAYS: u32 = 90;
const DEFAULT_TOP_SCORES: usize = 3;
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub window: WindowPreset,
    pub top_scores: usize,
    pub data_dir: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            window: WindowPreset::from_days(DEFAULT_WINDOW_DAYS),
            top_scores: DEFAULT_TOP_SCORES,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl ModelConfig {
    /// Reads `.env.local` then `.env`, then the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let window_days = lookup("FORM_WINDOW_DAYS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_WINDOW_DAYS);
        let top_scores = lookup("FORM_TOP_SCORES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_TOP_SCORES)
            .clamp(1, 10);
        let data_dir = lookup("FORM_DATA_DIR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            window: WindowPreset::from_days(window_days),
            top_scores,
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ModelConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.window, WindowPreset::Days90);
        assert_eq!(cfg.top_scores, 3);
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn values_are_snapped_and_clamped() {
        let cfg = ModelConfig::from_lookup(lookup(&[
            ("FORM_WINDOW_DAYS", "125"),
            ("FORM_TOP_SCORES", "40"),
            ("FORM_DATA_DIR", " /srv/football "),
        ]));
        assert_eq!(cfg.window, WindowPreset::Days120);
        assert_eq!(cfg.top_scores, 10);
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/football"));

        let cfg = ModelConfig::from_lookup(lookup(&[("FORM_WINDOW_DAYS", "abc")]));
        assert_eq!(cfg.window, WindowPreset::Days90);
    }
}
