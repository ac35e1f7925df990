use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use form_predict::aggregate::Metric;
use form_predict::config::ModelConfig;
use form_predict::dataset::{self, LeagueStore};
use form_predict::distribution::bucket_label;
use form_predict::predict::{PredictionReport, predict_upcoming};
use form_predict::records::League;
use form_predict::synthetic;
use form_predict::window::WindowPreset;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut config = ModelConfig::from_env();
    if let Some(days) = arg_value(&args, "--window") {
        let days = days
            .parse::<u32>()
            .with_context(|| format!("invalid --window value {days:?}"))?;
        config.window = WindowPreset::from_days(days);
    }
    if let Some(dir) = arg_value(&args, "--data") {
        config.data_dir = PathBuf::from(dir);
    }
    let leagues = match arg_value(&args, "--league") {
        Some(raw) => vec![raw.parse::<League>()?],
        None => League::ALL.to_vec(),
    };
    let json = args.iter().any(|a| a == "--json");

    let store = if args.iter().any(|a| a == "--synthetic") {
        synthetic_store(&leagues)
    } else {
        dataset::load_dir(&config.data_dir, &leagues)?
    };
    if store.leagues().is_empty() {
        return Err(anyhow!(
            "no match data found in {} (try --synthetic)",
            config.data_dir.display()
        ));
    }

    for league in store.leagues() {
        let snapshot = store.snapshot(league);
        let reports = predict_upcoming(&snapshot, &config);
        if json {
            let out = serde_json::to_string_pretty(&reports).context("serialize predictions")?;
            println!("{out}");
            continue;
        }
        println!("== {} ({}) window {}d", league.display_name(), league, config.window.days());
        if reports.is_empty() {
            println!("  no upcoming fixtures");
        }
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

fn synthetic_store(leagues: &[League]) -> LeagueStore {
    let end = Utc::now().date_naive();
    let mut store = LeagueStore::new();
    for (idx, league) in leagues.iter().enumerate() {
        let lg = synthetic::generate_league(*league, end, 24, 2024 + idx as u64);
        store.replace_matches(*league, lg.matches);
        store.replace_fixtures(*league, lg.fixtures);
    }
    info!(leagues = leagues.len(), "generated synthetic data");
    store
}

fn print_report(r: &PredictionReport) {
    let p = &r.prediction;
    println!(
        "{} vs {} ({})",
        r.fixture.home_team,
        r.fixture.away_team,
        r.fixture.date.as_deref().unwrap_or("no date")
    );
    if r.league.is_empty() {
        println!("  no matches in the last {} days", r.window_days);
    }
    println!(
        "  form games: home {} / away {} / league {}",
        r.home_form.totals.games, r.away_form.totals.games, r.league.totals.games
    );
    println!(
        "  home goals avg {}  away goals avg {}",
        fmt_opt(r.home_form.avg(Metric::HomeGoals)),
        fmt_opt(r.away_form.avg(Metric::AwayGoals))
    );
    println!(
        "  xG {:.2} - {:.2}  lambda {:.2} - {:.2}",
        p.ratings.blended_home, p.ratings.blended_away, p.lambda_home, p.lambda_away
    );
    println!(
        "  1X2 {:.1}% / {:.1}% / {:.1}%",
        p.outcome.home * 100.0,
        p.outcome.draw * 100.0,
        p.outcome.away * 100.0
    );
    for line in &p.goal_lines {
        println!(
            "  O/U {:.1}: {:.1}% / {:.1}%",
            line.line,
            line.over * 100.0,
            line.under * 100.0
        );
    }
    println!("  BTTS yes {:.1}% no {:.1}%", p.btts.yes * 100.0, p.btts.no * 100.0);
    for s in &p.top_scores {
        println!("  #{} {} ({:.1}%)", s.rank, s.label, s.probability * 100.0);
    }
    let modal = (p.home_goals.mode(), p.away_goals.mode());
    println!(
        "  modal goals {}-{}",
        bucket_label(modal.0),
        bucket_label(modal.1)
    );
    if let Some(m) = r.league_market.outcome {
        println!(
            "  league market 1X2 {:.1}% / {:.1}% / {:.1}%",
            m.home * 100.0,
            m.draw * 100.0,
            m.away * 100.0
        );
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "N/A".to_string())
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
