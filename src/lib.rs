pub mod clustering;
pub mod grid;
pub mod inference;
pub mod list;
pub mod models;
pub mod normalize;
pub mod rows;
pub mod settings;
pub mod utils;
pub mod view;

use std::{env, fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;

use list::{list_items, project, ListFilter, SortState};
use models::DayBundle;
use settings::SettingsStore;

const USAGE: &str = "usage: daygrid <day|list|week> <bundle.json> [settings.json]

week: lays out the Monday-to-Sunday week around the bundle's date. A bundle
holds one day, so only that day is filled and the other six stay empty.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Day,
    List,
    Week,
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = env::args().skip(1);
    let mode = match args.next().as_deref() {
        Some("day") => Mode::Day,
        Some("list") => Mode::List,
        Some("week") => Mode::Week,
        _ => bail!(USAGE),
    };
    let Some(bundle_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("daygrid-settings.json"));

    let store = SettingsStore::new(settings_path)?;
    let settings = store.settings();

    let contents = fs::read_to_string(&bundle_path)
        .with_context(|| format!("Failed to read day bundle from {}", bundle_path.display()))?;
    let bundle = DayBundle::from_json(&contents)
        .with_context(|| format!("Invalid day bundle in {}", bundle_path.display()))?;

    log::info!(
        "rendering {:?} for {}",
        mode,
        bundle
            .date
            .map_or_else(|| "undated bundle".to_string(), |d| d.to_string())
    );

    let output = match mode {
        Mode::Day => serde_json::to_string_pretty(&view::build_day_view(&bundle, &settings, &Local, Local::now().timestamp()))?,
        Mode::List => {
            let items = list_items(&bundle, &settings.filters);
            serde_json::to_string_pretty(&project(&items, &ListFilter::default(), &SortState::default()))?
        }
        Mode::Week => {
            let date = bundle.date.unwrap_or_else(|| Local::now().date_naive());
            let activities: Vec<_> = bundle.activities.iter().cloned().collect();
            serde_json::to_string_pretty(&grid::week_summary(date, &activities, &Local))?
        }
    };
    println!("{output}");
    Ok(())
}
