mod bootstrap;
mod render;

use std::path::Path;

use anyhow::Result;
use summon_core::catalog::Catalog;
use summon_core::settings::{Command, ProfileAction, Settings};
use summon_data::dataset::Dataset;
use summon_data::storage::ProfileStore;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Summon Tracker v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = settings.data_dir();
    tracing::info!("Data directory: {}", data_dir.display());

    let store = ProfileStore::open(&data_dir, settings.quota_bytes())?;
    let mut dataset = Dataset::open(store)?;

    match settings.command() {
        Command::Stats => print!("{}", stats_report(&dataset, &settings.catalog_path())?),

        Command::History { rarity } => {
            print!(
                "{}",
                history_report(&dataset, &settings.catalog_path(), rarity)?
            );
        }

        Command::Import { file } => {
            let outcome = dataset.import_file(&file)?;
            print!("{}", render::render_outcome(&outcome));
            print_stats_if_possible(&settings, &dataset);
        }

        Command::LoadDb { file } => {
            let outcome = dataset.load_database_file(&file)?;
            print!("{}", render::render_outcome(&outcome));
            print_stats_if_possible(&settings, &dataset);
        }

        Command::Export { .. } if dataset.records().is_empty() => {
            tracing::warn!("Export skipped: database is empty");
            println!("Database is empty, nothing exported");
        }

        Command::Export { out } => {
            let dir = match out {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let today = chrono::Local::now().date_naive();
            let path = dataset.export(&dir, today)?;
            println!("Exported to {}", path.display());
        }

        Command::Clear => {
            dataset.clear()?;
            println!(
                "Cleared saved data for profile {}",
                dataset.store().active().name
            );
        }

        Command::Profile { action } => match action {
            ProfileAction::List => {
                let store = dataset.store();
                print!(
                    "{}",
                    render::render_profiles(store.profiles(), store.active_id())
                );
            }
            ProfileAction::Add { name } => {
                let profile = dataset.add_profile(&name)?;
                println!("Created profile {} ({})", profile.name, profile.id);
            }
            ProfileAction::Switch { id } => {
                dataset.switch_profile(id)?;
                println!(
                    "Switched to profile {} with {} records",
                    dataset.store().active().name,
                    dataset.records().len()
                );
            }
            ProfileAction::Remove => {
                let removed = dataset.remove_profile()?;
                println!(
                    "Removed profile {}; active profile is now {}",
                    removed.name,
                    dataset.store().active().name
                );
            }
        },
    }

    Ok(())
}

/// Catalog for analysing `dataset`. An empty profile needs no lookups, so a
/// missing catalog file is only an error once there are records.
fn catalog_for(dataset: &Dataset, catalog_path: &Path) -> Result<Catalog> {
    if dataset.records().is_empty() {
        return Ok(Catalog::new());
    }
    bootstrap::load_catalog(catalog_path)
}

fn stats_report(dataset: &Dataset, catalog_path: &Path) -> Result<String> {
    let catalog = catalog_for(dataset, catalog_path)?;
    let analysis = dataset.analyze(&catalog)?;

    let profile = &dataset.store().active().name;
    Ok(format!(
        "{}\n{}\n{}",
        render::render_summary(profile, &analysis.summary),
        render::render_histogram(&analysis.chart()),
        render::render_recent_six_stars(&analysis.recent_six_stars)
    ))
}

fn history_report(dataset: &Dataset, catalog_path: &Path, rarity: Option<u8>) -> Result<String> {
    let catalog = catalog_for(dataset, catalog_path)?;
    let analysis = dataset.analyze(&catalog)?;
    let rows = analysis.history(rarity, &catalog)?;
    Ok(render::render_history(&rows, rarity))
}

/// Statistics after an import are best effort; the import itself succeeded.
fn print_stats_if_possible(settings: &Settings, dataset: &Dataset) {
    match stats_report(dataset, &settings.catalog_path()) {
        Ok(report) => print!("{}", report),
        Err(e) => tracing::warn!("Cannot show statistics: {:#}", e),
    }
}
