//! CLI `check` command: load every person and print the integrity report.

use anyhow::{Context, Result};

use family_tree::config::TreeConfig;
use family_tree::family::tree;
use family_tree::store;

/// Print the integrity report. Returns `false` when the data is inconsistent.
pub fn check(config: &TreeConfig) -> Result<bool> {
    let store = store::create_store(&config.storage)?;

    let persons = store.list_all().context("failed to read person records")?;
    let meta = store.get_tree().context("failed to read tree metadata")?;
    let report = tree::audit(store.as_ref()).context("failed to run integrity check")?;

    println!("Family Tree Integrity Report");
    println!("============================");
    println!();
    println!("Data directory:    {}", config.resolved_data_dir().display());
    println!("Backend:           {}", config.storage.backend);
    println!("Tree:              {}", meta.as_ref().map_or("(none)", |t| t.name.as_str()));
    println!("Persons:           {}", persons.len());
    println!();
    if report.is_valid {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({} problems)", report.errors.len());
        for error in &report.errors {
            println!("  - {error}");
        }
    }

    Ok(report.is_valid)
}
