//! CLI `reset` command: delete every person after user confirmation.

use anyhow::{bail, Context, Result};
use std::io::Write;

use family_tree::config::TreeConfig;
use family_tree::family::tree;
use family_tree::store;

/// Delete all person documents and the tree metadata.
pub fn reset(config: &TreeConfig, yes: bool) -> Result<()> {
    if !yes {
        println!("WARNING: This will permanently delete ALL persons and the family tree.");
        println!("Data directory: {}", config.resolved_data_dir().display());
        print!("\nType YES to confirm: ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if input.trim() != "YES" {
            bail!("reset cancelled");
        }
    }

    let mut store = store::create_store(&config.storage)?;
    let deleted = tree::clear_tree(store.as_mut()).context("failed to clear records")?;

    println!("{deleted} persons deleted. Reset complete.");
    Ok(())
}
