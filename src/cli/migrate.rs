use std::path::Path;

use anyhow::{Context, Result};

use linkhub::infrastructure::config::AppConfig;
use linkhub::infrastructure::store::DomainStore;
use linkhub::infrastructure::store::migration::{import, load_legacy_export};

/// Import a legacy per-page domain export into the unified store.
pub fn execute(config_path: &Path, legacy_path: &Path) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let store = DomainStore::open(config.store_path.clone())
        .context("Failed to open domain record store")?;

    let export = load_legacy_export(legacy_path)
        .with_context(|| format!("Failed to read legacy export {}", legacy_path.display()))?;
    let report = import(&store, export)?;

    println!("Imported {} domain record(s)", report.imported);
    if !report.skipped.is_empty() {
        println!("Skipped {} mapping(s):", report.skipped.len());
        for (hostname, reason) in &report.skipped {
            println!("  {hostname}: {reason}");
        }
    }

    Ok(())
}
