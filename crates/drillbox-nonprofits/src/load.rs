//! Write filtered records to a JSON file

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Save records as an indented UTF-8 JSON array, replacing `path`.
pub fn load<T: Serialize>(records: &[T], path: &Path) -> Result<()> {
    log::info!("Saving {} records to {}...", records.len(), path.display());
    drillbox_core::json::write_pretty(records, path)
        .with_context(|| format!("Cannot write {}", path.display()))?;
    log::info!("Saved {}", path.display());
    Ok(())
}
