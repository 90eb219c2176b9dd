//! Webhook journal: a JSON array log plus a plain-text notification feed

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::{Character, ScoredCharacter};

#[derive(Debug, Clone)]
pub struct Journal {
    log_path: PathBuf,
    notification_path: PathBuf,
}

impl Journal {
    pub fn new(log_path: impl Into<PathBuf>, notification_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            notification_path: notification_path.into(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn notification_path(&self) -> &Path {
        &self.notification_path
    }

    /// Current log contents.
    ///
    /// A missing, blank or non-JSON log is an empty history. Valid JSON that
    /// is not an array is an error, so the caller never overwrites it.
    pub fn history(&self) -> Result<Vec<Value>> {
        let text = match std::fs::read_to_string(&self.log_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Cannot read {}", self.log_path.display())));
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(other) => anyhow::bail!(
                "{} holds a JSON {} instead of an array, leaving it untouched",
                self.log_path.display(),
                json_kind(&other)
            ),
            Err(e) => {
                if !text.trim().is_empty() {
                    log::warn!(
                        "{}: not JSON ({e}), starting a new history",
                        self.log_path.display()
                    );
                }
                Ok(Vec::new())
            }
        }
    }

    /// Append one entry and rewrite the log. Returns the new entry count.
    pub fn append(&self, entry: &ScoredCharacter) -> Result<usize> {
        let mut history = self.history()?;
        history.push(serde_json::to_value(entry)?);
        drillbox_core::json::write_pretty(&history, &self.log_path)
            .with_context(|| format!("Cannot write {}", self.log_path.display()))?;
        Ok(history.len())
    }

    /// Append one line to the notification feed.
    pub fn notify(&self, entry: &ScoredCharacter) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.notification_path)
            .with_context(|| format!("Cannot open {}", self.notification_path.display()))?;
        writeln!(file, "📝 {} ajouté avec le niveau {}", entry.name, entry.level)
            .with_context(|| format!("Cannot write {}", self.notification_path.display()))?;
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Load journal entries as characters (name + score) for replay.
///
/// The file must hold a JSON array. Entries that are not a character are
/// logged and skipped; the rest still load.
pub fn read_characters(path: &Path) -> Result<Vec<Character>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let entries: Vec<Value> =
        serde_json::from_str(&text).with_context(|| format!("Invalid journal {}", path.display()))?;

    let mut characters = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let name = entry
            .get("nom")
            .and_then(Value::as_str)
            .unwrap_or("inconnu")
            .to_string();
        match serde_json::from_value::<Character>(entry) {
            Ok(character) => characters.push(character),
            Err(e) => log::error!("{}: entry {i} ({name}) skipped: {e}", path.display()),
        }
    }
    Ok(characters)
}
