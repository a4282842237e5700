//! File-backed recipient list and saved position templates

use crate::io::ensure_file;
use crate::types::*;
use crate::validate::validate_recipient_name;
use std::path::{Path, PathBuf};

/// Parse recipients from CSV with columns `name,title,signature_path`.
///
/// A header row is expected. Relative signature paths are resolved against
/// `base_dir`. Rows with fewer than three columns are rejected.
pub fn parse_recipients(contents: &str, base_dir: &Path) -> Result<Vec<Recipient>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(contents.as_bytes());
    let mut recipients = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| StampError::Config(format!("Recipient CSV: {}", e)))?;
        // +2: one for the header, one for 1-based numbering
        let line = row + 2;
        if record.len() < 3 {
            return Err(StampError::Config(format!(
                "Recipient CSV line {}: expected name,title,signature_path",
                line
            )));
        }

        let name = record[0].to_string();
        validate_recipient_name(&name)
            .map_err(|e| StampError::Config(format!("Recipient CSV line {}: {}", line, e)))?;

        let signature_path = PathBuf::from(&record[2]);
        let signature_path = if signature_path.is_relative() {
            base_dir.join(signature_path)
        } else {
            signature_path
        };

        recipients.push(Recipient {
            name,
            title: record[1].to_string(),
            signature_path,
        });
    }

    Ok(recipients)
}

/// Load recipients from a CSV file; relative paths resolve next to the file.
pub async fn load_recipients(path: impl AsRef<Path>) -> Result<Vec<Recipient>> {
    let path = path.as_ref().to_owned();
    ensure_file(&path).await?;
    let contents = tokio::fs::read_to_string(&path).await?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    tokio::task::spawn_blocking(move || parse_recipients(&contents, &base_dir)).await?
}

/// A named, reusable position
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionTemplate {
    pub name: String,
    pub position: Position,
}

/// Saved positions, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionTemplateStore {
    pub templates: Vec<PositionTemplate>,
}

impl PositionTemplateStore {
    pub fn get(&self, name: &str) -> Option<&Position> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .map(|t| &t.position)
    }

    /// Insert or replace the template called `name`.
    pub fn upsert(&mut self, name: impl Into<String>, position: Position) {
        let name = name.into();
        match self.templates.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.position = position,
            None => self.templates.push(PositionTemplate { name, position }),
        }
    }

    /// Remove a template; returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.name != name);
        self.templates.len() != before
    }

    /// Load the store; a missing file yields an empty store.
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| StampError::Config(format!("Failed to parse position templates: {}", e)))
    }

    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            StampError::Config(format!("Failed to serialize position templates: {}", e))
        })?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
