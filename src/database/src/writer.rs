use crate::error::Result;
use engine::TransferSuggestion;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Appends each run's suggestions to a JSON array on disk. Rows of one run
/// share a timestamp.
pub struct SuggestionWriter {
    path: PathBuf,
}

impl SuggestionWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SuggestionWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Vec<TransferSuggestion>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }

        let raw = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    pub fn write(&self, suggestions: &[TransferSuggestion]) -> Result<()> {
        let mut rows = self.read()?;
        rows.extend_from_slice(suggestions);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&rows)?)?;
        fs::rename(&tmp, &self.path)?;

        info!("wrote {} suggestions to {}", suggestions.len(), self.path.display());

        Ok(())
    }
}
