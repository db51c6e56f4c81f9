use crate::error::Result;
use crate::strategy::StrategyRecord;
use log::debug;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Write-once storage of finished strategies, one entry per tree leaf.
pub trait LeafStore: Send + Sync {
    fn persist(&self, tag: &str, path_id: &str, record: &StrategyRecord) -> Result<()>;

    fn count(&self, tag: &str) -> Result<u64>;

    /// Every leaf for `tag`, ordered by path id.
    fn load_all(&self, tag: &str) -> Result<Vec<(String, StrategyRecord)>>;

    fn clear(&self, tag: &str) -> Result<()>;
}

/// One JSON file per leaf, named `strategy_{tag}_{path}.json`.
///
/// Files are written under a hidden temporary name and renamed into place,
/// so a leaf is either fully visible or not visible at all.
pub struct FileLeafStore {
    dir: PathBuf,
}

impl FileLeafStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileLeafStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(tag: &str, path_id: &str) -> String {
        format!("strategy_{}_{}.json", tag, path_id)
    }

    /// Path id encoded in `file_name`, when the file is a leaf of `tag`.
    fn parse_file_name<'n>(file_name: &'n str, tag: &str) -> Option<&'n str> {
        let path_id = file_name
            .strip_prefix("strategy_")?
            .strip_prefix(tag)?
            .strip_prefix('_')?
            .strip_suffix(".json")?;

        let valid = !path_id.is_empty()
            && path_id
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '-' | 'W' | 'F' | 'T' | 'B'));

        valid.then_some(path_id)
    }

    fn leaf_files(&self, tag: &str) -> Result<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };

            if let Some(path_id) = Self::parse_file_name(file_name, tag) {
                files.push((path_id.to_string(), entry.path()));
            }
        }

        files.sort();
        Ok(files)
    }
}

impl LeafStore for FileLeafStore {
    fn persist(&self, tag: &str, path_id: &str, record: &StrategyRecord) -> Result<()> {
        let file_name = Self::file_name(tag, path_id);
        let temp_path = self.dir.join(format!(".{}.tmp", file_name));

        let mut writer = BufWriter::new(File::create(&temp_path)?);
        serde_json::to_writer(&mut writer, record)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, self.dir.join(file_name))?;
        Ok(())
    }

    fn count(&self, tag: &str) -> Result<u64> {
        Ok(self.leaf_files(tag)?.len() as u64)
    }

    fn load_all(&self, tag: &str) -> Result<Vec<(String, StrategyRecord)>> {
        self.leaf_files(tag)?
            .into_par_iter()
            .map(|(path_id, path)| -> Result<(String, StrategyRecord)> {
                let reader = BufReader::new(File::open(&path)?);
                let record: StrategyRecord = serde_json::from_reader(reader)?;
                Ok((path_id, record))
            })
            .collect()
    }

    fn clear(&self, tag: &str) -> Result<()> {
        let stale = self.leaf_files(tag)?;
        debug!("removing {} stale leaves for tag {}", stale.len(), tag);

        for (_, path) in stale {
            fs::remove_file(path)?;
        }

        Ok(())
    }
}

/// Leaves held in memory; for single-process runs and tests.
#[derive(Default)]
pub struct MemoryLeafStore {
    leaves: Mutex<BTreeMap<(String, String), StrategyRecord>>,
}

impl MemoryLeafStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<(String, String), StrategyRecord>> {
        self.leaves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LeafStore for MemoryLeafStore {
    fn persist(&self, tag: &str, path_id: &str, record: &StrategyRecord) -> Result<()> {
        self.lock()
            .insert((tag.to_string(), path_id.to_string()), record.clone());
        Ok(())
    }

    fn count(&self, tag: &str) -> Result<u64> {
        Ok(self.lock().keys().filter(|(t, _)| t == tag).count() as u64)
    }

    fn load_all(&self, tag: &str) -> Result<Vec<(String, StrategyRecord)>> {
        Ok(self
            .lock()
            .iter()
            .filter(|((t, _), _)| t == tag)
            .map(|((_, path_id), record)| (path_id.clone(), record.clone()))
            .collect())
    }

    fn clear(&self, tag: &str) -> Result<()> {
        self.lock().retain(|(t, _), _| t != tag);
        Ok(())
    }
}
