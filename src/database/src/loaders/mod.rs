mod player;
mod prediction;
mod transaction;

pub use player::*;
pub use prediction::*;
pub use transaction::*;

use crate::error::{DatabaseError, Result};
use flate2::read::GzDecoder;
use log::debug;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Everything the optimizer reads from a data directory.
#[derive(Debug, Clone, Default)]
pub struct DatabaseEntity {
    pub players: Vec<PlayerEntity>,
    pub predictions: Vec<PredictionEntity>,
    pub transactions: Vec<TransactionEntity>,
    /// Gameweek -> free transfers, overriding the count derived from history
    pub free_transfers: Option<FreeTransfersEntity>,
}

pub struct DatabaseLoader;

impl DatabaseLoader {
    pub fn load(dir: &Path) -> Result<DatabaseEntity> {
        let data = DatabaseEntity {
            players: PlayerLoader::load(dir)?,
            predictions: PredictionLoader::load(dir)?,
            transactions: TransactionLoader::load(dir)?,
            free_transfers: FreeTransfersLoader::load(dir)?,
        };

        debug!(
            "loaded {} players, {} predictions, {} transactions from {}",
            data.players.len(),
            data.predictions.len(),
            data.transactions.len(),
            dir.display()
        );

        Ok(data)
    }
}

/// Reads `<name>.json`, falling back to the gzip-compressed `<name>.json.gz`.
pub(crate) fn read_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T> {
    read_optional_json(dir, name)?.ok_or_else(|| DatabaseError::MissingFile(dir.join(format!("{}.json", name))))
}

pub(crate) fn read_optional_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Option<T>> {
    let plain = dir.join(format!("{}.json", name));
    if plain.is_file() {
        let reader = BufReader::new(File::open(&plain)?);
        return Ok(Some(serde_json::from_reader(reader)?));
    }

    let compressed: PathBuf = dir.join(format!("{}.json.gz", name));
    if compressed.is_file() {
        let reader = BufReader::new(GzDecoder::new(File::open(&compressed)?));
        return Ok(Some(serde_json::from_reader(reader)?));
    }

    Ok(None)
}
