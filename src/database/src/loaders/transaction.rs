use crate::error::Result;
use crate::loaders::{read_json, read_optional_json};
use engine::Transaction;
use std::collections::BTreeMap;
use std::path::Path;

pub type TransactionEntity = Transaction;

pub type FreeTransfersEntity = BTreeMap<u32, u8>;

pub struct TransactionLoader;

impl TransactionLoader {
    pub fn load(dir: &Path) -> Result<Vec<TransactionEntity>> {
        read_json(dir, "transactions")
    }
}

pub struct FreeTransfersLoader;

impl FreeTransfersLoader {
    pub fn load(dir: &Path) -> Result<Option<FreeTransfersEntity>> {
        read_optional_json(dir, "free_transfers")
    }
}
