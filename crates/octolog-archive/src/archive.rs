//! Partition file management: identifier recovery and durable appends.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use octolog_types::{DayKey, MonthKey, PartitionRecord};

use crate::error::{Error, Result};

/// The partition file store.
///
/// Owns the output directory and maps partition keys to file paths:
/// `live_data_<YYYY-MM-DD>.csv` for daily partitions and
/// `month_<MonthName>_<YYYY>.csv` for monthly ones. These names are the
/// dashboard's read contract and must stay stable.
#[derive(Debug, Clone)]
pub struct Archive {
    dir: PathBuf,
}

impl Archive {
    /// An archive rooted at `dir`. The directory is created on first append.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the daily partition file for `key`.
    #[must_use]
    pub fn daily_path(&self, key: &DayKey) -> PathBuf {
        self.dir.join(format!("live_data_{key}.csv"))
    }

    /// Path of the monthly partition file for `key`.
    #[must_use]
    pub fn monthly_path(&self, key: &MonthKey) -> PathBuf {
        self.dir.join(format!("month_{key}.csv"))
    }

    /// Highest `daily_id` previously appended to the partition for `key`,
    /// or 0 if its file does not exist or holds no parseable rows.
    pub fn recover_daily_max(&self, key: &DayKey) -> Result<u64> {
        recover_max(&self.daily_path(key), |record| record.daily_id)
    }

    /// Highest `monthly_id` previously appended to the partition for
    /// `key`, or 0 if its file does not exist or holds no parseable rows.
    pub fn recover_monthly_max(&self, key: &MonthKey) -> Result<u64> {
        recover_max(&self.monthly_path(key), |record| record.monthly_id)
    }

    /// Append a batch to the daily partition for `key`.
    pub fn append_daily(&self, key: &DayKey, records: &[PartitionRecord]) -> Result<()> {
        self.append(&self.daily_path(key), records)
    }

    /// Append a batch to the monthly partition for `key`.
    pub fn append_monthly(&self, key: &MonthKey, records: &[PartitionRecord]) -> Result<()> {
        self.append(&self.monthly_path(key), records)
    }

    /// Append a batch of rows to a partition file, writing the header iff
    /// the file does not exist yet.
    ///
    /// The whole batch is serialized up front and lands in one write,
    /// followed by `sync_all`; success therefore means every row of the
    /// batch is durable. On any error no success is reported and the
    /// caller must not purge the source rows.
    fn append(&self, path: &Path, records: &[PartitionRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| Error::CreateDirectory {
            path: self.dir.clone(),
            source: e,
        })?;

        let write_header = !path.exists();
        let mut buf = Vec::new();
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(write_header)
                .from_writer(&mut buf);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(&buf)?;
        file.sync_all()?;

        debug!(
            "Appended {} rows to {} (header: {})",
            records.len(),
            path.display(),
            write_header
        );
        Ok(())
    }

    /// Parse every row of a partition file.
    ///
    /// Strict: a malformed row is an error. Use this for intact files;
    /// identifier recovery has its own tolerant scan.
    pub fn read_records(&self, path: &Path) -> Result<Vec<PartitionRecord>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for row in reader.deserialize::<PartitionRecord>() {
            records.push(row?);
        }
        Ok(records)
    }
}

/// Tolerant full scan for the highest assigned identifier.
///
/// A crash can leave a torn last line; any row that fails to parse is
/// skipped rather than corrupting the recovered value. Scanning the whole
/// file (instead of trusting the last line) keeps recovery correct even
/// if rows were ever appended out of order.
fn recover_max(path: &Path, id_of: impl Fn(&PartitionRecord) -> u64) -> Result<u64> {
    if !path.exists() {
        return Ok(0);
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut max = 0u64;
    let mut skipped = 0usize;
    for row in reader.deserialize::<PartitionRecord>() {
        match row {
            Ok(record) => max = max.max(id_of(&record)),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} unparseable row(s) while recovering ids from {}",
            skipped,
            path.display()
        );
    }
    Ok(max)
}
