//! Append-only storage for precomputed pair distances.
//!
//! The CSV layout is one row per attempted ordered pair:
//!
//! ```text
//! source,target,distance,path
//! 1,4,412.5,1 2 3 4
//! 4,1,unreachable,unreachable
//! ```
//!
//! A missing row means the pair was never attempted; an `unreachable` row
//! means it was attempted and failed.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::graph::NodeId;

/// Sentinel written in place of a distance and a path for failed pairs.
pub const UNREACHABLE: &str = "unreachable";

const HEADER_LINE: &str = "source,target,distance,path\n";

/// Result of one attempted pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PairOutcome {
    /// A* found a path.
    Reachable {
        /// Path cost.
        distance: f64,
        /// Nodes from source to target inclusive.
        path: Vec<NodeId>,
    },
    /// The search failed for any reason.
    Unreachable,
}

/// One persisted precompute row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheRecord {
    /// Origin node.
    pub source: NodeId,
    /// Destination node.
    pub target: NodeId,
    /// Distance and path, or the unreachable sentinel.
    pub outcome: PairOutcome,
}

impl CacheRecord {
    /// A successfully computed pair.
    pub fn reachable(source: NodeId, target: NodeId, distance: f64, path: Vec<NodeId>) -> Self {
        Self {
            source,
            target,
            outcome: PairOutcome::Reachable { distance, path },
        }
    }

    /// A pair whose search failed.
    pub fn unreachable(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            outcome: PairOutcome::Unreachable,
        }
    }

    /// The `(source, target)` key, unique within a store.
    pub fn key(&self) -> (NodeId, NodeId) {
        (self.source, self.target)
    }

    /// Distance, if the pair was reachable.
    pub fn distance(&self) -> Option<f64> {
        match self.outcome {
            PairOutcome::Reachable { distance, .. } => Some(distance),
            PairOutcome::Unreachable => None,
        }
    }
}

/// Durable, append-only sink for precompute rows.
///
/// Implementations must make appended rows durable before `append`
/// returns. A store must not be written by more than one run at a time;
/// nothing here enforces that.
pub trait DistanceStore {
    /// Keys of every pair already persisted, reachable or not.
    fn completed_pairs(&self) -> Result<HashSet<(NodeId, NodeId)>, StoreError>;

    /// Persists `records` after the existing ones.
    fn append(&mut self, records: &[CacheRecord]) -> Result<(), StoreError>;

    /// Discards every persisted row.
    fn reset(&mut self) -> Result<(), StoreError>;
}

/// A [`DistanceStore`] backed by a CSV file.
///
/// Each `append` opens the file in append mode, writes the rows, flushes
/// and `fsync`s, so a crash loses at most the rows of the append in
/// progress. Only newline-terminated lines count: a torn last line left by
/// such a crash (a torn header included) is ignored on read and cut off
/// before the next append.
///
/// # Examples
///
/// ```
/// use u_roadnet::distance::{CacheRecord, CsvDistanceStore, DistanceStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut store = CsvDistanceStore::new(dir.path().join("distances.csv"));
/// store
///     .append(&[CacheRecord::reachable(1, 2, 10.0, vec![1, 2]), CacheRecord::unreachable(2, 1)])
///     .unwrap();
///
/// let pairs = store.completed_pairs().unwrap();
/// assert!(pairs.contains(&(1, 2)) && pairs.contains(&(2, 1)));
/// assert_eq!(store.load_records().unwrap()[0].distance(), Some(10.0));
/// ```
#[derive(Debug, Clone)]
pub struct CsvDistanceStore {
    path: PathBuf,
}

impl CsvDistanceStore {
    /// A store at `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every well-formed row in file order.
    ///
    /// Malformed rows are logged and skipped. A missing file reads as empty.
    /// An unterminated last line is never read.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnexpectedHeader`] if the first complete line is not the
    /// store header.
    pub fn load_records(&self) -> Result<Vec<CacheRecord>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let durable = terminated_prefix(&bytes);
        if durable.len() < bytes.len() {
            warn!("ignoring unterminated last line in {}", self.path.display());
        }
        if durable.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(durable);
        let headers = reader.headers()?;
        if !headers.iter().eq(HEADER_LINE.trim_end().split(',')) {
            return Err(StoreError::UnexpectedHeader {
                found: headers.iter().collect::<Vec<_>>().join(","),
            });
        }

        let mut records = Vec::new();
        for (n, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row_number = n as u64 + 1;
            let parsed = row
                .map_err(|e| StoreError::MalformedRow {
                    row: row_number,
                    message: e.to_string(),
                })
                .and_then(|row| row.into_record(row_number));
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!("skipping row in {}: {e}", self.path.display()),
            }
        }
        Ok(records)
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl DistanceStore for CsvDistanceStore {
    fn completed_pairs(&self) -> Result<HashSet<(NodeId, NodeId)>, StoreError> {
        Ok(self.load_records()?.iter().map(CacheRecord::key).collect())
    }

    fn append(&mut self, records: &[CacheRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        self.ensure_parent()?;
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        let len = file.metadata()?.len();
        let durable = terminated_len(&mut file, len)?;
        if durable < len {
            warn!(
                "cutting {} unterminated bytes from {}",
                len - durable,
                self.path.display()
            );
            file.set_len(durable)?;
        }
        if durable == 0 {
            file.seek(SeekFrom::Start(0))?;
            file.write_all(HEADER_LINE.as_bytes())?;
        } else {
            check_header_line(&mut file)?;
            file.seek(SeekFrom::Start(durable))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in records {
            writer.serialize(CsvRow::from(record))?;
        }
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_data()?;

        debug!("appended {} rows to {}", records.len(), self.path.display());
        Ok(())
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        self.ensure_parent()?;
        File::create(&self.path)?.sync_all()?;
        Ok(())
    }
}

/// The bytes up to and including the last newline.
fn terminated_prefix(bytes: &[u8]) -> &[u8] {
    match bytes.iter().rposition(|&b| b == b'\n') {
        Some(i) => &bytes[..=i],
        None => &[],
    }
}

/// Length of the file up to and including its last newline, scanning
/// backwards from `len`.
fn terminated_len(file: &mut File, len: u64) -> Result<u64, StoreError> {
    let mut buf = [0u8; 4096];
    let mut end = len;
    while end > 0 {
        let start = end.saturating_sub(buf.len() as u64);
        let block = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(block)?;
        if let Some(i) = block.iter().rposition(|&b| b == b'\n') {
            return Ok(start + i as u64 + 1);
        }
        end = start;
    }
    Ok(0)
}

fn check_header_line(file: &mut File) -> Result<(), StoreError> {
    let mut first = Vec::with_capacity(HEADER_LINE.len());
    file.seek(SeekFrom::Start(0))?;
    (&mut *file)
        .take(HEADER_LINE.len() as u64)
        .read_to_end(&mut first)?;
    if first != HEADER_LINE.as_bytes() {
        let found = String::from_utf8_lossy(&first);
        return Err(StoreError::UnexpectedHeader {
            found: found.lines().next().unwrap_or_default().to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    source: NodeId,
    target: NodeId,
    distance: String,
    path: String,
}

impl From<&CacheRecord> for CsvRow {
    fn from(record: &CacheRecord) -> Self {
        let (distance, path) = match &record.outcome {
            PairOutcome::Reachable { distance, path } => (
                distance.to_string(),
                path.iter()
                    .map(NodeId::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            PairOutcome::Unreachable => (UNREACHABLE.to_string(), UNREACHABLE.to_string()),
        };
        Self {
            source: record.source,
            target: record.target,
            distance,
            path,
        }
    }
}

impl CsvRow {
    fn into_record(self, row: u64) -> Result<CacheRecord, StoreError> {
        let malformed = |message: String| StoreError::MalformedRow { row, message };

        if self.distance == UNREACHABLE {
            return Ok(CacheRecord::unreachable(self.source, self.target));
        }
        let distance: f64 = self
            .distance
            .parse()
            .map_err(|_| malformed(format!("bad distance {:?}", self.distance)))?;
        let path = self
            .path
            .split_whitespace()
            .map(str::parse::<NodeId>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed(format!("bad path {:?}", self.path)))?;
        if path.first() != Some(&self.source) || path.last() != Some(&self.target) {
            return Err(malformed(format!(
                "path does not run from {} to {}",
                self.source, self.target
            )));
        }
        Ok(CacheRecord::reachable(self.source, self.target, distance, path))
    }
}
