use crate::detect::{detect_input, Compression};
use crate::error::Result;
use crate::gff::{GffRecord, RecordError};
use flate2::read::MultiGzDecoder;
use hashbrown::HashSet;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// An input data line that could not be parsed into a record.
///
/// Skipped lines are collected and reported in aggregate; they never abort
/// a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    pub lineno: usize,
    pub reason: RecordError,
}

/// Array-backed store of annotation records in original file order.
///
/// Indices into the store are stable for the duration of the grouping,
/// classification and resolution stages; removal and insertion happen only
/// afterwards, in the reconciliation stage.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<GffRecord>,
    headers: Vec<String>,
}

impl RecordStore {
    pub fn from_records(records: Vec<GffRecord>) -> Self {
        Self {
            records,
            headers: Vec::new(),
        }
    }

    /// Reads a GFF file (plain or gzip-compressed) into a store.
    ///
    /// Returns the store together with the lines that failed to parse.
    pub fn read(path: &Path) -> Result<(Self, Vec<SkippedLine>)> {
        let compression = detect_input(path)?;
        let mut contents = String::new();
        match compression {
            Compression::Gzip => {
                MultiGzDecoder::new(File::open(path)?).read_to_string(&mut contents)?;
            }
            Compression::None => {
                File::open(path)?.read_to_string(&mut contents)?;
            }
        }
        Ok(Self::parse(&contents))
    }

    /// Parses in-memory GFF contents. Leading `#`/`##` lines are preserved
    /// as headers; interior comments and blank lines are dropped.
    pub fn parse(contents: &str) -> (Self, Vec<SkippedLine>) {
        let mut headers = Vec::new();
        let mut data: Vec<(usize, &str)> = Vec::new();
        let mut in_header = true;

        for (i, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('#') {
                if in_header {
                    headers.push(line.to_string());
                } else {
                    log::debug!("dropping interior comment at line {}", i + 1);
                }
                continue;
            }
            in_header = false;
            data.push((i + 1, line));
        }

        let parsed: Vec<(usize, std::result::Result<GffRecord, RecordError>)> = data
            .par_iter()
            .map(|&(lineno, line)| (lineno, GffRecord::parse(line, lineno)))
            .collect();

        let mut records = Vec::with_capacity(parsed.len());
        let mut skipped = Vec::new();
        for (lineno, result) in parsed {
            match result {
                Ok(record) => records.push(record),
                Err(reason) => skipped.push(SkippedLine { lineno, reason }),
            }
        }

        (Self { records, headers }, skipped)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[GffRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [GffRecord] {
        &mut self.records
    }

    pub fn get(&self, index: usize) -> &GffRecord {
        &self.records[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut GffRecord {
        &mut self.records[index]
    }

    /// Appends a record at the end of the store.
    pub fn push(&mut self, record: GffRecord) {
        self.records.push(record);
    }

    /// Removes the records at `drop`, keeping the survivors in order.
    /// Returns the removed records in their original order.
    pub fn remove(&mut self, drop: &HashSet<usize>) -> Vec<GffRecord> {
        let old = std::mem::take(&mut self.records);
        let mut removed = Vec::with_capacity(drop.len());
        for (i, record) in old.into_iter().enumerate() {
            if drop.contains(&i) {
                removed.push(record);
            } else {
                self.records.push(record);
            }
        }
        removed
    }

    /// Writes headers and records back out as GFF.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(256 * 1024, file);
        for header in &self.headers {
            writeln!(writer, "{}", header)?;
        }
        for record in &self.records {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
