mod attr;
mod id;

pub use attr::Attributes;
pub use id::{GffId, IdError};

use std::fmt;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Strand {
    Forward,
    Reverse,
    Unknown,
}

impl Strand {
    pub fn from_symbol(s: &str) -> Self {
        match s.chars().next() {
            Some('+') => Strand::Forward,
            Some('-') => Strand::Reverse,
            _ => Strand::Unknown,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
            Strand::Unknown => write!(f, "."),
        }
    }
}

/// Why a data line could not become a [`GffRecord`].
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RecordError {
    #[error("missing {0} column")]
    Truncated(&'static str),
    #[error("bad start coordinate '{0}'")]
    BadStart(String),
    #[error("bad end coordinate '{0}'")]
    BadEnd(String),
    #[error("end {1} precedes start {0}")]
    InvertedSpan(u64, u64),
}

/// One annotation line of a GFF file.
///
/// Coordinates are kept 1-based inclusive as in the file. `lineno` is the
/// 1-based input line number; synthetic records carry 0.
#[derive(Debug, Clone, PartialEq)]
pub struct GffRecord {
    pub seqname: String,
    pub source: String,
    pub feature: String,
    pub start: u64,
    pub end: u64,
    pub score: String,
    pub strand: Strand,
    pub frame: String,
    pub attributes: Attributes,
    pub lineno: usize,
}

impl GffRecord {
    pub fn parse(line: &str, lineno: usize) -> Result<Self, RecordError> {
        let mut fields = line.splitn(9, '\t');

        let (seqname, source, feature, start, end, score, strand, frame) = (
            fields.next().ok_or(RecordError::Truncated("seqname"))?,
            fields.next().ok_or(RecordError::Truncated("source"))?,
            fields.next().ok_or(RecordError::Truncated("feature"))?,
            fields.next().ok_or(RecordError::Truncated("start"))?,
            fields.next().ok_or(RecordError::Truncated("end"))?,
            fields.next().ok_or(RecordError::Truncated("score"))?,
            fields.next().ok_or(RecordError::Truncated("strand"))?,
            fields.next().ok_or(RecordError::Truncated("frame"))?,
        );

        let start = start
            .parse::<u64>()
            .map_err(|_| RecordError::BadStart(start.to_string()))?;
        let end = end
            .parse::<u64>()
            .map_err(|_| RecordError::BadEnd(end.to_string()))?;
        if end < start {
            return Err(RecordError::InvertedSpan(start, end));
        }

        Ok(Self {
            seqname: seqname.to_string(),
            source: source.to_string(),
            feature: feature.to_string(),
            start,
            end,
            score: score.to_string(),
            strand: Strand::from_symbol(strand),
            frame: frame.to_string(),
            attributes: Attributes::parse(fields.next().unwrap_or("")),
            lineno,
        })
    }

    /// Non-blank value of the identifier attribute `key`, if any.
    pub fn identifier(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).filter(|v| !v.is_empty())
    }
}

impl fmt::Display for GffRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.seqname,
            self.source,
            self.feature,
            self.start,
            self.end,
            self.score,
            self.strand,
            self.frame,
            self.attributes
        )
    }
}
