//! # gffclean
//!
//! GFF annotation cleaner: normalization, duplicate resolution and gene
//! cross-referencing.
//!
//! The library reads a GFF file into an in-memory record store, applies
//! generic record rewrites (score normalization, attribute replacement and
//! removal), groups records sharing an identifier attribute into gene
//! models with a bounded lookahead for interleaved rows, classifies
//! duplicated identifiers as trivial or true duplicates, resolves true
//! duplicates against an external list of 'best' genes by name, chromosome,
//! strand and positional overlap, and reconciles the result by discarding
//! losing duplicates and appending canonical genes that are missing
//! altogether.
//!
//! ## Usage
//!
//! ```rust, ignore
//! use gffclean::{run, Config};
//! use std::path::PathBuf;
//!
//! let mut config = Config::for_input(PathBuf::from("annotations.gff"));
//! config.clean_score = true;
//! config.replace_attributes = true;
//! config.exclude_attributes = true;
//! config.group_ids = true;
//! config.mapping_file = Some(PathBuf::from("best_genes.txt"));
//!
//! let stats = run(&config)?;
//! println!("{} duplicates, {} resolved", stats.duplicates, stats.resolved);
//! ```
//!
//! The per-stage building blocks ([`store::RecordStore`],
//! [`group::group_records`], [`duplicates::classify`],
//! [`resolve::resolve_duplicates`], [`reconcile::reconcile`]) are public
//! for callers that want to drive the pipeline themselves.

pub mod clean;
pub mod cli;
pub mod config;
pub mod detect;
pub mod duplicates;
pub mod error;
pub mod gff;
pub mod group;
pub mod mapping;
pub mod memory;
pub mod reconcile;
pub mod resolve;
pub mod store;

pub use clean::{run, CleanStats};
pub use cli::Args;
pub use config::Config;
pub use error::{GffCleanError, Result};
pub use memory::max_mem_usage_mb;
