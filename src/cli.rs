//! GFF annotation cleaner: normalization, duplicate resolution and gene
//! cross-referencing.

use crate::detect::detect_input;
use crate::group::DEFAULT_LOOKAHEAD;
use crate::resolve::DEFAULT_OVERLAP_MARGIN;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug)]
#[clap(
    name = "gffclean",
    version = env!("CARGO_PKG_VERSION"),
    author = "Alejandro Gonzales-Irribarren <alejandrxgzi@gmail.com>",
    about = "GFF annotation cleaner: normalization, duplicate resolution and gene cross-referencing"
)]
pub struct Args {
    /// Cleans a GFF annotation file.
    ///
    /// Start by providing the path to the GFF file with -i/--input file.gff;
    /// gzip-compressed input (file.gff.gz) is also accepted.
    #[clap(
        short = 'i',
        long = "input",
        help = "Path to GFF file",
        value_name = "GFF",
        required = true
    )]
    pub gff: PathBuf,

    /// Output filepath; non-required argument.
    ///
    /// When absent, the output is written next to the input as
    /// <input>_clean.gff. The duplicates/discarded/unresolved files derive
    /// their names from the output path.
    #[clap(
        short = 'o',
        long = "output",
        help = "Path to output GFF file",
        value_name = "GFF"
    )]
    pub output: Option<PathBuf>,

    /// Number of threads to use for parsing; default is the number of
    /// logical CPUs.
    #[clap(
        short = 't',
        long,
        help = "Number of threads",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,

    #[clap(
        long,
        help = "String to prepend to seqname in first column",
        value_name = "STR"
    )]
    pub prepend: Option<String>,

    #[clap(
        long,
        help = "Perform all cleaning operations (equivalent to --clean-score \
                --clean-replace-attributes --clean-exclude-attributes --clean-group)"
    )]
    pub clean: bool,

    #[clap(
        long = "clean-score",
        help = "Replace 'Anc_*' and blanks in the score column with zeroes"
    )]
    pub clean_score: bool,

    #[clap(
        long = "clean-replace-attributes",
        help = "Replace ID, Gene, Parent and Name attribute values with the \
                identifier attribute value, if present"
    )]
    pub clean_replace_attributes: bool,

    #[clap(
        long = "clean-exclude-attributes",
        help = "Remove 'kaks', 'kaks2' and 'ncbi' attributes, if present"
    )]
    pub clean_exclude_attributes: bool,

    #[clap(
        long = "clean-group",
        help = "Group records with the same identifier by rewriting 'ID' \
                attributes to '<prefix>:<identifier>:<n>'"
    )]
    pub clean_group: bool,

    #[clap(
        long = "report-duplicates",
        help = "Report records with duplicated identifiers and write the list \
                to <output>_duplicates.txt with line numbers, chromosome, \
                coordinates and strand"
    )]
    pub report_duplicates: bool,

    #[clap(
        long = "resolve-duplicates",
        help = "Resolve duplicated identifiers by matching against 'best' genes \
                in the supplied mapping file (tab-delimited columns: name, \
                chromosome, start, end, strand); non-matching duplicates are \
                discarded and written to <output>_discarded.gff",
        value_name = "MAPPING"
    )]
    pub mapping_file: Option<PathBuf>,

    #[clap(
        long = "discard-unresolved",
        help = "Also remove duplicates that --resolve-duplicates could not \
                resolve; they are written to <output>_unresolved.gff"
    )]
    pub discard_unresolved: bool,

    #[clap(
        long = "insert-missing",
        help = "Append genes from GENES whose names don't appear in any \
                identifier attribute of the output (defaults to the \
                --resolve-duplicates mapping file)",
        value_name = "GENES",
        num_args = 0..=1
    )]
    pub insert_missing: Option<Option<PathBuf>>,

    #[clap(
        long = "remove-attribute",
        help = "Remove attribute ATTR from all records; repeat to remove \
                several attributes",
        value_name = "ATTR"
    )]
    pub remove_attributes: Vec<String>,

    #[clap(
        long = "strict-attributes",
        help = "Remove attribute items that don't conform to the KEY=VALUE format"
    )]
    pub strict_attributes: bool,

    /// Identifier attribute; default is "SGD".
    #[clap(
        long = "attribute",
        help = "Attribute holding the deduplication identifier",
        value_name = "KEY",
        default_value = "SGD"
    )]
    pub attribute: String,

    #[clap(
        long = "id-prefix",
        help = "Prefix for rewritten ID attributes",
        value_name = "PREFIX",
        default_value = "CDS"
    )]
    pub id_prefix: String,

    #[clap(
        long,
        help = "Grouping lookahead window, in records",
        value_name = "N",
        default_value_t = DEFAULT_LOOKAHEAD
    )]
    pub lookahead: usize,

    #[clap(
        long = "overlap-margin",
        help = "Bases added to each side of a mapping gene's span when \
                testing overlaps",
        value_name = "BASES",
        default_value_t = DEFAULT_OVERLAP_MARGIN
    )]
    pub overlap_margin: u64,

    #[clap(long, help = "Print debugging information")]
    pub debug: bool,
}

impl Args {
    /// Checks all the arguments for validity using validate_args()
    pub fn check(&self) -> Result<(), ArgError> {
        self.validate_args()
    }

    /// Checks the input file for validity. The file must exist, be
    /// non-empty and carry a GFF extension.
    fn check_input(&self) -> Result<(), ArgError> {
        if !self.gff.exists() {
            let err = format!("file {:?} does not exist", self.gff);
            Err(ArgError::InvalidInput(err))
        } else if std::fs::metadata(&self.gff).map(|m| m.len() == 0).unwrap_or(true) {
            let err = format!("file {:?} is empty", self.gff);
            Err(ArgError::InvalidInput(err))
        } else if let Err(e) = detect_input(&self.gff) {
            Err(ArgError::InvalidInput(e.to_string()))
        } else {
            Ok(())
        }
    }

    /// Checks that the mapping and gene files, where given, exist.
    fn check_mapping(&self) -> Result<(), ArgError> {
        for path in [
            self.mapping_file.as_ref(),
            self.insert_missing.as_ref().and_then(|g| g.as_ref()),
        ]
        .into_iter()
        .flatten()
        {
            if !path.exists() {
                let err = format!("file {:?} does not exist", path);
                return Err(ArgError::InvalidMapping(err));
            }
        }
        Ok(())
    }

    /// Checks the number of threads for validity. The number of threads must
    /// be greater than 0 and less than or equal to the number of logical CPUs.
    fn check_threads(&self) -> Result<(), ArgError> {
        if self.threads == 0 {
            let err = "number of threads must be greater than 0".to_string();
            Err(ArgError::InvalidThreads(err))
        } else if self.threads > num_cpus::get() {
            let err = "number of threads must be less than or equal to the number of logical CPUs"
                .to_string();
            Err(ArgError::InvalidThreads(err))
        } else {
            Ok(())
        }
    }

    fn validate_args(&self) -> Result<(), ArgError> {
        self.check_input()?;
        self.check_mapping()?;
        self.check_threads()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ArgError {
    /// The input file does not exist or is not a GFF file.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A mapping or gene file does not exist.
    #[error("Invalid mapping file: {0}")]
    InvalidMapping(String),

    /// The number of threads is invalid.
    #[error("Invalid number of threads: {0}")]
    InvalidThreads(String),
}
