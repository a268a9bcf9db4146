use crate::cli::Args;
use crate::group::DEFAULT_LOOKAHEAD;
use crate::resolve::DEFAULT_OVERLAP_MARGIN;
use std::path::PathBuf;

/// Normalized configuration for a cleaning run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Input GFF path (plain or gzip-compressed).
    pub input: PathBuf,
    /// Output GFF path; derived from the input when absent.
    pub output: Option<PathBuf>,
    /// Number of threads to use for parsing.
    pub threads: usize,
    /// String to prepend to every seqname.
    pub prepend: Option<String>,
    /// Replace blank/`Anc_*` score values with zeroes.
    pub clean_score: bool,
    /// Copy the identifier value over ID/Gene/Parent/Name attributes.
    pub replace_attributes: bool,
    /// Drop the kaks/kaks2/ncbi attributes.
    pub exclude_attributes: bool,
    /// Rewrite ID attributes to mark identifier groups.
    pub group_ids: bool,
    /// Write the duplicate report file.
    pub report_duplicates: bool,
    /// Mapping file for duplicate resolution.
    pub mapping_file: Option<PathBuf>,
    /// Also remove records of unresolved duplicate sets.
    pub discard_unresolved: bool,
    /// Append canonical genes missing from the output.
    pub insert_missing: bool,
    /// Gene file for insertion; falls back to `mapping_file`.
    pub gene_file: Option<PathBuf>,
    /// Arbitrary attributes to remove from every record.
    pub remove_attributes: Vec<String>,
    /// Drop keyless attribute items.
    pub strict_attributes: bool,
    /// Attribute holding the deduplication identifier.
    pub id_attribute: String,
    /// Prefix for rewritten ID attributes.
    pub id_prefix: String,
    /// Grouping lookahead window, in records.
    pub lookahead: usize,
    /// Overlap margin, in bases.
    pub overlap_margin: u64,
}

impl Config {
    /// A config with defaults and no operations enabled; the usual starting
    /// point for library callers and tests.
    pub fn for_input(input: PathBuf) -> Self {
        Self {
            input,
            output: None,
            threads: 1,
            prepend: None,
            clean_score: false,
            replace_attributes: false,
            exclude_attributes: false,
            group_ids: false,
            report_duplicates: false,
            mapping_file: None,
            discard_unresolved: false,
            insert_missing: false,
            gene_file: None,
            remove_attributes: Vec::new(),
            strict_attributes: false,
            id_attribute: "SGD".to_string(),
            id_prefix: "CDS".to_string(),
            lookahead: DEFAULT_LOOKAHEAD,
            overlap_margin: DEFAULT_OVERLAP_MARGIN,
        }
    }

    /// Builds a run config from CLI arguments. `--clean` expands to the four
    /// individual cleaning operations.
    pub fn from_args(args: &Args) -> Self {
        Self {
            input: args.gff.clone(),
            output: args.output.clone(),
            threads: args.threads,
            prepend: args.prepend.clone(),
            clean_score: args.clean || args.clean_score,
            replace_attributes: args.clean || args.clean_replace_attributes,
            exclude_attributes: args.clean || args.clean_exclude_attributes,
            group_ids: args.clean || args.clean_group,
            report_duplicates: args.report_duplicates,
            mapping_file: args.mapping_file.clone(),
            discard_unresolved: args.discard_unresolved,
            insert_missing: args.insert_missing.is_some(),
            gene_file: args.insert_missing.clone().flatten(),
            remove_attributes: args.remove_attributes.clone(),
            strict_attributes: args.strict_attributes,
            id_attribute: args.attribute.clone(),
            id_prefix: args.id_prefix.clone(),
            lookahead: args.lookahead,
            overlap_margin: args.overlap_margin,
        }
    }
}
