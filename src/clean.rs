use crate::config::Config;
use crate::duplicates::{classify, DuplicateReport};
use crate::error::{GffCleanError, Result};
use crate::gff::GffRecord;
use crate::group::{group_records, GroupOptions};
use crate::mapping::{GeneTable, MappingSkip};
use crate::memory::max_mem_usage_mb;
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::resolve::{resolve_duplicates, ResolveOutcome, UnresolvedReason};
use crate::store::{RecordStore, SkippedLine};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Attributes rewritten from the identifier value by
/// `--clean-replace-attributes`.
const REPLACE_KEYS: [&str; 4] = ["ID", "Gene", "Parent", "Name"];

/// Attributes dropped by `--clean-exclude-attributes`.
const EXCLUDE_KEYS: [&str; 3] = ["kaks", "kaks2", "ncbi"];

/// Summary statistics for a cleaning run.
#[derive(Debug, Clone)]
pub struct CleanStats {
    /// Wall clock time spent in the run.
    pub elapsed: Duration,
    /// Delta in maximum RSS memory usage, in MB.
    pub mem_delta_mb: f64,
    /// Records read from the input.
    pub records: usize,
    /// Malformed input lines that were skipped.
    pub skipped: usize,
    /// Duplicated identifiers found.
    pub duplicates: usize,
    /// Duplicates that collapsed into a single group.
    pub trivial_duplicates: usize,
    /// Duplicate sets resolved against the mapping file.
    pub resolved: usize,
    /// Duplicate sets left unresolved.
    pub unresolved: usize,
    /// Records removed by resolution (and the unresolved policy).
    pub discarded: usize,
    /// Missing canonical genes appended to the output.
    pub inserted: usize,
    /// Path of the cleaned GFF.
    pub output: PathBuf,
}

/// Runs the whole cleaning pipeline with the provided configuration.
///
/// Stages, in order: read, generic record rewrites, grouping (with optional
/// ID rewrite), duplicate classification/report, resolution against the
/// mapping file, reconciliation (discards + insert-missing), write.
///
/// # Errors
///
/// Configuration errors (missing mapping source, unsupported extension) and
/// I/O failures abort the run; malformed records and mapping rows do not.
pub fn run(config: &Config) -> Result<CleanStats> {
    let start = Instant::now();
    let start_mem = max_mem_usage_mb();

    // a missing mapping source is fatal before anything is read
    if config.insert_missing && config.gene_file.is_none() && config.mapping_file.is_none() {
        return Err(GffCleanError::MissingMappingFile("--insert-missing"));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let paths = OutputPaths::from_config(config);
    log::info!("Input : {}", config.input.display());
    log::info!("Output: {}", paths.output.display());

    let (mut store, skipped_lines) = pool.install(|| RecordStore::read(&config.input))?;
    report_skipped_lines(&skipped_lines);
    let records_read = store.len();

    if let Some(prefix) = &config.prepend {
        log::info!("Prepending '{}' to values in the seqname column", prefix);
        prepend_seqname(&mut store, prefix);
    }
    if config.clean_score {
        let unexpected = clean_score(&mut store);
        if !unexpected.is_empty() {
            log::warn!(
                "{} score values that are not '', 0 or 'Anc_*': {}",
                unexpected.len(),
                unexpected.join(", ")
            );
        }
    }
    if config.replace_attributes {
        replace_attributes(&mut store, &REPLACE_KEYS, &config.id_attribute);
    }
    if config.exclude_attributes {
        exclude_attributes(&mut store, &EXCLUDE_KEYS);
    }
    if !config.remove_attributes.is_empty() {
        exclude_attributes(&mut store, &config.remove_attributes);
    }
    if config.strict_attributes {
        strip_nokeys(&mut store);
    }

    let set = group_records(
        &mut store,
        &GroupOptions {
            key: &config.id_attribute,
            prefix: &config.id_prefix,
            lookahead: config.lookahead,
            rewrite_ids: config.group_ids,
        },
    );
    let report = classify(&set);

    if config.report_duplicates {
        log::info!(
            "Writing duplicate {} names to {}",
            config.id_attribute,
            paths.duplicates.display()
        );
        write_duplicate_report(&paths.duplicates, &report, &store)?;
        log::info!(
            "{} duplicates found (of which {} are trivial)",
            report.total(),
            report.trivial()
        );
    }

    let mut mapping_table: Option<GeneTable> = None;
    let outcome: Option<ResolveOutcome> = match &config.mapping_file {
        Some(path) => {
            log::info!("Resolving duplicates using data from {}", path.display());
            let (table, bad_rows) = GeneTable::load(path)?;
            report_mapping_skips(path, &bad_rows);
            let outcome =
                resolve_duplicates(&store, &set, &report, &table, config.overlap_margin);
            log_resolution(&report, &outcome);
            mapping_table = Some(table);
            Some(outcome)
        }
        None => None,
    };

    let gene_table: Option<GeneTable> = if config.insert_missing {
        match &config.gene_file {
            Some(path) => {
                log::info!("Inserting unmatched genes from {}", path.display());
                let (table, bad_rows) = GeneTable::load(path)?;
                report_mapping_skips(path, &bad_rows);
                Some(table)
            }
            None => mapping_table.take(),
        }
    } else {
        None
    };

    let summary = reconcile(
        &mut store,
        outcome.as_ref(),
        &ReconcileOptions {
            discard_unresolved: config.discard_unresolved,
            insert_from: gene_table.as_ref(),
            key: &config.id_attribute,
        },
    );

    if outcome.is_some() {
        log::info!(
            "Writing {} discarded records to {}",
            summary.discarded.len(),
            paths.discarded.display()
        );
        write_records(&paths.discarded, &summary.discarded)?;
        if config.discard_unresolved {
            log::info!(
                "Writing {} unresolved records to {}",
                summary.unresolved.len(),
                paths.unresolved.display()
            );
            write_records(&paths.unresolved, &summary.unresolved)?;
        }
    }
    if config.insert_missing {
        log::info!("Inserted {} missing genes", summary.inserted);
    }

    store.write(&paths.output)?;

    Ok(CleanStats {
        elapsed: start.elapsed(),
        mem_delta_mb: (max_mem_usage_mb() - start_mem).max(0.0),
        records: records_read,
        skipped: skipped_lines.len(),
        duplicates: report.total(),
        trivial_duplicates: report.trivial(),
        resolved: outcome.as_ref().map_or(0, ResolveOutcome::resolved_count),
        unresolved: outcome.as_ref().map_or(0, ResolveOutcome::unresolved_count),
        discarded: summary.discarded.len() + summary.unresolved.len(),
        inserted: summary.inserted,
        output: paths.output,
    })
}

/// Prefixes every seqname with `prefix`.
pub fn prepend_seqname(store: &mut RecordStore, prefix: &str) {
    for record in store.records_mut() {
        record.seqname = format!("{}{}", prefix, record.seqname);
    }
}

/// Replaces blank and `Anc_*` score values with `"0"`; returns the sorted
/// distinct values that were neither blank, zero nor `Anc_*`.
pub fn clean_score(store: &mut RecordStore) -> Vec<String> {
    let mut unexpected = BTreeSet::new();
    for record in store.records_mut() {
        match record.score.trim().parse::<f64>() {
            Ok(score) => {
                if score != 0.0 {
                    unexpected.insert(record.score.clone());
                }
            }
            Err(_) => {
                if record.score.starts_with("Anc_") || record.score.trim().is_empty() {
                    record.score = "0".to_string();
                } else {
                    unexpected.insert(record.score.clone());
                }
            }
        }
    }
    unexpected.into_iter().collect()
}

/// Copies the value of `source` over each of `keys`, for keys the record
/// already carries. Blank source values never overwrite existing data.
pub fn replace_attributes(store: &mut RecordStore, keys: &[&str], source: &str) {
    for record in store.records_mut() {
        let value = record.attributes.get(source).map(str::to_string);
        for &key in keys {
            if !record.attributes.contains(key) {
                continue;
            }
            match &value {
                Some(v) if !v.is_empty() => record.attributes.set(key, v.clone()),
                Some(_) => {
                    log::debug!("not replacing '{}' with empty '{}' value", key, source)
                }
                None => log::warn!(
                    "cannot update attribute '{}': replacement attribute '{}' not found",
                    key,
                    source
                ),
            }
        }
    }
}

/// Removes each of `keys` from every record's attributes.
pub fn exclude_attributes<S: AsRef<str>>(store: &mut RecordStore, keys: &[S]) {
    for record in store.records_mut() {
        for key in keys {
            record.attributes.remove(key.as_ref());
        }
    }
}

/// Drops keyless attribute items from every record.
pub fn strip_nokeys(store: &mut RecordStore) {
    for record in store.records_mut() {
        record.attributes.clear_nokeys();
    }
}

/// Output file paths derived from the configuration.
#[derive(Debug, Clone, PartialEq)]
struct OutputPaths {
    output: PathBuf,
    duplicates: PathBuf,
    discarded: PathBuf,
    unresolved: PathBuf,
}

impl OutputPaths {
    fn from_config(config: &Config) -> Self {
        let output = config.output.clone().unwrap_or_else(|| {
            config
                .input
                .with_file_name(format!("{}_clean.gff", input_stem(&config.input)))
        });
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
            .to_string();
        Self {
            duplicates: output.with_file_name(format!("{}_duplicates.txt", stem)),
            discarded: output.with_file_name(format!("{}_discarded.gff", stem)),
            unresolved: output.with_file_name(format!("{}_unresolved.gff", stem)),
            output,
        }
    }
}

/// Input file stem with `.gff`/`.gff3` (and a trailing `.gz`) removed.
fn input_stem(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("input");
    let inner = Path::new(stem);
    match inner.extension().and_then(|e| e.to_str()) {
        Some("gff") | Some("gff3") => inner
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(stem)
            .to_string(),
        _ => stem.to_string(),
    }
}

fn report_skipped_lines(skipped: &[SkippedLine]) {
    if skipped.is_empty() {
        return;
    }
    log::warn!("{} malformed records skipped:", skipped.len());
    for line in skipped {
        log::warn!("  L{}: {}", line.lineno, line.reason);
    }
}

fn report_mapping_skips(path: &Path, skipped: &[MappingSkip]) {
    for skip in skipped {
        log::warn!(
            "bad mapping row at L{} in {} ({}), skipped",
            skip.lineno,
            path.display(),
            skip.reason
        );
    }
}

fn log_resolution(report: &DuplicateReport, outcome: &ResolveOutcome) {
    log::info!(
        "Total number of duplicated identifiers: {}",
        report.total()
    );
    log::info!("Number of resolved duplicate sets     : {}", outcome.resolved_count());
    log::info!("Unresolved duplicates:");
    log::info!(
        "* No mapping genes with same name     : {}",
        outcome.reason_count(UnresolvedReason::NoMappingGenes)
    );
    log::info!(
        "* No mapping genes with same chr/str  : {}",
        outcome.reason_count(UnresolvedReason::NoChromStrandMatch)
    );
    log::info!(
        "* No mapping genes with overlap       : {}",
        outcome.reason_count(UnresolvedReason::NoOverlaps)
    );
    log::info!(
        "* Multiple mapping genes match        : {}",
        outcome.reason_count(UnresolvedReason::MultipleMatches)
    );
}

/// Writes records as GFF lines, one per record.
fn write_records(path: &Path, records: &[GffRecord]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{}", record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the duplicate report: one line per duplicated identifier with a
/// `L<line>;<seqname>;<start>;<end>;<strand>` reference per member record.
fn write_duplicate_report(
    path: &Path,
    report: &DuplicateReport,
    store: &RecordStore,
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    if report.entries.is_empty() {
        writeln!(writer, "No duplicate identifiers")?;
    }
    for entry in &report.entries {
        write!(writer, "{}\t", entry.identifier)?;
        for &i in &entry.records {
            let record = store.get(i);
            write!(
                writer,
                "\tL{};{};{};{};{}",
                record.lineno, record.seqname, record.start, record.end, record.strand
            )?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
