//! # gffclean
//!
//! GFF annotation cleaner: normalization, duplicate resolution and gene
//! cross-referencing.
//!
//! ## Features
//!
//! - Cleans score and attribute columns the SGD way (blank/`Anc_*` scores,
//!   ID/Gene/Parent/Name replacement, kaks/ncbi removal)
//! - Groups records sharing an identifier into gene models, tolerating
//!   interleaved rows within a bounded lookahead window
//! - Reports duplicated identifiers, split into trivial and true duplicates
//! - Resolves true duplicates against a 'best gene' mapping file using
//!   chromosome, strand and positional overlap
//! - Discards losing and (optionally) unresolved duplicates to separate
//!   output files
//! - Appends canonical genes missing from the annotation
//! - Handles gzip-compressed input
//!
//! ## Usage
//!
//! ```bash
//! gffclean -i <INPUT> [OPTIONS]
//!
//! Required arguments:
//!   -i, --input <GFF>              Path to GFF file
//!
//! Optional arguments:
//!   -o, --output <GFF>             Output path (default: <input>_clean.gff)
//!   -t, --threads <THREADS>        Number of threads (default: CPU count)
//!       --prepend <STR>            Prepend STR to every seqname
//!       --clean                    All cleaning operations
//!       --clean-score              Zero out blank/'Anc_*' scores
//!       --clean-replace-attributes Replace ID/Gene/Parent/Name from the identifier
//!       --clean-exclude-attributes Remove kaks/kaks2/ncbi attributes
//!       --clean-group              Rewrite IDs to group same-identifier records
//!       --report-duplicates        Write <output>_duplicates.txt
//!       --resolve-duplicates <MAPPING>  Resolve duplicates against MAPPING
//!       --discard-unresolved       Also drop unresolved duplicates
//!       --insert-missing [<GENES>] Append genes missing from the annotation
//!       --remove-attribute <ATTR>  Remove ATTR from all records (repeatable)
//!       --strict-attributes        Drop keyless attribute items
//!       --attribute <KEY>          Identifier attribute [default: SGD]
//!       --debug                    Print debugging information
//! ```
//!
//! ## Examples
//!
//! ### Full clean with duplicate resolution
//!
//! ```bash
//! gffclean -i annotations.gff --clean --resolve-duplicates best_genes.txt
//! ```
//!
//! ### Report duplicates only
//!
//! ```bash
//! gffclean -i annotations.gff --report-duplicates
//! ```
//!
//! ### Resolve, drop unresolved and back-fill missing genes
//!
//! ```bash
//! gffclean -i annotations.gff.gz --clean --resolve-duplicates best_genes.txt \
//!     --discard-unresolved --insert-missing
//! ```
use clap::Parser;
use gffclean::{run, Args, Config};
use log::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let level = if args.debug { Level::Debug } else { Level::Info };
    simple_logger::init_with_level(level).unwrap();
    log::debug!("{:?}", args);

    args.check()?;
    let config = Config::from_args(&args);
    log::info!("Using {} threads", config.threads);

    let stats = run(&config)?;
    log::info!(
        "{} records in, {} skipped, {} discarded, {} inserted",
        stats.records,
        stats.skipped,
        stats.discarded,
        stats.inserted
    );
    log::info!("Elapsed: {:.4?} secs", stats.elapsed.as_secs_f32());
    log::info!("Memory: {:.2} MB", stats.mem_delta_mb);

    Ok(())
}
