use crate::gff::{Attributes, GffRecord};
use crate::mapping::{CanonicalGene, GeneTable};
use crate::resolve::ResolveOutcome;
use crate::store::RecordStore;
use hashbrown::HashSet;

/// `source` column value for synthetic records.
const SYNTHETIC_SOURCE: &str = "gffclean";

/// Policy knobs for one reconciliation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions<'a> {
    /// Also remove records of unresolved duplicate sets.
    pub discard_unresolved: bool,
    /// Append missing canonical genes from this table.
    pub insert_from: Option<&'a GeneTable>,
    /// Identifier attribute carried by synthetic records.
    pub key: &'a str,
}

/// Records removed from the store, plus the number of insertions.
#[derive(Debug, Default)]
pub struct ReconcileSummary {
    /// Losing-group records of resolved duplicate sets, input order.
    pub discarded: Vec<GffRecord>,
    /// Removed unresolved-duplicate records, input order. Empty unless
    /// `discard_unresolved` was set.
    pub unresolved: Vec<GffRecord>,
    pub inserted: usize,
}

/// Applies resolution verdicts to the store, then appends canonical genes
/// that are still missing.
///
/// Removal happens in one pass so every record lands in exactly one of:
/// the surviving store, the discarded list, or the unresolved list.
/// Insertion appends one synthetic record per gene-table name that neither
/// appears as an identifier among the survivors nor was consumed by a
/// resolution.
pub fn reconcile(
    store: &mut RecordStore,
    outcome: Option<&ResolveOutcome>,
    opts: &ReconcileOptions,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    if let Some(outcome) = outcome {
        let discard: HashSet<usize> = outcome.discard.iter().copied().collect();
        let mut drop = discard.clone();
        if opts.discard_unresolved {
            drop.extend(outcome.unresolved.iter().copied());
        }
        for (index, record) in drop_records(store, &drop) {
            if discard.contains(&index) {
                summary.discarded.push(record);
            } else {
                summary.unresolved.push(record);
            }
        }
    }

    if let Some(table) = opts.insert_from {
        let consumed = outcome.map(|o| &o.consumed);
        summary.inserted = insert_missing_genes(store, table, consumed, opts.key);
    }

    summary
}

/// Removes `drop` from the store, returning (index, record) pairs in input
/// order.
fn drop_records(store: &mut RecordStore, drop: &HashSet<usize>) -> Vec<(usize, GffRecord)> {
    let mut indices: Vec<usize> = drop.iter().copied().collect();
    indices.sort_unstable();
    let removed = store.remove(drop);
    indices.into_iter().zip(removed).collect()
}

/// Appends a synthetic record for each gene whose name is absent from the
/// store's identifier values and was not consumed by resolution. Names are
/// inserted at most once even when the table repeats them.
fn insert_missing_genes(
    store: &mut RecordStore,
    table: &GeneTable,
    consumed: Option<&HashSet<String>>,
    key: &str,
) -> usize {
    let mut present: HashSet<String> = HashSet::new();
    for record in store.records() {
        if let Some(value) = record.identifier(key) {
            present.insert(value.to_string());
        }
    }
    if let Some(consumed) = consumed {
        present.extend(consumed.iter().cloned());
    }

    let mut inserted = 0;
    for gene in table.genes() {
        if present.contains(&gene.name) {
            continue;
        }
        log::debug!("inserting missing gene '{}'", gene.name);
        present.insert(gene.name.clone());
        store.push(synthetic_record(gene, key));
        inserted += 1;
    }
    inserted
}

/// Builds the minimal gene record for an inserted canonical gene: only the
/// identifying attribute is carried.
fn synthetic_record(gene: &CanonicalGene, key: &str) -> GffRecord {
    let mut attributes = Attributes::new();
    attributes.set(key, gene.name.clone());
    GffRecord {
        seqname: gene.chrom.clone(),
        source: SYNTHETIC_SOURCE.to_string(),
        feature: "gene".to_string(),
        start: gene.start,
        end: gene.end,
        score: "0".to_string(),
        strand: gene.strand,
        frame: ".".to_string(),
        attributes,
        lineno: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gff::Strand;

    const GFF: &str = "\
chr1\tTest\tCDS\t28789\t29049\t0\t-\t0\tID=CDS:YEL0W01:1;SGD=YEL0W01
chr1\tTest\tCDS\t29963\t32155\t0\t-\t0\tID=CDS:YEL0W02:1;SGD=YEL0W02
chr1\tTest\tCDS\t34525\t35262\t0\t-\t0\tID=CDS:YEL0W04:1;SGD=YEL0W04
chr2\tTest\tCDS\t38050\t38120\t0\t-\t0\tID=CDS:YEL0W05:1;SGD=YEL0W05
";

    fn store() -> RecordStore {
        let (store, skipped) = RecordStore::parse(GFF);
        assert!(skipped.is_empty());
        store
    }

    #[test]
    fn test_insert_missing_gene() {
        let mut store = store();
        let (table, _) = GeneTable::parse(
            "\
YEL0W03\tchr1\t32611\t34140\t-
YEL0W05\tchr2\t49195\t49569\t-
",
        );
        let summary = reconcile(
            &mut store,
            None,
            &ReconcileOptions {
                insert_from: Some(&table),
                key: "SGD",
                ..ReconcileOptions::default()
            },
        );

        // YEL0W03 is missing, YEL0W05 is already present
        assert_eq!(summary.inserted, 1);
        assert_eq!(store.len(), 5);
        let synthetic = store.get(4);
        assert_eq!(synthetic.seqname, "chr1");
        assert_eq!(synthetic.feature, "gene");
        assert_eq!(synthetic.source, "gffclean");
        assert_eq!(synthetic.start, 32611);
        assert_eq!(synthetic.end, 34140);
        assert_eq!(synthetic.strand, Strand::Reverse);
        assert_eq!(synthetic.attributes.to_string(), "SGD=YEL0W03");
        assert_eq!(synthetic.lineno, 0);
    }

    #[test]
    fn test_repeated_names_insert_once() {
        let mut store = store();
        let (table, _) = GeneTable::parse(
            "\
YEL0W03\tchr1\t32611\t34140\t-
YEL0W03\tchr1\t50000\t51000\t+
",
        );
        let summary = reconcile(
            &mut store,
            None,
            &ReconcileOptions {
                insert_from: Some(&table),
                key: "SGD",
                ..ReconcileOptions::default()
            },
        );
        assert_eq!(summary.inserted, 1);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_consumed_names_not_reinserted() {
        let mut store = store();
        let (table, _) = GeneTable::parse("YEL0W09\tchr3\t100\t200\t+\n");
        let mut outcome = ResolveOutcome::default();
        outcome.consumed.insert("YEL0W09".to_string());

        let summary = reconcile(
            &mut store,
            Some(&outcome),
            &ReconcileOptions {
                insert_from: Some(&table),
                key: "SGD",
                ..ReconcileOptions::default()
            },
        );
        assert_eq!(summary.inserted, 0);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_discard_partition() {
        let mut store = store();
        let mut outcome = ResolveOutcome::default();
        outcome.discard = vec![0];
        outcome.unresolved = vec![1, 3];

        let summary = reconcile(
            &mut store,
            Some(&outcome),
            &ReconcileOptions {
                discard_unresolved: true,
                key: "SGD",
                ..ReconcileOptions::default()
            },
        );

        assert_eq!(summary.discarded.len(), 1);
        assert_eq!(summary.discarded[0].lineno, 1);
        assert_eq!(summary.unresolved.len(), 2);
        assert_eq!(summary.unresolved[0].lineno, 2);
        assert_eq!(summary.unresolved[1].lineno, 4);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).identifier("SGD"), Some("YEL0W04"));
    }

    #[test]
    fn test_unresolved_kept_without_policy() {
        let mut store = store();
        let mut outcome = ResolveOutcome::default();
        outcome.unresolved = vec![1, 3];

        let summary = reconcile(&mut store, Some(&outcome), &ReconcileOptions::default());
        assert!(summary.discarded.is_empty());
        assert!(summary.unresolved.is_empty());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut store = store();
        let (table, _) = GeneTable::parse("YEL0W03\tchr1\t32611\t34140\t-\n");
        let opts = ReconcileOptions {
            insert_from: Some(&table),
            key: "SGD",
            ..ReconcileOptions::default()
        };
        let first = reconcile(&mut store, None, &opts);
        assert_eq!(first.inserted, 1);
        let again = reconcile(&mut store, None, &opts);
        assert_eq!(again.inserted, 0);
        assert_eq!(store.len(), 5);
    }
}
