use crate::duplicates::DuplicateReport;
use crate::group::GroupSet;
use crate::mapping::{CanonicalGene, GeneTable};
use crate::store::RecordStore;
use hashbrown::HashSet;

/// Extra bases allowed on each side of a canonical gene's span when testing
/// whether a duplicate group lies inside it.
pub const DEFAULT_OVERLAP_MARGIN: u64 = 1000;

/// Why a duplicate set failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No mapping gene shares the identifier name.
    NoMappingGenes,
    /// Mapping genes exist but none agree on chromosome and strand.
    NoChromStrandMatch,
    /// Chromosome/strand matches exist but no group span fits the margin
    /// window.
    NoOverlaps,
    /// More than one (group, gene) pairing survived filtering.
    MultipleMatches,
}

/// Outcome for one duplicate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one group matched exactly one canonical gene.
    Resolved { group: usize, gene: usize },
    Unresolved(UnresolvedReason),
}

/// Results of resolving every true-duplicate set against a gene table.
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    /// Per-identifier resolutions, in duplicate-report order.
    pub resolutions: Vec<(String, Resolution)>,
    /// Records of losing groups in resolved sets, ascending store order.
    pub discard: Vec<usize>,
    /// Records of every unresolved identifier, ascending store order.
    pub unresolved: Vec<usize>,
    /// Names of canonical genes consumed by a resolution.
    pub consumed: HashSet<String>,
}

impl ResolveOutcome {
    pub fn resolved_count(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|(_, r)| matches!(r, Resolution::Resolved { .. }))
            .count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.resolutions.len() - self.resolved_count()
    }

    pub fn reason_count(&self, reason: UnresolvedReason) -> usize {
        self.resolutions
            .iter()
            .filter(|(_, r)| matches!(r, Resolution::Unresolved(x) if *x == reason))
            .count()
    }

    pub fn unresolved_identifiers(&self) -> impl Iterator<Item = &str> {
        self.resolutions
            .iter()
            .filter(|(_, r)| matches!(r, Resolution::Unresolved(_)))
            .map(|(name, _)| name.as_str())
    }
}

/// True when `span` lies entirely within the gene's span extended by
/// `margin` bases on each side. Bounds are inclusive.
fn overlaps(span: (u64, u64), gene: &CanonicalGene, margin: u64) -> bool {
    span.0 >= gene.start.saturating_sub(margin) && span.1 <= gene.end.saturating_add(margin)
}

/// Resolves every true-duplicate set in `report` against the gene table.
///
/// For one identifier the candidate genes are those with the same name.
/// (group, gene) pairs are filtered on chromosome + strand equality, then
/// on whole-span containment within the margin window; the set resolves iff
/// exactly one pair survives. Only a resolved set produces discards: every
/// record of its non-matching groups. The outcome depends solely on the
/// pair sets, never on iteration order.
pub fn resolve_duplicates(
    store: &RecordStore,
    groups: &GroupSet,
    report: &DuplicateReport,
    table: &GeneTable,
    margin: u64,
) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();

    for entry in report.true_entries() {
        let candidates = table.lookup(&entry.identifier);
        if candidates.is_empty() {
            log::debug!(
                "{}: no mapping genes with matching name",
                entry.identifier
            );
            outcome.unresolved.extend(entry.records.iter().copied());
            outcome.resolutions.push((
                entry.identifier.clone(),
                Resolution::Unresolved(UnresolvedReason::NoMappingGenes),
            ));
            continue;
        }

        // chromosome + strand filter
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for &g in &entry.groups {
            let group = &groups.groups[g];
            for &c in candidates {
                let gene = table.get(c);
                if group.chrom(store) == gene.chrom && group.strand(store) == gene.strand {
                    pairs.push((g, c));
                }
            }
        }
        if pairs.is_empty() {
            log::debug!(
                "{}: no mapping genes matched on chromosome and strand",
                entry.identifier
            );
            outcome.unresolved.extend(entry.records.iter().copied());
            outcome.resolutions.push((
                entry.identifier.clone(),
                Resolution::Unresolved(UnresolvedReason::NoChromStrandMatch),
            ));
            continue;
        }

        // overlap filter: the whole group span must sit inside the
        // margin-extended gene span
        let surviving: Vec<(usize, usize)> = pairs
            .into_iter()
            .filter(|&(g, c)| overlaps(groups.groups[g].span(store), table.get(c), margin))
            .collect();

        let resolution = match surviving.as_slice() {
            [] => Resolution::Unresolved(UnresolvedReason::NoOverlaps),
            &[(group, gene)] => Resolution::Resolved { group, gene },
            _ => Resolution::Unresolved(UnresolvedReason::MultipleMatches),
        };

        match resolution {
            Resolution::Resolved { group, gene } => {
                log::debug!("{}: resolved", entry.identifier);
                outcome.consumed.insert(table.get(gene).name.clone());
                for &g in &entry.groups {
                    if g != group {
                        outcome.discard.extend(groups.groups[g].members.iter().copied());
                    }
                }
            }
            Resolution::Unresolved(_) => {
                outcome.unresolved.extend(entry.records.iter().copied());
            }
        }
        outcome.resolutions.push((entry.identifier.clone(), resolution));
    }

    outcome.discard.sort_unstable();
    outcome.unresolved.sort_unstable();
    outcome
}
