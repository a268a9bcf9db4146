use crate::group::GroupSet;

/// Classification of a duplicated identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    /// All records collapsed into a single group: one gene model split over
    /// several rows.
    Trivial,
    /// Two or more disjoint groups share the identifier; needs resolution.
    True,
}

/// One duplicated identifier with its groups and records.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateEntry {
    pub identifier: String,
    pub kind: DuplicateKind,
    /// Group indices into the [`GroupSet`], in order of first appearance.
    pub groups: Vec<usize>,
    /// Record indices in store order.
    pub records: Vec<usize>,
}

/// All duplicated identifiers found in one pass, in order of first
/// appearance in the store.
#[derive(Debug, Default)]
pub struct DuplicateReport {
    pub entries: Vec<DuplicateEntry>,
}

impl DuplicateReport {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn trivial(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == DuplicateKind::Trivial)
            .count()
    }

    pub fn true_duplicates(&self) -> usize {
        self.entries.len() - self.trivial()
    }

    /// Entries that need resolution (two or more groups).
    pub fn true_entries(&self) -> impl Iterator<Item = &DuplicateEntry> {
        self.entries
            .iter()
            .filter(|e| e.kind == DuplicateKind::True)
    }
}

/// Finds identifiers carried by more than one record and classifies each as
/// trivial (one group) or true (several groups).
///
/// Duplication is decided purely on the identifier value; chromosome and
/// strand only come into play during resolution.
pub fn classify(groups: &GroupSet) -> DuplicateReport {
    let mut report = DuplicateReport::default();

    for identifier in groups.identifiers() {
        let group_ids = groups.groups_for(identifier);
        let records: Vec<usize> = group_ids
            .iter()
            .flat_map(|&g| groups.groups[g].members.iter().copied())
            .collect();
        if records.len() < 2 {
            continue;
        }
        debug_assert!(records.windows(2).all(|w| w[0] < w[1]));
        report.entries.push(DuplicateEntry {
            identifier: identifier.to_string(),
            kind: if group_ids.len() == 1 {
                DuplicateKind::Trivial
            } else {
                DuplicateKind::True
            },
            groups: group_ids.to_vec(),
            records,
        });
    }

    report
}
