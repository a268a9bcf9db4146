use crate::gff::{GffId, Strand};
use crate::store::RecordStore;
use hashbrown::HashMap;

/// How many records past a group's last member may separate it from its
/// next same-identifier record before the group is closed.
pub const DEFAULT_LOOKAHEAD: usize = 5;

/// Options for one grouping pass.
#[derive(Debug, Clone)]
pub struct GroupOptions<'a> {
    /// Attribute holding the identifier (default `SGD`).
    pub key: &'a str,
    /// Prefix for rewritten `ID` values (default `CDS`).
    pub prefix: &'a str,
    /// Lookahead tolerance, in records.
    pub lookahead: usize,
    /// Rewrite each grouped record's `ID` to `<prefix>:<identifier>:<n>`.
    pub rewrite_ids: bool,
}

impl Default for GroupOptions<'_> {
    fn default() -> Self {
        Self {
            key: "SGD",
            prefix: "CDS",
            lookahead: DEFAULT_LOOKAHEAD,
            rewrite_ids: false,
        }
    }
}

/// A run of same-identifier records.
///
/// Members are store indices in ascending order. Interleaved records of
/// other identifiers may sit between members as long as the gap between
/// consecutive members never exceeds the lookahead window. `identifier` is
/// `None` for records lacking the key attribute, which always form
/// singleton groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub identifier: Option<String>,
    pub members: Vec<usize>,
}

impl Group {
    /// Overall span: minimum start to maximum end across members.
    pub fn span(&self, store: &RecordStore) -> (u64, u64) {
        let mut start = u64::MAX;
        let mut end = 0;
        for &i in &self.members {
            let record = store.get(i);
            start = start.min(record.start);
            end = end.max(record.end);
        }
        (start, end)
    }

    /// Chromosome of the first member.
    pub fn chrom<'a>(&self, store: &'a RecordStore) -> &'a str {
        &store.get(self.members[0]).seqname
    }

    /// Strand of the first member.
    pub fn strand(&self, store: &RecordStore) -> Strand {
        store.get(self.members[0]).strand
    }
}

/// Group assignment over a whole store.
#[derive(Debug, Default)]
pub struct GroupSet {
    pub groups: Vec<Group>,
    group_of: Vec<usize>,
    identifiers: Vec<String>,
    by_identifier: HashMap<String, Vec<usize>>,
}

impl GroupSet {
    /// Index of the group owning record `index`.
    pub fn group_of(&self, index: usize) -> usize {
        self.group_of[index]
    }

    /// Groups sharing `identifier`, in order of first appearance.
    pub fn groups_for(&self, identifier: &str) -> &[usize] {
        self.by_identifier
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Identifier values in order of first appearance.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }
}

/// Partitions the store into groups and, when requested, rewrites `ID`
/// attributes to `<prefix>:<identifier>:<n>` with `n` counting members from
/// 1 in store order.
///
/// A record extends the latest open group of its identifier when its index
/// is within `lookahead` records of that group's last member; otherwise it
/// opens a fresh group and numbering restarts at 1.
pub fn group_records(store: &mut RecordStore, opts: &GroupOptions) -> GroupSet {
    let n = store.len();
    let mut set = GroupSet {
        groups: Vec::new(),
        group_of: vec![0; n],
        identifiers: Vec::new(),
        by_identifier: HashMap::new(),
    };
    // identifier -> its latest group
    let mut open: HashMap<String, usize> = HashMap::new();

    for i in 0..n {
        let identifier = store.get(i).identifier(opts.key).map(str::to_string);
        let gid = match identifier {
            None => {
                set.groups.push(Group {
                    identifier: None,
                    members: Vec::new(),
                });
                set.groups.len() - 1
            }
            Some(value) => {
                let reachable = open.get(&value).copied().filter(|&g| {
                    let last = *set.groups[g].members.last().expect("open group is empty");
                    i - last <= opts.lookahead
                });
                let gid = match reachable {
                    Some(g) => g,
                    None => {
                        set.groups.push(Group {
                            identifier: Some(value.clone()),
                            members: Vec::new(),
                        });
                        let g = set.groups.len() - 1;
                        match set.by_identifier.get_mut(&value) {
                            Some(ids) => ids.push(g),
                            None => {
                                set.identifiers.push(value.clone());
                                set.by_identifier.insert(value.clone(), vec![g]);
                            }
                        }
                        g
                    }
                };
                open.insert(value, gid);
                gid
            }
        };
        set.groups[gid].members.push(i);
        set.group_of[i] = gid;
    }

    if opts.rewrite_ids {
        rewrite_ids(store, &set, opts.prefix);
    }

    set
}

fn rewrite_ids(store: &mut RecordStore, set: &GroupSet, prefix: &str) {
    for group in &set.groups {
        let identifier = match &group.identifier {
            Some(value) => value,
            None => continue,
        };
        for (n, &i) in group.members.iter().enumerate() {
            let id = GffId {
                code: prefix.to_string(),
                name: identifier.clone(),
                index: (n + 1) as u32,
            };
            store.get_mut(i).attributes.set("ID", id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_from(lines: &[&str]) -> RecordStore {
        let contents = lines.join("\n");
        let (store, skipped) = RecordStore::parse(&contents);
        assert!(skipped.is_empty());
        store
    }

    fn line(sgd: &str, start: u64) -> String {
        format!(
            "chr1\tTest\tCDS\t{}\t{}\t0\t-\t0\tID={};SGD={}",
            start,
            start + 100,
            sgd,
            sgd
        )
    }

    fn ids(store: &RecordStore) -> Vec<String> {
        store
            .records()
            .iter()
            .map(|r| r.attributes.get("ID").unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_grouping_with_lookahead() {
        // The classic SGD fixture: YEL0W03 is split across an interleaved
        // YEL0W04 row but stays one group; YEL0W01 recurs beyond the window
        // and forms a second group numbered from 1 again.
        let lines: Vec<String> = [
            ("YEL0W01", 28789),
            ("YEL0W02", 29963),
            ("YEL0W02", 32611),
            ("YEL0W03", 34525),
            ("YEL0W03", 35823),
            ("YEL0W04", 38050),
            ("YEL0W03", 39195),
            ("YEL0W01", 40406),
        ]
        .iter()
        .map(|&(sgd, start)| line(sgd, start))
        .collect();
        let mut store = store_from(&lines.iter().map(String::as_str).collect::<Vec<_>>());

        let set = group_records(
            &mut store,
            &GroupOptions {
                rewrite_ids: true,
                ..GroupOptions::default()
            },
        );

        assert_eq!(
            ids(&store),
            vec![
                "CDS:YEL0W01:1",
                "CDS:YEL0W02:1",
                "CDS:YEL0W02:2",
                "CDS:YEL0W03:1",
                "CDS:YEL0W03:2",
                "CDS:YEL0W04:1",
                "CDS:YEL0W03:3",
                "CDS:YEL0W01:1",
            ]
        );
        assert_eq!(set.groups_for("YEL0W01").len(), 2);
        assert_eq!(set.groups_for("YEL0W02").len(), 1);
        assert_eq!(set.groups_for("YEL0W03").len(), 1);
        assert_eq!(set.groups[set.groups_for("YEL0W03")[0]].members, vec![3, 4, 6]);
    }

    #[test]
    fn test_interleaved_within_window_is_one_group() {
        let lines = [
            line("A", 100),
            line("A", 300),
            line("B", 500),
            line("A", 700),
        ];
        let mut store = store_from(&lines.iter().map(String::as_str).collect::<Vec<_>>());
        let set = group_records(
            &mut store,
            &GroupOptions {
                rewrite_ids: true,
                ..GroupOptions::default()
            },
        );

        assert_eq!(set.groups_for("A").len(), 1);
        assert_eq!(set.groups_for("B").len(), 1);
        assert_eq!(set.groups[set.groups_for("A")[0]].members, vec![0, 1, 3]);
        assert_eq!(
            ids(&store),
            vec!["CDS:A:1", "CDS:A:2", "CDS:B:1", "CDS:A:3"]
        );
    }

    #[test]
    fn test_gap_beyond_window_splits_groups() {
        let mut lines = vec![line("A", 100)];
        for i in 0..6 {
            lines.push(line(&format!("F{}", i), 1000 + i * 500));
        }
        lines.push(line("A", 9000));
        let mut store = store_from(&lines.iter().map(String::as_str).collect::<Vec<_>>());
        let set = group_records(&mut store, &GroupOptions::default());

        let groups = set.groups_for("A");
        assert_eq!(groups.len(), 2);
        assert_eq!(set.groups[groups[0]].members, vec![0]);
        assert_eq!(set.groups[groups[1]].members, vec![7]);
    }

    #[test]
    fn test_partition_completeness() {
        let lines = [
            line("A", 100),
            "chr1\tTest\tCDS\t200\t300\t0\t-\t0\tID=anon".to_string(),
            line("B", 400),
            line("A", 600),
        ];
        let mut store = store_from(&lines.iter().map(String::as_str).collect::<Vec<_>>());
        let set = group_records(&mut store, &GroupOptions::default());

        let mut seen = vec![0usize; store.len()];
        for group in &set.groups {
            for &i in &group.members {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
        for i in 0..store.len() {
            assert!(set.groups[set.group_of(i)].members.contains(&i));
        }
        // the keyless record sits in its own unnamed singleton
        let keyless = &set.groups[set.group_of(1)];
        assert_eq!(keyless.identifier, None);
        assert_eq!(keyless.members, vec![1]);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let lines = [
            line("A", 100),
            line("B", 200),
            line("A", 300),
            line("C", 400),
        ];
        let raw: Vec<&str> = lines.iter().map(String::as_str).collect();
        let opts = GroupOptions {
            rewrite_ids: true,
            ..GroupOptions::default()
        };

        let mut first = store_from(&raw);
        let first_set = group_records(&mut first, &opts);
        let mut second = store_from(&raw);
        let second_set = group_records(&mut second, &opts);

        assert_eq!(first_set.groups, second_set.groups);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_span_covers_all_members() {
        let lines = [line("A", 100), line("B", 5000), line("A", 900)];
        let mut store = store_from(&lines.iter().map(String::as_str).collect::<Vec<_>>());
        let set = group_records(&mut store, &GroupOptions::default());
        let group = &set.groups[set.groups_for("A")[0]];
        assert_eq!(group.span(&store), (100, 1000));
        assert_eq!(group.chrom(&store), "chr1");
    }
}
