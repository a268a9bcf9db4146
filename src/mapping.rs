use crate::error::{GffCleanError, Result};
use crate::gff::Strand;
use hashbrown::HashMap;
use std::path::Path;

/// One 'best gene' entry from the mapping file.
///
/// Rows are tab-delimited: `name  chr  start  end  strand`. Coordinates are
/// 1-based inclusive, matching the GFF convention.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalGene {
    pub name: String,
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
}

/// A mapping row that was dropped during loading.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSkip {
    pub lineno: usize,
    pub reason: String,
}

/// Read-only canonical gene list, indexed by name.
///
/// Several entries may share one name; file order is preserved both in the
/// full list and within each name bucket.
#[derive(Debug, Default)]
pub struct GeneTable {
    genes: Vec<CanonicalGene>,
    by_name: HashMap<String, Vec<usize>>,
}

impl GeneTable {
    pub fn load(path: &Path) -> Result<(Self, Vec<MappingSkip>)> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| GffCleanError::MappingFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> (Self, Vec<MappingSkip>) {
        let mut table = Self::default();
        let mut skipped = Vec::new();

        for (i, line) in contents.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_gene(line) {
                Ok(gene) => table.push(gene),
                Err(reason) => skipped.push(MappingSkip {
                    lineno: i + 1,
                    reason,
                }),
            }
        }

        (table, skipped)
    }

    fn push(&mut self, gene: CanonicalGene) {
        let index = self.genes.len();
        self.by_name
            .entry(gene.name.clone())
            .or_default()
            .push(index);
        self.genes.push(gene);
    }

    /// Indices of all genes named `name`, in file order.
    pub fn lookup(&self, name: &str) -> &[usize] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, index: usize) -> &CanonicalGene {
        &self.genes[index]
    }

    pub fn genes(&self) -> &[CanonicalGene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

fn parse_gene(line: &str) -> std::result::Result<CanonicalGene, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 5 {
        return Err(format!("expected 5 columns, found {}", fields.len()));
    }
    let start = fields[2]
        .parse::<u64>()
        .map_err(|_| format!("bad start position '{}'", fields[2]))?;
    let end = fields[3]
        .parse::<u64>()
        .map_err(|_| format!("bad end position '{}'", fields[3]))?;
    Ok(CanonicalGene {
        name: fields[0].to_string(),
        chrom: fields[1].to_string(),
        start,
        end,
        strand: Strand::from_symbol(fields[4]),
    })
}
