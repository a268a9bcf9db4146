use crate::error::{GffCleanError, Result};
use std::path::{Path, PathBuf};

/// Supported compression formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    pub fn is_compressed(self) -> bool {
        !matches!(self, Compression::None)
    }
}

/// Detects input compression from the file extension(s) and checks that the
/// underlying format extension is GFF (`.gff`/`.gff3`, optionally `.gz`).
pub fn detect_input(path: &Path) -> Result<Compression> {
    let ext = extension_lowercase(path)
        .ok_or_else(|| GffCleanError::UnsupportedExtension(path.display().to_string()))?;

    if let Some(compression) = compression_from_extension(&ext) {
        nested_extension(path)
            .filter(|inner| is_gff_extension(inner))
            .ok_or_else(|| GffCleanError::UnsupportedExtension(path.display().to_string()))?;
        return Ok(compression);
    }

    if is_gff_extension(&ext) {
        Ok(Compression::None)
    } else {
        Err(GffCleanError::UnsupportedExtension(
            path.display().to_string(),
        ))
    }
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn is_gff_extension(ext: &str) -> bool {
    matches!(ext, "gff" | "gff3")
}

fn compression_from_extension(ext: &str) -> Option<Compression> {
    match ext {
        "gz" | "gzip" => Some(Compression::Gzip),
        _ => None,
    }
}

/// Inner extension for compressed files (e.g. `.gff.gz` -> `gff`).
fn nested_extension(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    extension_lowercase(&PathBuf::from(stem))
}
