use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// True when the path has a `.pdf` extension (any case).
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Resolve an input path into the receipts to process.
///
/// A file is returned as-is (it must be a PDF). A directory is walked
/// recursively (entries sorted by name) and every PDF below it is returned.
pub fn discover_receipts(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let meta = std::fs::metadata(root).with_context(|| format!("accessing {}", root.display()))?;

    if meta.is_file() {
        if !is_pdf_path(root) {
            bail!("file {} is not a PDF", root.display());
        }
        return Ok(vec![root.to_path_buf()]);
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if entry.file_type().is_file() && is_pdf_path(entry.path()) {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}
