//! Per-file flow: extract text -> prompt model -> parse -> rename.

use anyhow::{bail, Context, Result};
use futures_util::{stream, StreamExt};
use rcpt_core::{generate_filename_with_extension, parse_completion_with, ReceiptRecord, ResponseSchema};
use rcpt_ingest::{is_pdf_path, TextExtractor};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::llm::CompletionSource;
use crate::prompt::build_prompt;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Renamed { from: PathBuf, to: PathBuf },
    /// `--dry-run`: what would have happened
    WouldRename { from: PathBuf, to: PathBuf },
    /// The file already carries its generated name
    Unchanged(PathBuf),
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub renamed: usize,
    pub unchanged: usize,
    pub failed: Vec<(PathBuf, String)>,
}

pub struct Pipeline<C> {
    extractor: Arc<dyn TextExtractor>,
    llm: C,
    schema: ResponseSchema,
    dry_run: bool,
    // Destinations handed out during this run
    claimed: Mutex<HashSet<PathBuf>>,
}

impl<C: CompletionSource> Pipeline<C> {
    pub fn new(extractor: Arc<dyn TextExtractor>, llm: C, schema: ResponseSchema) -> Self {
        Self {
            extractor,
            llm,
            schema,
            dry_run: false,
            claimed: Mutex::new(HashSet::new()),
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Extract, query and parse a receipt without touching the file.
    pub async fn analyze(&self, path: &Path) -> Result<ReceiptRecord> {
        if !is_pdf_path(path) {
            bail!("file {} is not a PDF", path.display());
        }

        tracing::debug!(path = %path.display(), "extracting text");
        let extractor = Arc::clone(&self.extractor);
        let owned = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || extractor.extract_text(&owned))
            .await
            .context("text extraction task")?
            .context("extracting text from PDF")?;
        tracing::debug!(chars = text.len(), "extracted text");

        let prompt = build_prompt(&text, &self.schema);
        let completion = self.llm.complete(&prompt).await.context("querying model")?;
        tracing::debug!(completion = %completion, "model completion");

        let record = parse_completion_with(&completion, &self.schema).context("parsing completion")?;
        tracing::info!(
            path = %path.display(),
            start = %record.start_date(),
            end = %record.end_date(),
            total = record.total(),
            vendor = record.vendor(),
            category = record.category(),
            "extracted receipt"
        );
        Ok(record)
    }

    pub async fn process_file(&self, path: &Path) -> Result<Outcome> {
        let record = self.analyze(path).await?;
        self.rename(path, &record).await
    }

    /// Move `path` to its generated name in the same directory, keeping the
    /// source extension. Refuses to overwrite anything.
    pub async fn rename(&self, path: &Path, record: &ReceiptRecord) -> Result<Outcome> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let new_name = generate_filename_with_extension(record, &ext);
        if new_name.contains('/') || new_name.contains(std::path::MAIN_SEPARATOR) {
            bail!("generated name {new_name:?} contains a path separator");
        }
        tracing::debug!(name = %new_name, "generated filename");

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let to = dir.join(&new_name);
        if to == path {
            return Ok(Outcome::Unchanged(path.to_path_buf()));
        }

        {
            let mut claimed = self.claimed.lock().await;
            if claimed.contains(&to) || to.exists() {
                bail!(
                    "cannot rename {}: {} already exists",
                    path.display(),
                    to.display()
                );
            }
            claimed.insert(to.clone());
        }

        if self.dry_run {
            return Ok(Outcome::WouldRename {
                from: path.to_path_buf(),
                to,
            });
        }

        std::fs::rename(path, &to)
            .with_context(|| format!("renaming {} -> {}", path.display(), to.display()))?;
        Ok(Outcome::Renamed {
            from: path.to_path_buf(),
            to,
        })
    }

    /// Process `paths` with up to `jobs` files in flight. Failures are logged
    /// and collected; they never stop the run.
    pub async fn run(&self, paths: Vec<PathBuf>, jobs: usize) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut results = stream::iter(paths)
            .map(|p| async move {
                let res = self.process_file(&p).await;
                (p, res)
            })
            .buffer_unordered(jobs.max(1));

        while let Some((path, res)) = results.next().await {
            match res {
                Ok(Outcome::Renamed { from, to }) => {
                    summary.renamed += 1;
                    println!("Renamed: {} -> {}", file_name(&from), file_name(&to));
                }
                Ok(Outcome::WouldRename { from, to }) => {
                    summary.renamed += 1;
                    println!("Would rename: {} -> {}", file_name(&from), file_name(&to));
                }
                Ok(Outcome::Unchanged(p)) => {
                    summary.unchanged += 1;
                    tracing::info!(path = %p.display(), "already named");
                }
                Err(e) => {
                    let msg = format!("{e:#}");
                    tracing::error!(path = %path.display(), error = %msg, "error processing file");
                    summary.failed.push((path, msg));
                }
            }
        }
        summary
    }
}

fn file_name(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.display().to_string())
}
