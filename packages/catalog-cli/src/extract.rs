//! Extraction seam and fragment collection.
//!
//! Message extraction itself is an external concern: an `Extractor` is
//! pointed at one source file and drops any number of JSON fragments into
//! a staging directory. Collection gathers every fragment back up and
//! folds duplicate ids with the combiner.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use lingua_catalog::combine::combine_catalogs;
use lingua_catalog::message::ExtractedCatalog;

/// Produces raw extraction fragments for one source file.
pub trait Extractor: Sync {
    /// Extract messages from `source`, writing `.json` fragments under
    /// `out_dir`.
    fn extract(&self, source: &Path, out_dir: &Path) -> Result<()>;
}

/// Runs an external extractor program as `program [args..] <source>
/// <out_dir>`.
pub struct CommandExtractor {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandExtractor {
    /// Split a command line on whitespace: first token is the program,
    /// the rest are leading arguments.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let Some(program) = parts.next() else {
            bail!("extractor command is empty");
        };
        Ok(CommandExtractor {
            program,
            args: parts.collect(),
        })
    }
}

impl Extractor for CommandExtractor {
    fn extract(&self, source: &Path, out_dir: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .arg(out_dir)
            .status()
            .with_context(|| format!("cannot run extractor {:?}", self.program))?;
        if !status.success() {
            bail!(
                "extractor {:?} failed on {} ({})",
                self.program,
                source.display(),
                status
            );
        }
        Ok(())
    }
}

/// Gather every JSON fragment found recursively under `dir` into one
/// extracted catalog. Fragments that fail to parse are skipped with a
/// diagnostic; conflicting defaults abort the run.
pub fn collect_fragments(dir: &Path) -> Result<ExtractedCatalog> {
    let mut fragments = Vec::new();
    visit(dir, &mut fragments)?;
    // Deterministic fold order regardless of directory enumeration.
    fragments.sort();

    let mut catalog = ExtractedCatalog::new();
    for path in fragments {
        let raw = fs::read_to_string(&path)?;
        let fragment: ExtractedCatalog = match serde_json::from_str(&raw) {
            Ok(fragment) => fragment,
            Err(error) => {
                debug!(path = %path.display(), %error, "skipping unreadable extraction fragment");
                continue;
            }
        };
        catalog = combine_catalogs(catalog, fragment)?;
    }
    Ok(catalog)
}

fn visit(dir: &Path, fragments: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("cannot read extraction directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            visit(&path, fragments)?;
        } else if path.extension().is_some_and(|extension| extension == "json") {
            fragments.push(path);
        }
    }
    Ok(())
}
