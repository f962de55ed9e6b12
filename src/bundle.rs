use crate::error::BundleError;
use crate::frontmatter::description;
use crate::loader::FileFailure;
use crate::types::{FolderGroup, OutputBundle, SnippetJson, SnippetRecord};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trigger prefix given to every generated snippet
pub const SNIPPET_PREFIX: &str = ".";

/// Extension of the files VS Code picks up as snippet bundles
pub const BUNDLE_EXTENSION: &str = "code-snippets";

/// A folder whose bundle could not be written
#[derive(Debug)]
pub struct FolderFailure {
    pub dir_name: String,
    pub error: BundleError,
}

/// Everything that happened during one conversion run
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    pub file_failures: Vec<FileFailure>,
    pub folder_failures: Vec<FolderFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.file_failures.is_empty() && self.folder_failures.is_empty()
    }
}

pub fn snippet_identifier(dir_name: &str, file_name: &str) -> String {
    format!("vs/{}/{}", dir_name, file_name)
}

/// Body text as JSON lines. A trailing newline ends the last line rather
/// than starting an empty one; `\r\n` endings are treated like `\n`.
pub fn body_lines(body: &str) -> Vec<String> {
    let body = body.strip_suffix('\n').unwrap_or(body);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

pub fn snippet_json(record: &SnippetRecord) -> SnippetJson {
    SnippetJson {
        prefix: SNIPPET_PREFIX.to_string(),
        scope: String::new(),
        body: body_lines(&record.body),
        description: description(&record.metadata),
    }
}

/// Map every record of one folder to its `vs/<dir>/<file>` entry.
/// Duplicate identifiers keep the last record.
pub fn build_bundle(dir_name: &str, records: &[SnippetRecord]) -> OutputBundle {
    let mut bundle = OutputBundle::new();
    for record in records {
        let id = snippet_identifier(dir_name, &record.file_name);
        if bundle.insert(id.clone(), snippet_json(record)).is_some() {
            log::warn!(
                "Duplicate snippet {}; {} overwrites the earlier entry",
                id,
                record.full_path.display()
            );
        }
    }
    bundle
}

/// Two-space indented JSON, no trailing newline
pub fn render_bundle(bundle: &OutputBundle) -> Result<String, BundleError> {
    Ok(serde_json::to_string_pretty(bundle)?)
}

pub fn bundle_path(dest: &Path, dir_name: &str) -> PathBuf {
    dest.join(format!("{}.{}", dir_name, BUNDLE_EXTENSION))
}

/// Write one bundle per folder into `dest`, printing each written path to
/// `out`. A folder that fails is logged and recorded; the rest still run.
pub fn write_bundles<W: Write>(groups: &FolderGroup, dest: &Path, out: &mut W) -> RunReport {
    let mut report = RunReport::default();

    for (dir_name, records) in groups {
        match write_bundle(dest, dir_name, records) {
            Ok(path) => {
                if let Err(e) = writeln!(out, "{}", path.display()) {
                    log::warn!("Failed to report {}: {}", path.display(), e);
                }
                report.written.push(path);
            }
            Err(error) => {
                log::error!("Skipping folder {}: {}", dir_name, error);
                report.folder_failures.push(FolderFailure {
                    dir_name: dir_name.clone(),
                    error,
                });
            }
        }
    }

    report
}

fn write_bundle(
    dest: &Path,
    dir_name: &str,
    records: &[SnippetRecord],
) -> Result<PathBuf, BundleError> {
    let bundle = build_bundle(dir_name, records);
    let json = render_bundle(&bundle)?;
    let path = bundle_path(dest, dir_name);

    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, json.as_bytes())
    };
    write().map_err(|source| BundleError::Write {
        path: path.clone(),
        source,
    })?;

    log::debug!("Wrote {} snippets to {}", bundle.len(), path.display());
    Ok(path)
}
