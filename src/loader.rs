use crate::error::LoadError;
use crate::frontmatter::split_frontmatter;
use crate::types::{FolderGroup, SnippetRecord};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which files under the source tree count as snippets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InclusionPolicy {
    /// Every file whose name does not start with a dot
    #[default]
    SkipHidden,
    /// Only files with this extension (stored lowercase, without the dot)
    Extension(String),
}

impl InclusionPolicy {
    pub fn extension(ext: &str) -> Self {
        Self::Extension(ext.trim_start_matches('.').to_lowercase())
    }

    pub fn includes(&self, path: &Path) -> bool {
        match self {
            Self::SkipHidden => !path.file_name().map_or(true, is_hidden),
            Self::Extension(ext) => path
                .extension()
                .and_then(OsStr::to_str)
                .map_or(false, |e| e.eq_ignore_ascii_case(ext)),
        }
    }
}

/// A file that was skipped, and why
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: LoadError,
}

#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub groups: FolderGroup,
    pub failures: Vec<FileFailure>,
}

impl LoadOutcome {
    pub fn snippet_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Walk `root` and group every included snippet by the folder it lives in.
///
/// Unreadable files and broken headers are logged and recorded in
/// `failures`; the walk carries on with the next file. Symlinks are
/// followed. Files directly in the root are bundled under the root's own
/// folder name, unless a subfolder already uses that name, in which case
/// they are recorded as failures.
pub fn load_snippets(root: &Path, policy: &InclusionPolicy) -> LoadOutcome {
    let root_name = root_folder_name(root);
    let mut outcome = LoadOutcome::default();
    let mut root_records = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !(e.file_type().is_dir() && is_hidden(e.file_name())));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                log::warn!("Skipping unreadable entry {}: {}", path.display(), err);
                outcome.failures.push(FileFailure {
                    path,
                    error: err.into(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !policy.includes(path) {
            log::debug!("Skipping excluded file {}", path.display());
            continue;
        }

        let rel_dir = relative_folder(root, path);
        let at_root = rel_dir.is_none();
        let dir_name = rel_dir.unwrap_or_else(|| root_name.clone());

        match read_snippet(dir_name, path) {
            Ok(record) if at_root => root_records.push(record),
            Ok(record) => {
                log::debug!("Loaded {}/{}", record.dir_name, record.file_name);
                outcome
                    .groups
                    .entry(record.dir_name.clone())
                    .or_default()
                    .push(record);
            }
            Err(error) => {
                log::warn!("Skipping snippet {}: {}", path.display(), error);
                outcome.failures.push(FileFailure {
                    path: path.to_path_buf(),
                    error,
                });
            }
        }
    }

    if !root_records.is_empty() {
        if outcome.groups.contains_key(&root_name) {
            for record in root_records {
                let error = LoadError::FolderClash {
                    dir_name: root_name.clone(),
                };
                log::warn!("Skipping snippet {}: {}", record.full_path.display(), error);
                outcome.failures.push(FileFailure {
                    path: record.full_path,
                    error,
                });
            }
        } else {
            outcome.groups.insert(root_name, root_records);
        }
    }

    log::info!(
        "Loaded {} snippets in {} folders from {}",
        outcome.snippet_count(),
        outcome.groups.len(),
        root.display()
    );
    outcome
}

fn read_snippet(dir_name: String, path: &Path) -> Result<SnippetRecord, LoadError> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let (metadata, body) = split_frontmatter(&content)?;

    Ok(SnippetRecord {
        dir_name,
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        full_path: path.to_path_buf(),
        body,
        metadata,
    })
}

/// Parent of `path` relative to `root`, always with forward slashes.
/// `None` for files sitting directly in the root.
fn relative_folder(root: &Path, path: &Path) -> Option<String> {
    let rel = path.parent()?.strip_prefix(root).ok()?;
    if rel.as_os_str().is_empty() {
        None
    } else {
        Some(rel.to_string_lossy().replace('\\', "/"))
    }
}

fn root_folder_name(root: &Path) -> String {
    let canonical = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    canonical
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("root")
        .to_string()
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_str().map_or(false, |s| s.starts_with('.'))
}
