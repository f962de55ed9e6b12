pub mod bundle;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod types;

use bundle::{write_bundles, RunReport};
use config::Config;
use loader::load_snippets;
use std::io::Write;

/// Load every snippet under the source path and write one bundle per
/// folder into the destination, printing written paths to `out`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> RunReport {
    let loaded = load_snippets(&config.source_path, &config.inclusion);
    let mut report = write_bundles(&loaded.groups, &config.dest_path, out);
    report.file_failures = loaded.failures;
    report
}
