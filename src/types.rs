use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Parsed frontmatter: string keys to arbitrary YAML values
pub type Metadata = BTreeMap<String, serde_yaml::Value>;

/// Directory name -> snippets found in it, in walk order
pub type FolderGroup = BTreeMap<String, Vec<SnippetRecord>>;

/// Identifier (`vs/<dir>/<file>`) -> serialized snippet
pub type OutputBundle = BTreeMap<String, SnippetJson>;

/// One snippet file after its header has been split off
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetRecord {
    pub dir_name: String,
    pub file_name: String,
    pub full_path: PathBuf,
    pub body: String,
    pub metadata: Metadata,
}

/// What VS Code expects for every entry of a `.code-snippets` file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnippetJson {
    pub prefix: String,
    pub scope: String,
    pub body: Vec<String>,
    pub description: String,
}
