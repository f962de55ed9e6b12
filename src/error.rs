use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("frontmatter opened with `---` but never closed")]
    Unterminated,

    #[error("frontmatter is not a key/value mapping")]
    NotAMapping,

    #[error("invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "no config file found (looked for vscode-snippets.yaml / vscode-snippets.yml in {searched}).\n\
         Please create a config file (vscode-snippets.yaml) in your home directory"
    )]
    NotFound { searched: String },

    #[error("error reading config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{key} not specified in config file")]
    MissingKey { key: &'static str },

    #[error("cannot resolve {key} to an absolute path: {source}")]
    Resolve {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{key} does not exist or is not a directory: {}", .path.display())]
    MissingPath { key: &'static str, path: PathBuf },
}

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("failed to serialize bundle: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("source root and its subfolder `{dir_name}` would share one bundle")]
    FolderClash { dir_name: String },
}
