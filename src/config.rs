use crate::error::ConfigError;
use crate::loader::InclusionPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Base name of the config file, looked up as `.yaml` then `.yml`
pub const CONFIG_NAME: &str = "vscode-snippets";

const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub inclusion: InclusionPolicy,
}

/// Values taken from the command line; they win over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub dest: Option<PathBuf>,
    pub extension: Option<String>,
}

/// On-disk shape of `vscode-snippets.yaml`
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    source_path: Option<String>,
    #[serde(default)]
    dest_path: Option<String>,
    /// Restrict the walk to files with this extension
    #[serde(default)]
    extension: Option<String>,
}

impl Config {
    /// Resolve config from overrides, an explicit file, or the standard
    /// search locations (home directory, then the current directory).
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::load_from(overrides, &default_search_dirs())
    }

    pub fn load_from(overrides: &Overrides, search_dirs: &[PathBuf]) -> Result<Self, ConfigError> {
        let file = if let Some(path) = &overrides.config_file {
            read_config_file(path)?
        } else if overrides.source.is_some() && overrides.dest.is_some() {
            ConfigFile::default()
        } else {
            let path = find_config_file(search_dirs).ok_or_else(|| ConfigError::NotFound {
                searched: search_dirs
                    .iter()
                    .map(|d| d.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
            read_config_file(&path)?
        };

        let source_path = resolve_path("source_path", overrides.source.clone(), file.source_path)?;
        let dest_path = resolve_path("dest_path", overrides.dest.clone(), file.dest_path)?;

        let inclusion = match overrides.extension.as_deref().or(file.extension.as_deref()) {
            Some(ext) if !ext.trim().is_empty() => InclusionPolicy::extension(ext.trim()),
            _ => InclusionPolicy::SkipHidden,
        };

        Ok(Self {
            source_path,
            dest_path,
            inclusion,
        })
    }
}

fn default_search_dirs() -> Vec<PathBuf> {
    let mut search = Vec::new();
    if let Some(home) = dirs::home_dir() {
        search.push(home);
    }
    search.push(PathBuf::from("."));
    search
}

fn find_config_file(search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs.iter().find_map(|dir| {
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", CONFIG_NAME, ext)))
            .find(|candidate| candidate.is_file())
    })
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    let file = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded config from {}", path.display());
    Ok(file)
}

fn resolve_path(
    key: &'static str,
    cli: Option<PathBuf>,
    file: Option<String>,
) -> Result<PathBuf, ConfigError> {
    let path = cli
        .or_else(|| file.filter(|s| !s.trim().is_empty()).map(|s| expand_home(&s)))
        .ok_or(ConfigError::MissingKey { key })?;
    if !path.is_dir() {
        return Err(ConfigError::MissingPath { key, path });
    }
    std::path::absolute(&path).map_err(|source| ConfigError::Resolve { key, source })
}

fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn reads_paths_from_discovered_file() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let dest = temp.path().join("out");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(
            temp.path().join("vscode-snippets.yaml"),
            format!("source_path: {}\ndest_path: {}\n", src.display(), dest.display()),
        )
        .unwrap();

        let config = Config::load_from(&Overrides::default(), &[temp.path().to_path_buf()]).unwrap();

        assert_eq!(config.source_path, src);
        assert_eq!(config.dest_path, dest);
        assert_eq!(config.inclusion, InclusionPolicy::SkipHidden);
    }

    #[test]
    fn first_search_dir_wins() {
        let home = tempdir().unwrap();
        let cwd = tempdir().unwrap();
        fs::write(home.path().join("vscode-snippets.yml"), "source_path: /nope-home\n").unwrap();
        fs::write(cwd.path().join("vscode-snippets.yaml"), "source_path: /nope-cwd\n").unwrap();

        let err = Config::load_from(
            &Overrides::default(),
            &[home.path().to_path_buf(), cwd.path().to_path_buf()],
        )
        .unwrap_err();

        match err {
            ConfigError::MissingPath { key, path } => {
                assert_eq!(key, "source_path");
                assert_eq!(path, PathBuf::from("/nope-home"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = tempdir().unwrap();
        let err = Config::load_from(&Overrides::default(), &[temp.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("vscode-snippets.yaml"));
    }

    #[test]
    fn missing_dest_path_is_rejected() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("does-not-exist");
        let overrides = Overrides {
            source: Some(temp.path().to_path_buf()),
            dest: Some(missing.clone()),
            ..Overrides::default()
        };

        let err = Config::load_from(&overrides, &[]).unwrap_err();

        match err {
            ConfigError::MissingPath { key, path } => {
                assert_eq!(key, "dest_path");
                assert_eq!(path, missing);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn absent_key_is_reported() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("custom.yaml");
        fs::write(&file, format!("source_path: {}\n", temp.path().display())).unwrap();
        let overrides = Overrides {
            config_file: Some(file),
            ..Overrides::default()
        };

        let err = Config::load_from(&overrides, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { key: "dest_path" }));
    }

    #[test]
    fn cli_values_override_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("custom.yaml");
        fs::write(
            &file,
            "source_path: /nope\ndest_path: /nope\nextension: txt\n",
        )
        .unwrap();
        let overrides = Overrides {
            config_file: Some(file),
            source: Some(temp.path().to_path_buf()),
            dest: Some(temp.path().to_path_buf()),
            extension: Some(".snippet".into()),
        };

        let config = Config::load_from(&overrides, &[]).unwrap();

        assert_eq!(config.source_path, temp.path());
        assert_eq!(config.inclusion, InclusionPolicy::Extension("snippet".into()));
    }

    #[test]
    fn extension_key_selects_extension_policy() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("custom.yaml");
        fs::write(
            &file,
            format!(
                "source_path: {0}\ndest_path: {0}\nextension: Snippet\n",
                temp.path().display()
            ),
        )
        .unwrap();
        let overrides = Overrides {
            config_file: Some(file),
            ..Overrides::default()
        };

        let config = Config::load_from(&overrides, &[]).unwrap();
        assert_eq!(config.inclusion, InclusionPolicy::Extension("snippet".into()));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("custom.yaml");
        fs::write(&file, "source_path: [unclosed\n").unwrap();
        let overrides = Overrides {
            config_file: Some(file),
            ..Overrides::default()
        };

        let err = Config::load_from(&overrides, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn relative_paths_are_made_absolute() {
        let overrides = Overrides {
            source: Some(PathBuf::from(".")),
            dest: Some(PathBuf::from("src")),
            ..Overrides::default()
        };

        let config = Config::load_from(&overrides, &[]).unwrap();

        let cwd = std::env::current_dir().unwrap();
        assert!(config.source_path.is_absolute());
        assert!(config.dest_path.is_absolute());
        assert_eq!(config.dest_path, cwd.join("src"));
        assert!(config.source_path.is_dir());
    }
}
