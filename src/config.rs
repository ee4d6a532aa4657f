//! Optional `.cstructinfo.toml` project configuration.
//!
//! Searched up the ancestor-directory chain toward the filesystem root,
//! merged under explicit CLI flags (explicit flags always win). A missing
//! file is not an error; a malformed one is a warning, not a fatal error.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".cstructinfo.toml";

/// Project-level defaults mirroring the CLI flags. Every field is
/// optional so an absent key simply leaves the CLI default untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// A label only — this implementation does not preprocess based on it,
    /// since there is no real compiler front end behind the parser.
    pub language_std: Option<String>,
    /// Compiler-flag hints prepended before any CLI-supplied passthrough
    /// arguments.
    #[serde(default)]
    pub default_args: Vec<String>,
    pub with_source: Option<bool>,
    pub with_graphs: Option<bool>,
    pub no_sizes: Option<bool>,
    pub main_only: Option<bool>,
}

fn directory_ancestors(start: PathBuf) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        parent.pop().then_some(parent)
    })
}

/// Parses TOML contents already read from disk. A [`ConfigError`] is
/// constructed for diagnostic purposes on malformed input, but never
/// propagated: it's logged and this falls back to defaults rather than
/// aborting the run.
fn parse_and_validate(path: &Path, contents: &str) -> Config {
    match toml::from_str(contents) {
        Ok(config) => config,
        Err(source) => {
            let err = ConfigError::InvalidConfigFile {
                path: path.to_path_buf(),
                source,
            };
            tracing::warn!("{err}; using defaults");
            Config::default()
        }
    }
}

fn try_load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(parse_and_validate(path, &contents))
}

/// Loads an explicit `--config <path>` override, bypassing ancestor
/// search. An unreadable explicit path is treated the same as a
/// malformed one: warn, fall back to defaults.
pub fn load_explicit(path: &Path) -> Config {
    try_load(path).unwrap_or_else(|err| {
        tracing::warn!("{err}; using defaults");
        Config::default()
    })
}

/// Searches `start` and its ancestors for [`CONFIG_FILE_NAME`], returning
/// defaults if none is found anywhere up to the filesystem root.
pub fn load_from_ancestors(start: &Path) -> Config {
    for dir in directory_ancestors(start.to_path_buf()) {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            match try_load(&candidate) {
                Ok(config) => return config,
                Err(err) => tracing::debug!("{err}"),
            }
        }
    }
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = std::env::temp_dir().join("cstructinfo-config-test-missing");
        let _ = std::fs::create_dir_all(&dir);
        let config = load_from_ancestors(&dir);
        assert!(config.default_args.is_empty());
        assert_eq!(config.with_source, None);
    }

    #[test]
    fn parses_recognized_keys() {
        let dir = std::env::temp_dir().join("cstructinfo-config-test-parse");
        std::fs::create_dir_all(&dir).unwrap();
        let mut f = std::fs::File::create(dir.join(CONFIG_FILE_NAME)).unwrap();
        writeln!(f, "language_std = \"c11\"\nwith_source = true\ndefault_args = [\"-I./include\"]").unwrap();

        let config = load_from_ancestors(&dir);
        assert_eq!(config.language_std.as_deref(), Some("c11"));
        assert_eq!(config.with_source, Some(true));
        assert_eq!(config.default_args, vec!["-I./include".to_string()]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("cstructinfo-config-test-malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let mut f = std::fs::File::create(dir.join(CONFIG_FILE_NAME)).unwrap();
        writeln!(f, "this is not valid toml :::").unwrap();

        let config = load_from_ancestors(&dir);
        assert_eq!(config.with_source, None);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
