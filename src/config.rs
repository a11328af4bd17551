use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::BenchError;

pub const DEFAULT_ROOT: &str = "./Wasm-samples/c_logic_bombs";
pub const DEFAULT_TOOL: &str = "eunomia_entry";
pub const DEFAULT_EXTENSION: &str = "wasm";

/// Config file picked up from the working directory when `--config` is absent.
pub const LOCAL_CONFIG_FILE: &str = "wasmbench.toml";

/// Effective settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub tool: String,
    pub interpreter: Option<String>,
    pub extension: String,
    pub repetitions: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            root: PathBuf::from(DEFAULT_ROOT),
            tool: DEFAULT_TOOL.to_string(),
            interpreter: None,
            extension: DEFAULT_EXTENSION.to_string(),
            repetitions: 1,
        }
    }
}

/// On-disk TOML shape. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<PathBuf>,
    pub tool: Option<String>,
    pub interpreter: Option<String>,
    pub extension: Option<String>,
    pub repeat: Option<u32>,
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub tool: Option<String>,
    pub interpreter: Option<String>,
    pub extension: Option<String>,
    pub repeat: Option<u32>,
}

impl FileConfig {
    pub fn parse(text: &str, path: &Path) -> Result<FileConfig, BenchError> {
        toml::from_str(text).map_err(|e| BenchError::ConfigParseError {
            path: path.to_path_buf(),
            detail: e.message().to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<FileConfig, BenchError> {
        let text = std::fs::read_to_string(path).map_err(|source| BenchError::ConfigReadError {
            path: path.to_path_buf(),
            source,
        })?;
        FileConfig::parse(&text, path)
    }
}

impl Settings {
    /// Layers defaults, then the config file (if any), then command-line overrides.
    ///
    /// An explicit `config_path` must exist. Without one, `wasmbench.toml` in
    /// `cwd` is used only when present.
    pub fn resolve(
        config_path: Option<&Path>,
        cwd: &Path,
        overrides: &Overrides,
    ) -> Result<Settings, BenchError> {
        let file = match config_path {
            Some(path) => FileConfig::load(path)?,
            None => {
                let local = cwd.join(LOCAL_CONFIG_FILE);
                if local.is_file() {
                    log::debug!("using config file {}", local.display());
                    FileConfig::load(&local)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Settings::merge(file, overrides)
    }

    pub fn merge(file: FileConfig, overrides: &Overrides) -> Result<Settings, BenchError> {
        let defaults = Settings::default();
        let settings = Settings {
            root: overrides.root.clone().or(file.root).unwrap_or(defaults.root),
            tool: overrides.tool.clone().or(file.tool).unwrap_or(defaults.tool),
            interpreter: overrides.interpreter.clone().or(file.interpreter),
            extension: overrides
                .extension
                .clone()
                .or(file.extension)
                .map(|e| e.trim_start_matches('.').to_string())
                .unwrap_or(defaults.extension),
            repetitions: overrides.repeat.or(file.repeat).unwrap_or(defaults.repetitions),
        };

        if settings.repetitions == 0 {
            return Err(BenchError::ZeroRepetitions);
        }

        Ok(settings)
    }
}
