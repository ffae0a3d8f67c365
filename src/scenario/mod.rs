//! Scenario catalog: resolves scenario names to files under `configs/scenarios`.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{self, ConfigError, ScenarioConfig};

/// Default catalog directory, relative to the working directory.
pub const SCENARIO_DIR: &str = "configs/scenarios";

const EXTENSIONS: [&str; 3] = ["yaml", "yml", "toml"];

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario `{name}` not found in {}", dir.display())]
    NotFound { name: String, dir: PathBuf },
    #[error("failed to list scenarios in {}: {source}", dir.display())]
    Catalog {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Resolve `name_or_path` to a file: an existing path wins, otherwise the
/// name is looked up in `dir` with each supported extension.
pub fn resolve(name_or_path: &str, dir: &Path) -> Result<PathBuf, ScenarioError> {
    let direct = PathBuf::from(name_or_path);
    if direct.is_file() {
        return Ok(direct);
    }
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name_or_path}.{ext}")))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ScenarioError::NotFound {
            name: name_or_path.to_string(),
            dir: dir.to_path_buf(),
        })
}

/// Resolve and load a scenario.
pub fn load(name_or_path: &str, dir: &Path) -> Result<ScenarioConfig, ScenarioError> {
    let path = resolve(name_or_path, dir)?;
    Ok(config::load_scenario(path)?)
}

/// Names of every scenario file in `dir`, sorted.
pub fn list(dir: &Path) -> Result<Vec<String>, ScenarioError> {
    let catalog_error = |source| ScenarioError::Catalog {
        dir: dir.to_path_buf(),
        source,
    };
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map_err(catalog_error)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| EXTENSIONS.contains(&ext))
                .unwrap_or(false)
        })
        .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
        .collect();
    names.sort();
    names.dedup();
    Ok(names)
}
