pub mod replay;
pub mod view;

use std::fs;
use std::path::{Path, PathBuf};

use catalog::{CatalogError, PlaceCatalog};
use globe::{ConfigError, GlobeConfig};

/// Anything that can stop an `atlas` command.
#[derive(Debug)]
pub enum ToolError {
    Io { path: PathBuf, source: std::io::Error },
    Catalog(CatalogError),
    Config(ConfigError),
    Replay(replay::ReplayError),
    Usage(String),
    Json(serde_json::Error),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::Io { path, source } => write!(f, "read {}: {source}", path.display()),
            ToolError::Catalog(e) => write!(f, "{e}"),
            ToolError::Config(e) => write!(f, "{e}"),
            ToolError::Replay(e) => write!(f, "{e}"),
            ToolError::Usage(msg) => f.write_str(msg),
            ToolError::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::Io { source, .. } => Some(source),
            ToolError::Catalog(e) => Some(e),
            ToolError::Config(e) => Some(e),
            ToolError::Replay(e) => Some(e),
            ToolError::Json(e) => Some(e),
            ToolError::Usage(_) => None,
        }
    }
}

impl From<CatalogError> for ToolError {
    fn from(e: CatalogError) -> Self {
        ToolError::Catalog(e)
    }
}

impl From<ConfigError> for ToolError {
    fn from(e: ConfigError) -> Self {
        ToolError::Config(e)
    }
}

impl From<replay::ReplayError> for ToolError {
    fn from(e: replay::ReplayError) -> Self {
        ToolError::Replay(e)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::Json(e)
    }
}

pub fn read_text(path: &Path) -> Result<String, ToolError> {
    fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_places(path: &Path) -> Result<PlaceCatalog, ToolError> {
    Ok(PlaceCatalog::from_json_str(&read_text(path)?)?)
}

/// Config from `path`, or the built-in defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<GlobeConfig, ToolError> {
    match path {
        Some(path) => Ok(GlobeConfig::from_json_str(&read_text(path)?)?),
        None => Ok(GlobeConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), GlobeConfig::default());
    }

    #[test]
    fn io_errors_name_the_path() {
        let err = load_places(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().starts_with("read /definitely/not/here.json:"));
    }
}
