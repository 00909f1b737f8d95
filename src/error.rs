use std::path::PathBuf;

/// Why a reference file could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("unsupported file type: {0} (allowed: {1})")]
    UnsupportedExtension(String, String),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),
}
