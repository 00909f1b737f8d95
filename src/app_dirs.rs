use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "codespeed")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("codespeed_config.json"))
    }

    /// Default location for `--log-file` when given without a value
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("codespeed");
            Some(state_dir.join("codespeed.log"))
        } else {
            ProjectDirs::from("", "", "codespeed")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("codespeed.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_json() {
        let path = AppDirs::config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }

    #[test]
    fn test_log_path_file_name() {
        if let Some(path) = AppDirs::log_path() {
            assert!(path.ends_with("codespeed.log"));
        }
    }
}
