use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tsxcheck_scanner::{OverflowPolicy, ScanOptions};

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "tsxcheck.json";

/// File extensions checked when the configuration names none.
pub const DEFAULT_EXTENSIONS: &[&str] = &["tsx", "jsx"];

/// The `tsxcheck.json` file structure. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Extensions to check, without the dot.
    pub extensions: Option<Vec<String>>,
    /// Extra ignore globs, appended after `.tsxcheckignore`.
    pub ignore: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub overflow: Option<OverflowPolicy>,
    pub comments_in_template_text: Option<bool>,
    pub stop_on_first_error: Option<bool>,
    pub parallel: Option<bool>,
}

impl ProjectConfig {
    /// Load `tsxcheck.json` from `dir` if it exists there.
    pub fn find(dir: &Path) -> Result<Option<(PathBuf, ProjectConfig)>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        let config = load_config(&path)?;
        Ok(Some((path, config)))
    }

    /// Scan options with the configured overrides applied.
    pub fn scan_options(&self) -> ScanOptions {
        let defaults = ScanOptions::default();
        ScanOptions {
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            overflow: self.overflow.unwrap_or(defaults.overflow),
            comments_in_template_text: self
                .comments_in_template_text
                .unwrap_or(defaults.comments_in_template_text),
            ..defaults
        }
    }

    /// Whether `path` has one of the checked extensions (case-sensitive).
    pub fn is_checked_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        match &self.extensions {
            Some(exts) => exts.iter().any(|e| e.trim_start_matches('.') == ext),
            None => DEFAULT_EXTENSIONS.contains(&ext),
        }
    }

    pub fn stop_on_first_error(&self) -> bool {
        self.stop_on_first_error.unwrap_or(false)
    }

    pub fn parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    fn validate(self, path: &Path) -> Result<Self, ConfigError> {
        if self.max_depth == Some(0) {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                field: "maxDepth",
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(exts) = &self.extensions {
            if exts.iter().any(|e| e.trim_start_matches('.').is_empty()) {
                return Err(ConfigError::Invalid {
                    path: path.to_path_buf(),
                    field: "extensions",
                    message: "empty extension".to_string(),
                });
            }
        }
        Ok(self)
    }
}

/// Parse a `tsxcheck.json` document.
pub fn parse_config(content: &str) -> Result<ProjectConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Read, parse and check a `tsxcheck.json` file.
pub fn load_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    config.validate(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_object() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.scan_options(), ScanOptions::default());
        assert!(config.is_checked_extension(Path::new("App.tsx")));
        assert!(config.parallel());
        assert!(!config.stop_on_first_error());
    }

    #[test]
    fn test_parse_all_fields() {
        let config = parse_config(
            r#"{
                "extensions": ["tsx", ".mdx"],
                "ignore": ["**/*.stories.tsx"],
                "maxDepth": 64,
                "overflow": "truncate",
                "commentsInTemplateText": false,
                "stopOnFirstError": true,
                "parallel": false
            }"#,
        )
        .unwrap();

        let options = config.scan_options();
        assert_eq!(options.max_depth, 64);
        assert_eq!(options.overflow, OverflowPolicy::Truncate);
        assert!(!options.comments_in_template_text);
        assert_eq!(options.max_tag_name_len, ScanOptions::DEFAULT_MAX_TAG_NAME_LEN);

        assert!(config.is_checked_extension(Path::new("post.mdx")));
        assert!(!config.is_checked_extension(Path::new("App.jsx")));
        assert_eq!(config.ignore.as_deref(), Some(&["**/*.stories.tsx".to_string()][..]));
        assert!(config.stop_on_first_error());
        assert!(!config.parallel());
    }

    #[test]
    fn test_unknown_overflow_policy_is_rejected() {
        assert!(parse_config(r#"{ "overflow": "wrap" }"#).is_err());
    }

    #[test]
    fn test_checked_extensions() {
        let config = ProjectConfig::default();
        assert!(config.is_checked_extension(Path::new("src/App.tsx")));
        assert!(config.is_checked_extension(Path::new("legacy.jsx")));
        assert!(!config.is_checked_extension(Path::new("index.ts")));
        assert!(!config.is_checked_extension(Path::new("App.TSX")));
        assert!(!config.is_checked_extension(Path::new("Makefile")));

        let custom = ProjectConfig {
            extensions: Some(vec![".mdx".to_string()]),
            ..ProjectConfig::default()
        };
        assert!(custom.is_checked_extension(Path::new("post.mdx")));
        assert!(!custom.is_checked_extension(Path::new("App.tsx")));
    }

    #[test]
    fn test_load_config_rejects_zero_depth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "maxDepth": 0 }"#).unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "maxDepth", .. }));
    }

    #[test]
    fn test_load_config_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ maxDepth: 3 ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_find_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProjectConfig::find(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "parallel": false }"#).unwrap();
        let (path, config) = ProjectConfig::find(dir.path()).unwrap().unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
        assert!(!config.parallel());
    }
}
