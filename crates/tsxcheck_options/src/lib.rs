//! tsxcheck_options: Project configuration.
//!
//! Parses `tsxcheck.json` into a [`ProjectConfig`] and `.tsxcheckignore`
//! into [`IgnorePatterns`].

mod config;
mod ignore;

pub use config::{
    load_config, parse_config, ProjectConfig, CONFIG_FILE_NAME, DEFAULT_EXTENSIONS,
};
pub use ignore::{IgnorePatterns, IGNORE_FILE_NAME};

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// A configuration file that exists but cannot be used.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    #[diagnostic(code(tsxcheck::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}", path.display())]
    #[diagnostic(code(tsxcheck::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for `{field}` in {}: {message}", path.display())]
    #[diagnostic(code(tsxcheck::config::invalid))]
    Invalid {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}
