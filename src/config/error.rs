//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("unknown theme `{name}`{}", closest_hint(.closest))]
    UnknownTheme {
        name: String,
        closest: Option<String>,
    },

    #[error("theme `{0}` has no source, set one of `path`, `inline` or `url`")]
    NoSource(String),

    // NOTE: fetching stylesheets over the network is not supported
    #[error("theme `{0}` points at a URL, use `path` or `inline` instead")]
    RemoteTheme(String),

    #[error("invalid CSS in theme `{name}`: {message}")]
    Css { name: String, message: String },
}

fn closest_hint(closest: &Option<String>) -> String {
    match closest {
        Some(name) => format!(", did you mean `{name}`?"),
        None => String::new(),
    }
}
