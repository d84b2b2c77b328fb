// src/error.rs
use thiserror::Error;

/// A network call that could not produce a response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    #[error("HTTP client could not be built: {0}")]
    Client(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("country table {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("country table {file}: {msg}")]
    Invalid { file: String, msg: String },

    #[error("allocation rule: {0}")]
    Rule(String),

    #[error("unknown country '{0}'")]
    UnknownCountry(String),
}

#[derive(Error, Debug)]
pub enum HarvestError {
    /// Every source came back empty. Nothing downstream can work with that.
    #[error("no municipalities found ({sources}); check the network connection")]
    NoData { sources: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
