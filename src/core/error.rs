use std::path::PathBuf;

/// Failures at the edges of the simulation: configuration, input and chart
/// output. The numeric core itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("could not draw chart: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, Error>;
