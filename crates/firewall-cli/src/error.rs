use thiserror::Error;

/// Top-level error type for the `firewall` binary.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("pipeline error: {0}")]
    Pipeline(#[from] firewall_pipeline::PipelineError),

    #[error("no input provided: pass file paths, --stdin, or --url")]
    NoInput,

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("blocked host: {0}")]
    BlockedHost(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
