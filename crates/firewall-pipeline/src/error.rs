use thiserror::Error;

/// Errors from running the validation pipeline or reading pipeline input.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("core error: {0}")]
    Core(#[from] firewall_core::FirewallError),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("markdown input exceeds the maximum size ({max_bytes} bytes)")]
    InputTooLarge { max_bytes: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
