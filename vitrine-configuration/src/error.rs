use thiserror::Error;
use vitrine_core::PartitionLabel;

/// Errors raised while turning a configuration into runtime objects.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML or does not fit the schema.
    #[error(transparent)]
    Yaml(#[from] serde_saphyr::Error),

    /// A route pattern is not a valid regular expression.
    #[error("route pattern {pattern:?} is invalid: {source}")]
    InvalidPattern {
        /// Pattern as written.
        pattern: String,
        /// Compilation failure.
        source: regex::Error,
    },

    /// A route sets both `pattern` and `destination`, or neither.
    #[error("route {route:?} must set exactly one of `pattern` or `destination`")]
    Matcher {
        /// Route name.
        route: String,
    },

    /// A partition is written to but would be deleted on activation.
    #[error("partition {0} is used but missing from current_caches")]
    UnknownPartition(PartitionLabel),

    /// The worker scope is not an absolute URL.
    #[error("invalid scope: {0}")]
    Scope(#[from] url::ParseError),
}
