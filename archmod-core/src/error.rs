/// Top-level archmod error type.
///
/// All fallible operations in `archmod-core` return [`Result<T, ArchmodError>`](Result).
/// Each variant wraps a concern-specific error enum, allowing callers to
/// match on the error source without losing type information.
#[derive(thiserror::Error, Debug)]
pub enum ArchmodError {
    /// Error loading or decoding the call graph input.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Contract violation in a coupling query.
    #[error("Coupling error: {0}")]
    Coupling(#[from] CouplingError),

    /// Invalid operation on the cluster partition.
    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error writing rendered output.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Errors reading the call graph supplied by the extraction collaborator.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    /// Filesystem I/O error reading the input file.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path of the input file.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Input is not a valid call graph document.
    #[error("Malformed call graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from pairwise coupling queries.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CouplingError {
    /// A class argument was empty. Carries the argument position.
    #[error("Class name cannot be empty ({0} argument)")]
    MissingClass(&'static str),
}

/// Errors from cluster merge bookkeeping.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// The key does not name a live cluster.
    #[error("Unknown cluster: {0}")]
    UnknownCluster(String),

    /// A cluster cannot absorb itself.
    #[error("Cannot merge cluster {0} with itself")]
    SelfMerge(String),
}

/// Errors in archmod configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors during output rendering.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Formatting into the output buffer failed.
    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Filesystem I/O error writing rendered output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, ArchmodError>`.
pub type Result<T> = std::result::Result<T, ArchmodError>;
