use thiserror::Error;

/// Failures surfaced by the tab pipeline.
///
/// Everything that can go wrong happens between the registry lookup and the
/// CSV parse. Filtering, analysis and export degrade to empty output instead
/// of raising, so a bad value never takes down the whole view.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The requested tab is not a registered key. A configuration error, not
    /// a remote one.
    #[error("unknown tab {0:?}")]
    UnknownTab(String),

    /// Network failure or non-success HTTP status while fetching a source.
    #[error("fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The response body could not be parsed as CSV.
    #[error("malformed CSV from {url}")]
    Parse {
        url: String,
        #[source]
        source: csv::Error,
    },
}
