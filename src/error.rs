//! Error types for data sources.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when fetching data from a source.
///
/// The sampler collapses every variant into an absent sub-result, but the
/// variants stay distinct so logs can tell a refused connection from a
/// failing query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// Could not connect or authenticate.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A query was rejected or failed mid-flight.
    #[error("Query failed: {0}")]
    Query(String),

    /// A query that must return a row returned none.
    #[error("No rows returned for {0}")]
    NoRows(String),

    /// A value could not be interpreted.
    #[error("Unexpected value for {field}: {value:?}")]
    Parse { field: String, value: String },

    /// The call did not finish within its time bound.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// An external command could not be run or exited unsuccessfully.
    #[error("Command failed: {0}")]
    Command(String),
}

impl SourceError {
    /// Short stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Connection(_) => "connection",
            SourceError::Query(_) => "query",
            SourceError::NoRows(_) => "no_rows",
            SourceError::Parse { .. } => "parse",
            SourceError::Timeout(_) => "timeout",
            SourceError::Command(_) => "command",
        }
    }

    pub(crate) fn parse(field: &str, value: impl Into<String>) -> Self {
        SourceError::Parse {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(SourceError::Connection("refused".into()).kind(), "connection");
        assert_eq!(SourceError::NoRows("max_connections".into()).kind(), "no_rows");
        assert_eq!(SourceError::Timeout(Duration::from_secs(2)).kind(), "timeout");
    }

    #[test]
    fn test_display_includes_detail() {
        let err = SourceError::parse("Threads_connected", "abc");
        assert_eq!(err.to_string(), "Unexpected value for Threads_connected: \"abc\"");
    }
}
