//! Aggregation error types

use thiserror::Error;

/// Errors that can occur while deriving metrics from a snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// An aggregate with no neutral value was asked for over no input
    #[error("Empty input: no {0} to aggregate")]
    EmptyInput(&'static str),

    /// A total does not fit in a `Decimal`
    #[error("Overflow: {0} total is out of range")]
    Overflow(&'static str),
}

/// Result type alias for aggregation operations
pub type AggregateResult<T> = Result<T, AggregateError>;
