use thiserror::Error;

/// Failure emitted by a `CompanyFeed` through the normal signal channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The configured data source has no items. An empty source is treated as
    /// exceptional rather than as an empty success.
    #[error("no companies available in the feed")]
    NoItems,
}

/// Sequencing error returned by `SharedStream::connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("shared stream is already connected")]
    AlreadyConnected,

    #[error("shared stream has already terminated")]
    AlreadyTerminated,
}

/// Invalid construction-time configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("delay must be a finite, non-negative number of seconds, got {0}")]
    InvalidDelay(f64),

    #[error("delay range is inverted: min {min}s is greater than max {max}s")]
    InvertedRange { min: f64, max: f64 },

    #[error("both --min-delay and --max-delay are required for a delay range")]
    IncompleteRange,
}
