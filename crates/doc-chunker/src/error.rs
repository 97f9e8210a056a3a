use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur during document chunking
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// Strategy name not recognized
    #[error("Unsupported chunking strategy: {0}")]
    UnsupportedStrategy(String),

    /// Document content exceeds the hard size ceiling
    #[error("Input too large: {chars} characters exceeds limit of {max}")]
    InputTooLarge { chars: usize, max: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fixed-size windowing would exceed its iteration bound
    #[error(
        "Chunking exceeded available resources: iteration bound {max_iterations} reached after {iterations} steps"
    )]
    IterationLimit {
        iterations: usize,
        max_iterations: usize,
    },

    /// Working memory for the run could not be reserved
    #[error("Chunking exceeded available resources: {0}")]
    AllocationFailed(String),

    /// Metadata could not be encoded or decoded
    #[error("Metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification callers use to decide between rejecting, retrying,
/// or reporting a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller's input or configuration is bad; retrying will not help.
    InvalidInput,
    /// The run ran out of room; a smaller `max_chunk_size` may succeed.
    ResourceExhausted,
    /// Metadata encoding/decoding failed.
    Serialization,
    /// Reading configuration failed.
    Io,
}

impl ChunkerError {
    /// Create an unsupported strategy error
    pub fn unsupported_strategy(name: impl Into<String>) -> Self {
        Self::UnsupportedStrategy(name.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an allocation failure error
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::AllocationFailed(msg.into())
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedStrategy(_)
            | Self::InputTooLarge { .. }
            | Self::InvalidConfig(_)
            | Self::ConfigParse(_) => ErrorKind::InvalidInput,
            Self::IterationLimit { .. } | Self::AllocationFailed(_) => {
                ErrorKind::ResourceExhausted
            }
            Self::Metadata(_) => ErrorKind::Serialization,
            Self::IoError(_) => ErrorKind::Io,
        }
    }

    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidInput)
    }

    #[must_use]
    pub const fn is_resource_exhausted(&self) -> bool {
        matches!(self.kind(), ErrorKind::ResourceExhausted)
    }
}

impl From<std::collections::TryReserveError> for ChunkerError {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::AllocationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_input_and_resource_errors() {
        let too_large = ChunkerError::InputTooLarge { chars: 11, max: 10 };
        assert!(too_large.is_invalid_input());
        assert!(!too_large.is_resource_exhausted());

        let exhausted = ChunkerError::IterationLimit {
            iterations: 11,
            max_iterations: 10,
        };
        assert!(exhausted.is_resource_exhausted());
        assert!(exhausted.to_string().contains("exceeded available resources"));

        assert_eq!(
            ChunkerError::unsupported_strategy("magic").kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ChunkerError::allocation("oom").kind(),
            ErrorKind::ResourceExhausted
        );
    }

    #[test]
    fn try_reserve_failure_maps_to_resource_exhausted() {
        let mut buf: Vec<u8> = Vec::new();
        let err = buf.try_reserve(usize::MAX).unwrap_err();
        let err: ChunkerError = err.into();
        assert!(err.is_resource_exhausted());
    }
}
