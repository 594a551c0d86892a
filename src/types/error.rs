//! Error taxonomy for the matching kernel.

use thiserror::Error;

/// Errors produced while building a preference model or driving the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The input matrix has the wrong shape or a row is not a permutation
    /// of the opposite side. Not retryable: the input must be fixed.
    #[error("malformed preference data: {0}")]
    MalformedPreferenceData(String),

    /// A rank lookup asked about someone absent from the owner's list.
    /// Unreachable once the model has been validated.
    #[error("participant {candidate} does not appear in the preferences of participant {owner}")]
    UnknownParticipant {
        /// Raw id of the list owner
        owner: usize,
        /// Raw id that was looked up
        candidate: usize,
    },

    /// Negative step counters or an inner cursor outside `0..n`.
    #[error("invalid step request: {0}")]
    InvalidStepRequest(String),

    /// A free proposer ran off the end of his list.
    /// Unreachable with complete preference lists.
    #[error("proposer {proposer} is free but has proposed to every reviewer")]
    PreferencesExhausted {
        /// Raw id of the proposer
        proposer: usize,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MatchError::MalformedPreferenceData("row 0 has length 3, expected 2".into());
        assert_eq!(err.to_string(), "malformed preference data: row 0 has length 3, expected 2");

        let err = MatchError::UnknownParticipant { owner: 2, candidate: 3 };
        assert!(err.to_string().contains("participant 3"));
    }
}
