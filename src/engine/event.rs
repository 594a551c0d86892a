//! Proposal events.
//!
//! Every outer step of the engine produces exactly one [`ProposalEvent`].
//! The ordered list of events is the observable history of a run: two runs
//! are equivalent iff their event sequences are equal.
//!
//! Events carry typed ids. [`RawProposalEvent`] is the wire form handed to
//! renderers, with every participant named by its raw matrix row.

use serde::{Deserialize, Serialize};

use crate::types::{ProposerId, ReviewerId};

/// Outcome of a single proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProposalEvent {
    /// Reviewer was free and accepted
    Engaged {
        proposer: ProposerId,
        reviewer: ReviewerId,
    },
    /// Reviewer traded up; `displaced` is free again
    Replaced {
        proposer: ProposerId,
        reviewer: ReviewerId,
        displaced: ProposerId,
    },
    /// Reviewer kept `partner` and turned the proposer down
    Rejected {
        proposer: ProposerId,
        reviewer: ReviewerId,
        partner: ProposerId,
    },
}

impl ProposalEvent {
    /// Who proposed
    pub fn proposer(&self) -> ProposerId {
        match *self {
            ProposalEvent::Engaged { proposer, .. }
            | ProposalEvent::Replaced { proposer, .. }
            | ProposalEvent::Rejected { proposer, .. } => proposer,
        }
    }

    /// Who was proposed to
    pub fn reviewer(&self) -> ReviewerId {
        match *self {
            ProposalEvent::Engaged { reviewer, .. }
            | ProposalEvent::Replaced { reviewer, .. }
            | ProposalEvent::Rejected { reviewer, .. } => reviewer,
        }
    }

    /// True if the proposal was accepted
    pub fn is_accepted(&self) -> bool {
        !matches!(self, ProposalEvent::Rejected { .. })
    }

    /// Wire form for a problem with `n` pairs
    pub fn to_raw(self, n: usize) -> RawProposalEvent {
        match self {
            ProposalEvent::Engaged { proposer, reviewer } => RawProposalEvent::Engaged {
                proposer: proposer.to_raw(),
                reviewer: reviewer.to_raw(n),
            },
            ProposalEvent::Replaced {
                proposer,
                reviewer,
                displaced,
            } => RawProposalEvent::Replaced {
                proposer: proposer.to_raw(),
                reviewer: reviewer.to_raw(n),
                displaced: displaced.to_raw(),
            },
            ProposalEvent::Rejected {
                proposer,
                reviewer,
                partner,
            } => RawProposalEvent::Rejected {
                proposer: proposer.to_raw(),
                reviewer: reviewer.to_raw(n),
                partner: partner.to_raw(),
            },
        }
    }
}

// ============================================================================
// Wire Form
// ============================================================================

/// [`ProposalEvent`] with raw positional ids (reviewers in `n..2n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawProposalEvent {
    Engaged {
        proposer: usize,
        reviewer: usize,
    },
    Replaced {
        proposer: usize,
        reviewer: usize,
        displaced: usize,
    },
    Rejected {
        proposer: usize,
        reviewer: usize,
        partner: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let event = ProposalEvent::Replaced {
            proposer: ProposerId::new(1),
            reviewer: ReviewerId::new(0),
            displaced: ProposerId::new(0),
        };
        assert_eq!(event.proposer(), ProposerId::new(1));
        assert_eq!(event.reviewer(), ReviewerId::new(0));
        assert!(event.is_accepted());
    }

    #[test]
    fn test_json_shape_uses_raw_reviewer_id() {
        // 3 pairs: reviewer index 1 is matrix row 4
        let event = ProposalEvent::Rejected {
            proposer: ProposerId::new(2),
            reviewer: ReviewerId::new(1),
            partner: ProposerId::new(0),
        };
        let json = serde_json::to_string(&event.to_raw(3)).unwrap();
        assert_eq!(json, r#"{"kind":"rejected","proposer":2,"reviewer":4,"partner":0}"#);
    }
}
