//! Participant identifiers.
//!
//! ## Positional Convention
//!
//! A preference matrix for `n` pairs has `2n` rows. Rows `0..n` belong to
//! proposers, rows `n..2n` to reviewers. The raw integer that names a
//! participant is therefore its row index, and the side is implied by the
//! position.
//!
//! Inside the crate the two sides never share a type:
//!
//! - [`ProposerId`] holds a proposer's side-local index (`0..n`)
//! - [`ReviewerId`] holds a reviewer's side-local index (`0..n`)
//!
//! Converting between raw ids and typed ids always goes through
//! [`Participant`], which needs `n` to know where the boundary lies. The
//! typed ids have no serde form; anything written out for a renderer uses
//! raw ids.
//!
//! ## Example
//!
//! ```
//! use stable_matching::types::{Participant, ProposerId, ReviewerId};
//!
//! // With 3 pairs, raw id 4 is the second reviewer
//! let p = Participant::from_raw(4, 3).unwrap();
//! assert_eq!(p, Participant::Reviewer(ReviewerId::new(1)));
//! assert_eq!(p.to_raw(3), 4);
//!
//! assert_eq!(Participant::from_raw(0, 3), Some(Participant::Proposer(ProposerId::new(0))));
//! assert_eq!(Participant::from_raw(6, 3), None);
//! ```

use std::fmt;

// ============================================================================
// ProposerId
// ============================================================================

/// A proposer ("man"), identified by side-local index in `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposerId(usize);

impl ProposerId {
    /// Create a proposer id from its side-local index
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Side-local index, usable directly as a vector offset
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Raw positional id (identical to the index for proposers)
    #[inline]
    pub const fn to_raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProposerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

// ============================================================================
// ReviewerId
// ============================================================================

/// A reviewer ("woman"), identified by side-local index in `0..n`.
///
/// The raw positional id of a reviewer is `n + index`; use
/// [`ReviewerId::to_raw`] when talking to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReviewerId(usize);

impl ReviewerId {
    /// Create a reviewer id from its side-local index
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Side-local index, usable directly as a vector offset
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Raw positional id for a problem with `n` pairs
    #[inline]
    pub const fn to_raw(self, n: usize) -> usize {
        n + self.0
    }
}

// ============================================================================
// Participant
// ============================================================================

/// Either side of the market, tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Participant {
    /// Row in `0..n`
    Proposer(ProposerId),
    /// Row in `n..2n`
    Reviewer(ReviewerId),
}

impl Participant {
    /// Decode a raw positional id for a problem with `n` pairs.
    ///
    /// Returns `None` if `raw >= 2n`.
    pub fn from_raw(raw: usize, n: usize) -> Option<Self> {
        if raw < n {
            Some(Participant::Proposer(ProposerId::new(raw)))
        } else if raw < n.checked_mul(2)? {
            Some(Participant::Reviewer(ReviewerId::new(raw - n)))
        } else {
            None
        }
    }

    /// Encode back to the raw positional id
    pub fn to_raw(self, n: usize) -> usize {
        match self {
            Participant::Proposer(m) => m.to_raw(),
            Participant::Reviewer(w) => w.to_raw(n),
        }
    }
}

impl From<ProposerId> for Participant {
    fn from(m: ProposerId) -> Self {
        Participant::Proposer(m)
    }
}

impl From<ReviewerId> for Participant {
    fn from(w: ReviewerId) -> Self {
        Participant::Reviewer(w)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_boundaries() {
        let n = 4;
        assert_eq!(Participant::from_raw(0, n), Some(ProposerId::new(0).into()));
        assert_eq!(Participant::from_raw(3, n), Some(ProposerId::new(3).into()));
        assert_eq!(Participant::from_raw(4, n), Some(ReviewerId::new(0).into()));
        assert_eq!(Participant::from_raw(7, n), Some(ReviewerId::new(3).into()));
        assert_eq!(Participant::from_raw(8, n), None);
    }

    #[test]
    fn test_raw_roundtrip_every_id() {
        let n = 5;
        for raw in 0..2 * n {
            let p = Participant::from_raw(raw, n).unwrap();
            assert_eq!(p.to_raw(n), raw);
            assert_eq!(matches!(p, Participant::Proposer(_)), raw < n);
        }
    }

    #[test]
    fn test_reviewer_raw_offset() {
        assert_eq!(ReviewerId::new(2).to_raw(10), 12);
        assert_eq!(ProposerId::new(2).to_raw(), 2);
    }

    #[test]
    fn test_proposer_display() {
        assert_eq!(ProposerId::new(7).to_string(), "M7");
    }
}
