//! Receipt summarizing one completed matching run.
//!
//! The receipt carries a SHA-256 digest of the final matching so two runs can
//! be compared without shipping the whole pairing around.

use ssz_rs::prelude::*;
use sha2::{Digest, Sha256};

/// Summary of a completed run.
///
/// ## Digest
///
/// The 32-byte digest is SHA-256 over the matching encoded as
/// little-endian `u64` proposer ids in reviewer order.
///
/// ## Example
///
/// ```
/// use stable_matching::types::MatchingReceipt;
///
/// let receipt = MatchingReceipt::with_computed_digest(
///     3,          // pairs
///     5,          // proposals
///     2,          // rejections
///     &[2, 0, 1], // proposer matched to each reviewer
/// );
/// assert_eq!(receipt.digest_hex().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct MatchingReceipt {
    /// Number of pairs matched
    pub pairs: u64,

    /// Proposals made before the run terminated
    pub proposals: u64,

    /// Proposals turned down outright (excludes displaced partners)
    pub rejections: u64,

    /// SHA-256 over the final matching
    pub digest: [u8; 32],
}

impl MatchingReceipt {
    /// Create a receipt from precomputed parts
    pub fn new(pairs: u64, proposals: u64, rejections: u64, digest: [u8; 32]) -> Self {
        Self {
            pairs,
            proposals,
            rejections,
            digest,
        }
    }

    /// Create a receipt, hashing `partners` (proposer index per reviewer)
    pub fn with_computed_digest(pairs: u64, proposals: u64, rejections: u64, partners: &[u64]) -> Self {
        Self::new(pairs, proposals, rejections, Self::compute_digest(partners))
    }

    /// SHA-256 of the little-endian encoding of `partners`
    pub fn compute_digest(partners: &[u64]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for partner in partners {
            hasher.update(partner.to_le_bytes());
        }
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Digest as a hex string
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Share of proposals that were rejected outright
    ///
    /// Returns None if no proposals were made.
    pub fn rejection_rate(&self) -> Option<f64> {
        if self.proposals == 0 {
            None
        } else {
            Some(self.rejections as f64 / self.proposals as f64)
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
