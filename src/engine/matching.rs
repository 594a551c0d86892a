//! Final result of a completed run.
//!
//! Serializes as `{"pairs": [[proposer, reviewer], ...]}` with raw matrix
//! ids, in reviewer order.

use std::fmt;

use serde::Serialize;

use crate::types::{PreferenceModel, ProposerId, Result, ReviewerId};

/// A perfect matching, stored in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "RawMatching")]
pub struct Matching {
    /// Proposer held by each reviewer
    by_reviewer: Vec<ProposerId>,

    /// Reviewer held by each proposer
    by_proposer: Vec<ReviewerId>,
}

impl Matching {
    /// Build from a partner slot per reviewer.
    ///
    /// Returns `None` unless every reviewer has a partner and no proposer is
    /// held twice, i.e. unless the slots describe a perfect matching.
    pub fn from_partners(partners: &[Option<ProposerId>]) -> Option<Self> {
        let n = partners.len();
        let mut by_reviewer = Vec::with_capacity(n);
        let mut by_proposer: Vec<Option<ReviewerId>> = vec![None; n];

        for (w, slot) in partners.iter().enumerate() {
            let m = (*slot)?;
            let entry = by_proposer.get_mut(m.index())?;
            if entry.is_some() {
                return None;
            }
            *entry = Some(ReviewerId::new(w));
            by_reviewer.push(m);
        }

        let by_proposer = by_proposer.into_iter().collect::<Option<Vec<_>>>()?;
        Some(Self { by_reviewer, by_proposer })
    }

    /// Number of pairs
    #[inline]
    pub fn n(&self) -> usize {
        self.by_reviewer.len()
    }

    /// Proposer matched to reviewer `w`
    #[inline]
    pub fn partner_of_reviewer(&self, w: ReviewerId) -> Option<ProposerId> {
        self.by_reviewer.get(w.index()).copied()
    }

    /// Reviewer matched to proposer `m`
    #[inline]
    pub fn partner_of_proposer(&self, m: ProposerId) -> Option<ReviewerId> {
        self.by_proposer.get(m.index()).copied()
    }

    /// Proposer per reviewer, indexed by reviewer
    #[inline]
    pub fn by_reviewer(&self) -> &[ProposerId] {
        &self.by_reviewer
    }

    /// Reviewer per proposer, indexed by proposer
    #[inline]
    pub fn by_proposer(&self) -> &[ReviewerId] {
        &self.by_proposer
    }

    /// `(proposer, reviewer)` pairs in reviewer order
    pub fn pairs(&self) -> impl Iterator<Item = (ProposerId, ReviewerId)> + '_ {
        self.by_reviewer
            .iter()
            .enumerate()
            .map(|(w, &m)| (m, ReviewerId::new(w)))
    }

    /// Pairs that would both rather be with each other than with their
    /// assigned partners.
    ///
    /// Checks every (proposer, reviewer) pair: O(n^2) rank lookups. Pairs
    /// come back in proposer order, then reviewer order.
    pub fn blocking_pairs(&self, model: &PreferenceModel) -> Result<Vec<(ProposerId, ReviewerId)>> {
        let mut blocking = Vec::new();

        for (m, &current) in self.by_proposer.iter().enumerate() {
            let m = ProposerId::new(m);

            for (w, &incumbent) in self.by_reviewer.iter().enumerate() {
                let w = ReviewerId::new(w);
                if w == current || !model.proposer_prefers_over(m, w, current)? {
                    continue;
                }
                if model.prefers_over(w, m, incumbent)? {
                    blocking.push((m, w));
                }
            }
        }

        Ok(blocking)
    }

    /// True iff there is no blocking pair
    pub fn is_stable(&self, model: &PreferenceModel) -> Result<bool> {
        Ok(self.blocking_pairs(model)?.is_empty())
    }

    /// Proposer per reviewer as raw `u64` ids, for digests
    pub fn to_raw_partners(&self) -> Vec<u64> {
        self.by_reviewer.iter().map(|m| m.to_raw() as u64).collect()
    }
}

/// Serialized form of [`Matching`]
#[derive(Debug, Serialize)]
struct RawMatching {
    pairs: Vec<(usize, usize)>,
}

impl From<Matching> for RawMatching {
    fn from(matching: Matching) -> Self {
        let n = matching.n();
        Self {
            pairs: matching.pairs().map(|(m, w)| (m.to_raw(), w.to_raw(n))).collect(),
        }
    }
}

impl fmt::Display for Matching {
    /// One line per pair: `M<m>: W<w>\tW<w>: M<m>` with raw ids
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.n();
        writeln!(f, "RESULT")?;
        for (m, w) in self.pairs() {
            let w = w.to_raw(n);
            writeln!(f, "M{}: W{}\tW{}: M{}", m.to_raw(), w, w, m.to_raw())?;
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: usize) -> ProposerId {
        ProposerId::new(i)
    }

    #[test]
    fn test_from_partners() {
        let matching = Matching::from_partners(&[Some(p(1)), Some(p(0))]).unwrap();
        assert_eq!(matching.n(), 2);
        assert_eq!(matching.partner_of_reviewer(ReviewerId::new(0)), Some(p(1)));
        assert_eq!(matching.partner_of_proposer(p(1)), Some(ReviewerId::new(0)));
        assert_eq!(matching.partner_of_proposer(p(0)), Some(ReviewerId::new(1)));
    }

    #[test]
    fn test_from_partners_rejects_gaps_and_duplicates() {
        assert!(Matching::from_partners(&[Some(p(0)), None]).is_none());
        assert!(Matching::from_partners(&[Some(p(0)), Some(p(0))]).is_none());
        assert!(Matching::from_partners(&[Some(p(5))]).is_none());
    }

    #[test]
    fn test_blocking_pair_detected() {
        // Both proposers prefer reviewer 2; reviewer 2 prefers proposer 0.
        let model = PreferenceModel::from_matrix(&[
            vec![2usize, 3],
            vec![2, 3],
            vec![0, 1],
            vec![0, 1],
        ])
        .unwrap();

        // m0-w3, m1-w2: m0 and w2 block
        let unstable = Matching::from_partners(&[Some(p(1)), Some(p(0))]).unwrap();
        assert_eq!(unstable.blocking_pairs(&model).unwrap(), vec![(p(0), ReviewerId::new(0))]);
        assert!(!unstable.is_stable(&model).unwrap());

        let stable = Matching::from_partners(&[Some(p(0)), Some(p(1))]).unwrap();
        assert!(stable.is_stable(&model).unwrap());
    }

    #[test]
    fn test_display_uses_raw_ids() {
        let matching = Matching::from_partners(&[Some(p(1)), Some(p(0))]).unwrap();
        let text = matching.to_string();
        assert!(text.contains("M1: W2\tW2: M1\n"));
        assert!(text.contains("M0: W3\tW3: M0\n"));
    }

    #[test]
    fn test_json_uses_raw_ids() {
        let matching = Matching::from_partners(&[Some(p(0)), Some(p(1))]).unwrap();
        let json = serde_json::to_value(&matching).unwrap();
        assert_eq!(json, serde_json::json!({"pairs": [[0, 2], [1, 3]]}));
    }

    #[test]
    fn test_every_blocking_pair_reported() {
        // Shared lists: proposers rank W4, W3, W5; reviewers rank M0, M1, M2
        let model = PreferenceModel::from_matrix(&[
            vec![4usize, 3, 5],
            vec![4, 3, 5],
            vec![4, 3, 5],
            vec![0, 1, 2],
            vec![0, 1, 2],
            vec![0, 1, 2],
        ])
        .unwrap();

        // M0-W5, M1-W4, M2-W3: M0 outranks both other partners and wants
        // either; M1 already holds his favourite; W4 keeps M1 over M2
        let reversed = Matching::from_partners(&[Some(p(2)), Some(p(1)), Some(p(0))]).unwrap();
        assert_eq!(
            reversed.blocking_pairs(&model).unwrap(),
            vec![(p(0), ReviewerId::new(0)), (p(0), ReviewerId::new(1))]
        );
        assert!(!reversed.is_stable(&model).unwrap());
    }
}
