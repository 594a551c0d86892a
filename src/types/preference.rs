//! Validated, indexed preference matrix.
//!
//! ## Input Shape
//!
//! The raw input is a `2n x n` matrix of participant ids:
//!
//! ```text
//! row 0..n   : proposer i ranks reviewers  (ids n..2n), best first
//! row n..2n  : reviewer w ranks proposers  (ids 0..n),  best first
//! ```
//!
//! Every row must be a permutation of the opposite side. This is checked
//! eagerly at construction; a model that exists is always well-formed.
//!
//! ## Rank Tables
//!
//! Alongside the ordered lists the model keeps the inverse permutation for
//! every participant, so "how does `w` rank `m`" is a single index instead of
//! a scan of `w`'s list.
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Construct | O(n^2) |
//! | Rank lookup | O(1) |
//! | Prefers-over | O(1) |
//!
//! ## Example
//!
//! ```
//! use stable_matching::types::{PreferenceModel, ProposerId, ReviewerId};
//!
//! let model = PreferenceModel::from_matrix(&[
//!     vec![2, 3],   // proposer 0
//!     vec![3, 2],   // proposer 1
//!     vec![1, 0],   // reviewer 2
//!     vec![0, 1],   // reviewer 3
//! ]).unwrap();
//!
//! let w = ReviewerId::new(0); // raw id 2
//! assert!(model.prefers_over(w, ProposerId::new(1), ProposerId::new(0)).unwrap());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{MatchError, Participant, ProposerId, Result, ReviewerId};

/// Immutable preference data for one matching problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<usize>>")]
pub struct PreferenceModel {
    /// Number of pairs (size of each side)
    n: usize,

    /// Proposer lists, indexed by proposer index
    proposer_prefs: Vec<Vec<ReviewerId>>,

    /// Reviewer lists, indexed by reviewer index
    reviewer_prefs: Vec<Vec<ProposerId>>,

    /// `proposer_ranks[m][w]` = rank of reviewer `w` in proposer `m`'s list
    proposer_ranks: Vec<Vec<usize>>,

    /// `reviewer_ranks[w][m]` = rank of proposer `m` in reviewer `w`'s list
    reviewer_ranks: Vec<Vec<usize>>,
}

impl PreferenceModel {
    /// Validate and index a raw `2n x n` preference matrix.
    ///
    /// Accepts any integer element type; values that do not convert to
    /// `usize` (negative numbers, for instance) are reported as malformed.
    ///
    /// # Errors
    ///
    /// [`MatchError::MalformedPreferenceData`] if the matrix is empty, has an
    /// odd number of rows, has a row of the wrong length, or any row is not a
    /// permutation of the opposite side.
    pub fn from_matrix<R, T>(matrix: &[R]) -> Result<Self>
    where
        R: AsRef<[T]>,
        T: Copy + TryInto<usize>,
    {
        let rows = matrix.len();
        if rows == 0 {
            return Err(MatchError::MalformedPreferenceData(
                "preference matrix is empty".to_string(),
            ));
        }
        if rows % 2 != 0 {
            return Err(MatchError::MalformedPreferenceData(format!(
                "preference matrix has {} rows, expected an even count (2n)",
                rows
            )));
        }

        let n = rows / 2;
        let mut proposer_prefs: Vec<Vec<ReviewerId>> = Vec::with_capacity(n);
        let mut reviewer_prefs: Vec<Vec<ProposerId>> = Vec::with_capacity(n);

        for (row_idx, row) in matrix.iter().enumerate() {
            let row: &[T] = row.as_ref();
            if row_idx < n {
                let ids = parse_row(row, row_idx, n, n)?;
                proposer_prefs.push(ids.into_iter().map(|raw| ReviewerId::new(raw - n)).collect());
            } else {
                let ids = parse_row(row, row_idx, n, 0)?;
                reviewer_prefs.push(ids.into_iter().map(ProposerId::new).collect());
            }
        }

        let proposer_ranks = proposer_prefs
            .iter()
            .map(|list| invert(n, list.iter().map(|w| w.index())))
            .collect();
        let reviewer_ranks = reviewer_prefs
            .iter()
            .map(|list| invert(n, list.iter().map(|m| m.index())))
            .collect();

        Ok(Self {
            n,
            proposer_prefs,
            reviewer_prefs,
            proposer_ranks,
            reviewer_ranks,
        })
    }

    // ========================================================================
    // Shape
    // ========================================================================

    /// Number of pairs to be matched
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// All proposers in id order
    pub fn proposers(&self) -> impl Iterator<Item = ProposerId> {
        (0..self.n).map(ProposerId::new)
    }

    /// All reviewers in id order
    pub fn reviewers(&self) -> impl Iterator<Item = ReviewerId> {
        (0..self.n).map(ReviewerId::new)
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// Proposer `m`'s ranking of reviewers, best first
    #[inline]
    pub fn proposer_preferences(&self, m: ProposerId) -> Option<&[ReviewerId]> {
        self.proposer_prefs.get(m.index()).map(Vec::as_slice)
    }

    /// Reviewer `w`'s ranking of proposers, best first
    #[inline]
    pub fn reviewer_preferences(&self, w: ReviewerId) -> Option<&[ProposerId]> {
        self.reviewer_prefs.get(w.index()).map(Vec::as_slice)
    }

    // ========================================================================
    // Rank Lookups
    // ========================================================================

    /// Zero-based rank of `candidate` in `owner`'s list (0 = most preferred).
    ///
    /// # Errors
    ///
    /// [`MatchError::UnknownParticipant`] if `candidate` is not on `owner`'s
    /// list: same side, or either id out of range.
    pub fn rank_of(&self, owner: Participant, candidate: Participant) -> Result<usize> {
        match (owner, candidate) {
            (Participant::Reviewer(w), Participant::Proposer(m)) => self.reviewer_rank(w, m),
            (Participant::Proposer(m), Participant::Reviewer(w)) => self.proposer_rank(m, w),
            _ => Err(self.unknown(owner, candidate)),
        }
    }

    /// Rank of proposer `m` in reviewer `w`'s list
    #[inline]
    pub fn reviewer_rank(&self, w: ReviewerId, m: ProposerId) -> Result<usize> {
        self.reviewer_ranks
            .get(w.index())
            .and_then(|ranks| ranks.get(m.index()))
            .copied()
            .ok_or_else(|| self.unknown(w.into(), m.into()))
    }

    /// Rank of reviewer `w` in proposer `m`'s list
    #[inline]
    pub fn proposer_rank(&self, m: ProposerId, w: ReviewerId) -> Result<usize> {
        self.proposer_ranks
            .get(m.index())
            .and_then(|ranks| ranks.get(w.index()))
            .copied()
            .ok_or_else(|| self.unknown(m.into(), w.into()))
    }

    /// True iff reviewer `w` ranks `candidate` strictly above `incumbent`.
    ///
    /// This is the only comparison the engine makes when deciding between
    /// two suitors.
    #[inline]
    pub fn prefers_over(&self, w: ReviewerId, candidate: ProposerId, incumbent: ProposerId) -> Result<bool> {
        Ok(self.reviewer_rank(w, candidate)? < self.reviewer_rank(w, incumbent)?)
    }

    /// True iff proposer `m` ranks `candidate` strictly above `incumbent`
    #[inline]
    pub fn proposer_prefers_over(&self, m: ProposerId, candidate: ReviewerId, incumbent: ReviewerId) -> Result<bool> {
        Ok(self.proposer_rank(m, candidate)? < self.proposer_rank(m, incumbent)?)
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Back to the raw `2n x n` matrix form
    pub fn to_matrix(&self) -> Vec<Vec<usize>> {
        let n = self.n;
        self.proposer_prefs
            .iter()
            .map(|list| list.iter().map(|w| w.to_raw(n)).collect())
            .chain(
                self.reviewer_prefs
                    .iter()
                    .map(|list| list.iter().map(|m| m.to_raw()).collect()),
            )
            .collect()
    }

    fn unknown(&self, owner: Participant, candidate: Participant) -> MatchError {
        MatchError::UnknownParticipant {
            owner: owner.to_raw(self.n),
            candidate: candidate.to_raw(self.n),
        }
    }
}

/// Check one row: length `n`, every id in `offset..offset + n`, no repeats.
fn parse_row<T>(row: &[T], row_idx: usize, n: usize, offset: usize) -> Result<Vec<usize>>
where
    T: Copy + TryInto<usize>,
{
    if row.len() != n {
        return Err(MatchError::MalformedPreferenceData(format!(
            "row {} has length {}, expected {}",
            row_idx,
            row.len(),
            n
        )));
    }

    let mut seen = vec![false; n];
    let mut ids = Vec::with_capacity(n);

    for (col, &value) in row.iter().enumerate() {
        let raw: usize = value.try_into().map_err(|_| {
            MatchError::MalformedPreferenceData(format!(
                "row {} column {} is not a participant id",
                row_idx, col
            ))
        })?;

        if raw < offset || raw >= offset + n {
            return Err(MatchError::MalformedPreferenceData(format!(
                "row {} column {}: id {} is outside {}..{}",
                row_idx,
                col,
                raw,
                offset,
                offset + n
            )));
        }

        let slot = &mut seen[raw - offset];
        if *slot {
            return Err(MatchError::MalformedPreferenceData(format!(
                "row {} lists id {} more than once",
                row_idx, raw
            )));
        }
        *slot = true;
        ids.push(raw);
    }

    Ok(ids)
}

/// Inverse permutation: position of each side-local index in the list.
fn invert(n: usize, list: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut ranks = vec![0; n];
    for (rank, index) in list.enumerate() {
        ranks[index] = rank;
    }
    ranks
}

impl TryFrom<Vec<Vec<i64>>> for PreferenceModel {
    type Error = MatchError;

    fn try_from(matrix: Vec<Vec<i64>>) -> Result<Self> {
        Self::from_matrix(&matrix)
    }
}

impl From<PreferenceModel> for Vec<Vec<usize>> {
    fn from(model: PreferenceModel) -> Self {
        model.to_matrix()
    }
}

impl fmt::Display for PreferenceModel {
    /// Side-by-side preference table: proposer `i` next to reviewer `i + n`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.n;
        writeln!(f, "PREFERENCE LIST")?;
        for i in 0..n {
            write!(f, "M{}: ", i)?;
            for w in &self.proposer_prefs[i] {
                write!(f, "W{} ", w.to_raw(n))?;
            }
            write!(f, "\tW{}: ", i + n)?;
            for m in &self.reviewer_prefs[i] {
                write!(f, "M{} ", m.to_raw())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
