//! Resumable stepping for frame-by-frame observers.
//!
//! An animation driver calls [`advance_step`] with the state it got back
//! last time plus an outer step target and an inner sub-frame cursor, and
//! receives the new state together with a [`StepSnapshot`] to render.
//!
//! ```text
//! caller                         engine
//!   |  (state, target=k, cursor)   |
//!   | ---------------------------> |  run steps until k executed (or done)
//!   |  (state', snapshot)          |
//!   | <--------------------------- |
//! ```
//!
//! The result depends only on the model and the target: asking for an
//! earlier target than the state has reached replays from scratch, so the
//! event sequence a caller observes is always the one a single uninterrupted
//! run would produce.
//!
//! Snapshots serialize with raw positional ids, the same numbering the
//! preference matrix uses: proposers `0..n`, reviewers `n..2n`.

use serde::Serialize;

use crate::engine::event::RawProposalEvent;
use crate::engine::{EngineState, MatchingEngine, ProposalEvent, ProposerStatus};
use crate::types::{MatchError, PreferenceModel, ProposerId, Result, ReviewerId};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "RawSnapshot")]
pub struct StepSnapshot {
    /// Outer steps executed since the start of the run
    pub steps_taken: u64,

    /// Number of pairs
    pub pairs: usize,

    /// Free/engaged flag per proposer
    pub proposer_status: Vec<ProposerStatus>,

    /// Current partner per reviewer
    pub partners: Vec<Option<ProposerId>>,

    /// Proposers each reviewer has turned down, in order
    pub rejection_log: Vec<Vec<ProposerId>>,

    /// Current engagements, in formation order
    pub engagement_log: Vec<(ReviewerId, ProposerId)>,

    /// Event produced by the most recent step, if any
    pub last_event: Option<ProposalEvent>,

    /// Updated sub-frame cursor
    pub inner_cursor: usize,

    /// No proposer is free; further steps are no-ops
    pub done: bool,
}

impl StepSnapshot {
    /// Copy the observable parts of `state`
    pub fn capture(state: &EngineState, inner_cursor: usize) -> Self {
        Self {
            steps_taken: state.steps_taken(),
            pairs: state.n(),
            proposer_status: state.proposer_status(),
            partners: state.partners().to_vec(),
            rejection_log: state.rejection_log().to_vec(),
            engagement_log: state.engagement_log(),
            last_event: state.last_event(),
            inner_cursor,
            done: state.is_done(),
        }
    }

    /// Free proposers in id order
    pub fn free_proposers(&self) -> Vec<ProposerId> {
        self.proposer_status
            .iter()
            .enumerate()
            .filter(|(_, status)| **status == ProposerStatus::Free)
            .map(|(m, _)| ProposerId::new(m))
            .collect()
    }
}

/// Serialized form of [`StepSnapshot`], keyed by raw ids.
#[derive(Debug, Serialize)]
struct RawSnapshot {
    steps_taken: u64,
    pairs: usize,
    proposer_status: Vec<ProposerStatus>,
    /// `(reviewer, partner)` for every reviewer
    partners: Vec<(usize, Option<usize>)>,
    /// `(reviewer, rejected proposers)` for every reviewer
    rejection_log: Vec<(usize, Vec<usize>)>,
    /// `(reviewer, proposer)` in formation order
    engagement_log: Vec<(usize, usize)>,
    last_event: Option<RawProposalEvent>,
    inner_cursor: usize,
    done: bool,
}

impl From<StepSnapshot> for RawSnapshot {
    fn from(snapshot: StepSnapshot) -> Self {
        let n = snapshot.pairs;
        let reviewer = |w: usize| ReviewerId::new(w).to_raw(n);

        Self {
            steps_taken: snapshot.steps_taken,
            pairs: n,
            proposer_status: snapshot.proposer_status,
            partners: snapshot
                .partners
                .iter()
                .enumerate()
                .map(|(w, m)| (reviewer(w), m.map(ProposerId::to_raw)))
                .collect(),
            rejection_log: snapshot
                .rejection_log
                .iter()
                .enumerate()
                .map(|(w, ms)| (reviewer(w), ms.iter().map(|m| m.to_raw()).collect()))
                .collect(),
            engagement_log: snapshot
                .engagement_log
                .iter()
                .map(|(w, m)| (w.to_raw(n), m.to_raw()))
                .collect(),
            last_event: snapshot.last_event.map(|event| event.to_raw(n)),
            inner_cursor: snapshot.inner_cursor,
            done: snapshot.done,
        }
    }
}

/// Validated step counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRequest {
    /// Outer steps that should have executed when the call returns
    pub outer_target: u64,
    /// Sub-frame cursor in `0..n`
    pub inner_cursor: usize,
}

impl StepRequest {
    /// Validate counters that arrive as signed integers (from JSON, a form,
    /// a frame counter) for a problem with `n` pairs.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidStepRequest`] for a negative counter or an inner
    /// cursor outside `0..n`.
    pub fn from_raw(outer_target: i64, inner_cursor: i64, n: usize) -> Result<Self> {
        let outer_target = u64::try_from(outer_target).map_err(|_| {
            MatchError::InvalidStepRequest(format!("outer step target {} is negative", outer_target))
        })?;
        let inner = usize::try_from(inner_cursor)
            .ok()
            .filter(|&c| c < n)
            .ok_or_else(|| {
                MatchError::InvalidStepRequest(format!("inner step cursor {} is outside 0..{}", inner_cursor, n))
            })?;

        Ok(Self {
            outer_target,
            inner_cursor: inner,
        })
    }
}

/// Advance a caller-held state to `outer_target` executed steps.
///
/// Returns the updated state and the snapshot for that point. Once the run
/// is complete every further call returns the final state unchanged.
///
/// # Example
///
/// ```
/// use stable_matching::engine::{advance_step, EngineState};
/// use stable_matching::types::PreferenceModel;
///
/// let model = PreferenceModel::from_matrix(&[
///     vec![2usize, 3], vec![3, 2], vec![1, 0], vec![0, 1],
/// ]).unwrap();
///
/// let mut state = EngineState::new(model.n());
/// let mut target = 0;
/// loop {
///     target += 1;
///     let (next, snapshot) = advance_step(&model, state, target, 0).unwrap();
///     state = next;
///     if snapshot.done {
///         break;
///     }
/// }
/// assert_eq!(state.steps_taken(), 2);
/// ```
pub fn advance_step(
    model: &PreferenceModel,
    state: EngineState,
    outer_target: u64,
    inner_cursor: usize,
) -> Result<(EngineState, StepSnapshot)> {
    let mut engine = MatchingEngine::resume(model, state)?;
    let snapshot = engine.advance_to(outer_target, inner_cursor)?;
    Ok((engine.into_state(), snapshot))
}

/// [`advance_step`] with counters already validated by [`StepRequest`]
pub fn advance_request(
    model: &PreferenceModel,
    state: EngineState,
    request: StepRequest,
) -> Result<(EngineState, StepSnapshot)> {
    advance_step(model, state, request.outer_target, request.inner_cursor)
}

// ============================================================================
// Unit Tests
// ============================================================================
