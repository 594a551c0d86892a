//! Deferred-acceptance matching engine.
//!
//! ## Proposal Rule
//!
//! Each outer step:
//!
//! 1. Take the lowest-id free proposer `m`
//! 2. `m` proposes to the reviewer `w` at his cursor, and the cursor advances
//! 3. Free `w` accepts; an engaged `w` trades up if she ranks `m` above her
//!    partner (who becomes free), otherwise she rejects `m`
//!
//! Nobody proposes to the same reviewer twice, so a run takes at most `n^2`
//! steps and ends in the proposer-optimal stable matching.

use log::{debug, info, trace};

use crate::engine::{EngineState, Matching, ProposalEvent, StepSnapshot};
use crate::types::{MatchError, MatchingReceipt, PreferenceModel, ProposerId, Result, ReviewerId};

/// Drives one matching run over a borrowed preference model.
///
/// The engine owns nothing but the run's [`EngineState`]; recover it with
/// [`MatchingEngine::into_state`] to pause, and hand it back through
/// [`MatchingEngine::resume`] to continue.
#[derive(Debug, Clone)]
pub struct MatchingEngine<'a> {
    model: &'a PreferenceModel,
    state: EngineState,
}

impl<'a> MatchingEngine<'a> {
    /// Start a fresh run
    pub fn new(model: &'a PreferenceModel) -> Self {
        Self {
            model,
            state: EngineState::new(model.n()),
        }
    }

    /// Continue a run from a caller-held state.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidStepRequest`] if the state was built for a
    /// different number of pairs.
    pub fn resume(model: &'a PreferenceModel, state: EngineState) -> Result<Self> {
        if state.n() != model.n() {
            return Err(MatchError::InvalidStepRequest(format!(
                "state has {} pairs but the preference model has {}",
                state.n(),
                model.n()
            )));
        }
        Ok(Self { model, state })
    }

    /// The preference model being matched
    #[inline]
    pub fn model(&self) -> &'a PreferenceModel {
        self.model
    }

    /// Current state
    #[inline]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Give the state back to the caller
    #[inline]
    pub fn into_state(self) -> EngineState {
        self.state
    }

    /// True once no proposer is free
    #[inline]
    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    // ========================================================================
    // Stepping
    // ========================================================================

    /// Execute one outer step.
    ///
    /// Returns `Ok(None)` without touching the state once the run is done.
    pub fn step(&mut self) -> Result<Option<ProposalEvent>> {
        let proposer = match self.state.next_free() {
            Some(m) => m,
            None => {
                trace!("step {} requested after completion; ignoring", self.state.steps_taken());
                return Ok(None);
            }
        };
        let reviewer = self.next_reviewer(proposer)?;

        let event = match self.state.partner_of(reviewer) {
            None => {
                self.state.engage(proposer, reviewer);
                ProposalEvent::Engaged { proposer, reviewer }
            }
            Some(partner) if self.model.prefers_over(reviewer, proposer, partner)? => {
                self.state.release(partner);
                self.state.engage(proposer, reviewer);
                ProposalEvent::Replaced {
                    proposer,
                    reviewer,
                    displaced: partner,
                }
            }
            Some(partner) => {
                self.state.reject(reviewer, proposer);
                ProposalEvent::Rejected {
                    proposer,
                    reviewer,
                    partner,
                }
            }
        };

        self.state.record(event);
        debug!("step {}: {:?}", self.state.steps_taken(), event);

        Ok(Some(event))
    }

    /// Step until no proposer is free and return the stable matching.
    pub fn run_to_completion(mut self) -> Result<Matching> {
        while self.step()?.is_some() {}

        let matching = self.matching()?;
        info!(
            "matched {} pairs in {} proposals ({} rejections)",
            matching.n(),
            self.state.steps_taken(),
            self.state.rejection_count()
        );
        Ok(matching)
    }

    /// Drive the run to exactly `outer_target` executed steps.
    ///
    /// - Ahead of the state: steps forward, stopping early if the run
    ///   completes (further steps are no-ops).
    /// - Behind the state: replays from a fresh state up to the target.
    ///
    /// `inner_cursor` is an animation sub-frame counter in `0..n`. When the
    /// step that reaches `outer_target` executes during this call and the
    /// proposer's list position after it exceeds the cursor, the cursor
    /// advances by one, wrapping to 0 after `n - 1`.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidStepRequest`] if `inner_cursor >= n`.
    pub fn advance_to(&mut self, outer_target: u64, inner_cursor: usize) -> Result<StepSnapshot> {
        let n = self.model.n();
        if inner_cursor >= n {
            return Err(MatchError::InvalidStepRequest(format!(
                "inner step cursor {} is outside 0..{}",
                inner_cursor, n
            )));
        }

        if outer_target < self.state.steps_taken() {
            trace!(
                "rewinding from step {} to replay up to step {}",
                self.state.steps_taken(),
                outer_target
            );
            self.state = EngineState::new(n);
        }

        let mut cursor = inner_cursor;
        while self.state.steps_taken() < outer_target {
            let event = match self.step()? {
                Some(event) => event,
                None => break,
            };

            if self.state.steps_taken() == outer_target {
                let position = self.state.proposals_made(event.proposer());
                if position > cursor {
                    cursor = if cursor == n - 1 { 0 } else { cursor + 1 };
                }
            }
        }

        Ok(StepSnapshot::capture(&self.state, cursor))
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// The matching, once the run is done.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidStepRequest`] if proposers are still free.
    pub fn matching(&self) -> Result<Matching> {
        if !self.state.is_done() {
            return Err(MatchError::InvalidStepRequest(format!(
                "matching requested with {} proposers still free",
                self.state.free_count()
            )));
        }
        Matching::from_partners(self.state.partners()).ok_or_else(|| {
            MatchError::InvalidStepRequest("engine state does not describe a perfect matching".to_string())
        })
    }

    /// Receipt for the completed run
    pub fn receipt(&self) -> Result<MatchingReceipt> {
        let matching = self.matching()?;
        Ok(MatchingReceipt::with_computed_digest(
            matching.n() as u64,
            self.state.steps_taken(),
            self.state.rejection_count() as u64,
            &matching.to_raw_partners(),
        ))
    }

    fn next_reviewer(&self, m: ProposerId) -> Result<ReviewerId> {
        let cursor = self.state.proposals_made(m);
        self.model
            .proposer_preferences(m)
            .and_then(|list| list.get(cursor))
            .copied()
            .ok_or(MatchError::PreferencesExhausted { proposer: m.to_raw() })
    }
}

/// Compute the stable matching for `model` in one call.
///
/// # Example
///
/// ```
/// use stable_matching::engine::run_to_completion;
/// use stable_matching::types::{PreferenceModel, ProposerId, ReviewerId};
///
/// let model = PreferenceModel::from_matrix(&[vec![1usize], vec![0]]).unwrap();
/// let matching = run_to_completion(&model).unwrap();
///
/// assert_eq!(matching.partner_of_reviewer(ReviewerId::new(0)), Some(ProposerId::new(0)));
/// ```
pub fn run_to_completion(model: &PreferenceModel) -> Result<Matching> {
    MatchingEngine::new(model).run_to_completion()
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

    fn r(i: usize) -> ReviewerId {
        ReviewerId::new(i)
    }

    /// Both proposers want reviewer 2 first; she prefers proposer 1.
    fn contested_model() -> PreferenceModel {
        PreferenceModel::from_matrix(&[
            vec![2usize, 3],
            vec![2, 3],
            vec![1, 0],
            vec![1, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_single_pair() {
        let model = PreferenceModel::from_matrix(&[vec![1usize], vec![0]]).unwrap();
        let matching = run_to_completion(&model).unwrap();
        assert_eq!(matching.by_reviewer(), &[p(0)]);
    }

    #[test]
    fn test_two_pairs_no_conflict() {
        let model = PreferenceModel::from_matrix(&[
            vec![2usize, 3],
            vec![3, 2],
            vec![1, 0],
            vec![0, 1],
        ])
        .unwrap();

        let mut engine = MatchingEngine::new(&model);
        assert_eq!(engine.step().unwrap(), Some(ProposalEvent::Engaged { proposer: p(0), reviewer: r(0) }));
        assert_eq!(engine.step().unwrap(), Some(ProposalEvent::Engaged { proposer: p(1), reviewer: r(1) }));
        assert!(engine.is_done());
        assert_eq!(engine.step().unwrap(), None);

        let matching = engine.matching().unwrap();
        assert_eq!(matching.partner_of_proposer(p(0)), Some(r(0)));
        assert_eq!(matching.partner_of_proposer(p(1)), Some(r(1)));
        assert!(matching.is_stable(&model).unwrap());
    }

    #[test]
    fn test_replacement_frees_partner() {
        let model = contested_model();
        let mut engine = MatchingEngine::new(&model);

        engine.step().unwrap();
        let event = engine.step().unwrap().unwrap();
        assert_eq!(
            event,
            ProposalEvent::Replaced {
                proposer: p(1),
                reviewer: r(0),
                displaced: p(0),
            }
        );
        assert_eq!(engine.state().next_free(), Some(p(0)));
        assert_eq!(engine.state().fiance_of(p(0)), None);

        // p0 moves on to his second choice, never back to r0
        let event = engine.step().unwrap().unwrap();
        assert_eq!(event, ProposalEvent::Engaged { proposer: p(0), reviewer: r(1) });
        assert!(engine.is_done());
        assert_eq!(engine.state().rejection_count(), 0);
    }

    #[test]
    fn test_rejection_is_logged() {
        // Reviewer 2 prefers proposer 0, so proposer 1 is rejected outright.
        let model = PreferenceModel::from_matrix(&[
            vec![2usize, 3],
            vec![2, 3],
            vec![0, 1],
            vec![0, 1],
        ])
        .unwrap();

        let mut engine = MatchingEngine::new(&model);
        engine.step().unwrap();
        let event = engine.step().unwrap().unwrap();
        assert_eq!(
            event,
            ProposalEvent::Rejected {
                proposer: p(1),
                reviewer: r(0),
                partner: p(0),
            }
        );
        assert_eq!(engine.state().rejections(r(0)), &[p(1)]);

        let matching = engine.run_to_completion().unwrap();
        assert_eq!(matching.by_reviewer(), &[p(0), p(1)]);
    }

    #[test]
    fn test_matching_before_done_is_an_error() {
        let model = contested_model();
        let engine = MatchingEngine::new(&model);
        assert!(matches!(engine.matching(), Err(MatchError::InvalidStepRequest(_))));
    }

    #[test]
    fn test_resume_checks_size() {
        let model = contested_model();
        let err = MatchingEngine::resume(&model, EngineState::new(3)).unwrap_err();
        assert!(matches!(err, MatchError::InvalidStepRequest(_)));
    }

    #[test]
    fn test_advance_to_and_rewind() {
        let model = contested_model();
        let mut engine = MatchingEngine::new(&model);

        let snap = engine.advance_to(1, 0).unwrap();
        assert_eq!(snap.steps_taken, 1);
        assert_eq!(snap.partners, vec![Some(p(0)), None]);

        let snap = engine.advance_to(3, 0).unwrap();
        assert!(snap.done);

        let snap = engine.advance_to(1, 0).unwrap();
        assert_eq!(snap.steps_taken, 1);
        assert!(!snap.done);
        assert_eq!(snap.partners, vec![Some(p(0)), None]);
    }

    #[test]
    fn test_advance_to_rejects_bad_cursor() {
        let model = contested_model();
        let mut engine = MatchingEngine::new(&model);
        assert!(matches!(engine.advance_to(1, 2), Err(MatchError::InvalidStepRequest(_))));
    }

    #[test]
    fn test_inner_cursor_advances_on_final_step() {
        let model = contested_model();
        let mut engine = MatchingEngine::new(&model);

        // Step 1: p0's first proposal, position 1 > cursor 0
        assert_eq!(engine.advance_to(1, 0).unwrap().inner_cursor, 1);
        // Step 2: p1's first proposal, position 1 is not > cursor 1
        assert_eq!(engine.advance_to(2, 1).unwrap().inner_cursor, 1);
        // Step 3: p0's second proposal, position 2 > cursor 1, wraps to 0
        assert_eq!(engine.advance_to(3, 1).unwrap().inner_cursor, 0);
        // Clamped call: nothing executes, cursor untouched
        assert_eq!(engine.advance_to(10, 1).unwrap().inner_cursor, 1);
    }

    #[test]
    fn test_receipt() {
        let model = contested_model();
        let mut engine = MatchingEngine::new(&model);
        while engine.step().unwrap().is_some() {}

        let receipt = engine.receipt().unwrap();
        assert_eq!(receipt.pairs, 2);
        assert_eq!(receipt.proposals, 3);
        assert_eq!(receipt.rejections, 0);
        assert_eq!(receipt.digest, MatchingReceipt::compute_digest(&[1, 0]));
    }
}
