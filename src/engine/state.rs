//! Mutable matching state for one run.
//!
//! ## Ownership
//!
//! `EngineState` is plain data owned by the caller. The engine borrows a
//! [`PreferenceModel`](crate::types::PreferenceModel) and mutates a state;
//! pausing a run is just holding on to the state value and handing it back
//! later. Nothing is shared between runs.
//!
//! ## Invariants (between steps)
//!
//! - `partners[w] == Some(m)` iff `fiance[m] == Some(w)`
//! - `m` is in `free` iff `fiance[m].is_none()`
//! - `next_choice[m]` is the number of proposals `m` has made so far
//! - `engaged_at[w]` is `Some(seq)` iff `partners[w]` is `Some(_)`, where
//!   `seq` counts engagements formed before this one; sorting engaged
//!   reviewers by it gives the engagement log

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::engine::ProposalEvent;
use crate::types::{ProposerId, ReviewerId};

/// Whether a proposer currently holds an engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposerStatus {
    /// Still looking
    Free,
    /// Provisionally accepted by some reviewer
    Engaged,
}

/// Engagement state, cursors and history of one deferred-acceptance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    /// Number of pairs
    n: usize,

    /// Free proposers, ordered so the lowest id is always first
    free: BTreeSet<ProposerId>,

    /// Current reviewer of each proposer
    fiance: Vec<Option<ReviewerId>>,

    /// Current proposer of each reviewer
    partners: Vec<Option<ProposerId>>,

    /// Per-proposer cursor into his preference list
    next_choice: Vec<usize>,

    /// Per-reviewer proposers turned down outright, in order
    rejection_log: Vec<Vec<ProposerId>>,

    /// Formation sequence number of each reviewer's current engagement
    engaged_at: Vec<Option<u64>>,

    /// Engagements formed so far, including ones since broken
    engagements_formed: u64,

    /// One entry per outer step
    events: Vec<ProposalEvent>,
}

impl EngineState {
    /// Fresh state: everyone free, nobody has proposed
    pub fn new(n: usize) -> Self {
        Self {
            n,
            free: (0..n).map(ProposerId::new).collect(),
            fiance: vec![None; n],
            partners: vec![None; n],
            next_choice: vec![0; n],
            rejection_log: vec![Vec::new(); n],
            engaged_at: vec![None; n],
            engagements_formed: 0,
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of pairs this state was built for
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Outer steps executed so far
    #[inline]
    pub fn steps_taken(&self) -> u64 {
        self.events.len() as u64
    }

    /// True once no proposer is free
    #[inline]
    pub fn is_done(&self) -> bool {
        self.free.is_empty()
    }

    /// Free proposers in ascending id order
    pub fn free_proposers(&self) -> impl Iterator<Item = ProposerId> + '_ {
        self.free.iter().copied()
    }

    /// Number of free proposers
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Status of every proposer, indexed by proposer
    pub fn proposer_status(&self) -> Vec<ProposerStatus> {
        self.fiance
            .iter()
            .map(|f| match f {
                Some(_) => ProposerStatus::Engaged,
                None => ProposerStatus::Free,
            })
            .collect()
    }

    /// Current partner of reviewer `w`
    #[inline]
    pub fn partner_of(&self, w: ReviewerId) -> Option<ProposerId> {
        self.partners.get(w.index()).copied().flatten()
    }

    /// Current reviewer of proposer `m`
    #[inline]
    pub fn fiance_of(&self, m: ProposerId) -> Option<ReviewerId> {
        self.fiance.get(m.index()).copied().flatten()
    }

    /// Current partner of every reviewer, indexed by reviewer
    #[inline]
    pub fn partners(&self) -> &[Option<ProposerId>] {
        &self.partners
    }

    /// How many proposals `m` has made (his list position)
    #[inline]
    pub fn proposals_made(&self, m: ProposerId) -> usize {
        self.next_choice.get(m.index()).copied().unwrap_or(0)
    }

    /// Proposers reviewer `w` has turned down, in order
    pub fn rejections(&self, w: ReviewerId) -> &[ProposerId] {
        self.rejection_log.get(w.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Per-reviewer rejection lists
    #[inline]
    pub fn rejection_log(&self) -> &[Vec<ProposerId>] {
        &self.rejection_log
    }

    /// Total outright rejections so far
    pub fn rejection_count(&self) -> usize {
        self.rejection_log.iter().map(Vec::len).sum()
    }

    /// Current engagements in the order they were formed.
    ///
    /// A reviewer who trades up appears at her newest position.
    pub fn engagement_log(&self) -> Vec<(ReviewerId, ProposerId)> {
        let mut log: Vec<(u64, ReviewerId, ProposerId)> = self
            .engaged_at
            .iter()
            .zip(&self.partners)
            .enumerate()
            .filter_map(|(w, (seq, m))| Some(((*seq)?, ReviewerId::new(w), (*m)?)))
            .collect();
        log.sort_unstable_by_key(|&(seq, _, _)| seq);
        log.into_iter().map(|(_, w, m)| (w, m)).collect()
    }

    /// Every event so far, one per outer step
    #[inline]
    pub fn events(&self) -> &[ProposalEvent] {
        &self.events
    }

    /// Most recent event
    #[inline]
    pub fn last_event(&self) -> Option<ProposalEvent> {
        self.events.last().copied()
    }

    // ========================================================================
    // Mutation (engine only)
    // ========================================================================

    /// Lowest-id free proposer
    #[inline]
    pub(crate) fn next_free(&self) -> Option<ProposerId> {
        self.free.first().copied()
    }

    /// Pair `m` with `w`. `w` must be free (release her partner first).
    pub(crate) fn engage(&mut self, m: ProposerId, w: ReviewerId) {
        self.partners[w.index()] = Some(m);
        self.fiance[m.index()] = Some(w);
        self.free.remove(&m);
        self.engaged_at[w.index()] = Some(self.engagements_formed);
        self.engagements_formed += 1;
    }

    /// Break `m`'s engagement and mark him free
    pub(crate) fn release(&mut self, m: ProposerId) {
        if let Some(w) = self.fiance[m.index()].take() {
            self.partners[w.index()] = None;
            self.engaged_at[w.index()] = None;
        }
        self.free.insert(m);
    }

    /// `w` turned `m` down
    pub(crate) fn reject(&mut self, w: ReviewerId, m: ProposerId) {
        self.rejection_log[w.index()].push(m);
    }

    /// Close out one outer step: advance the proposer's cursor and log it
    pub(crate) fn record(&mut self, event: ProposalEvent) {
        self.next_choice[event.proposer().index()] += 1;
        self.events.push(event);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
