//! # Stable Matching
//!
//! Deterministic, resumable Gale-Shapley stable matching.
//!
//! ## Architecture
//!
//! The kernel consists of:
//! - **Types**: Participant ids, the validated preference model, receipts
//! - **Engine**: Deferred acceptance, batch and stepwise
//! - **Config**: Command line configuration for the simulation binary
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **Typed Sides**: Proposers and reviewers never share an id type
//! 3. **Eager Validation**: Malformed preferences are rejected at construction
//! 4. **Caller-Owned State**: Stepwise runs pause by handing the state back
//!
//! ## Complexity
//!
//! - Run to completion: at most n^2 proposals, O(1) per decision
//! - Stepwise: O(k) for k new proposals, replays from scratch on rewind

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: ids, PreferenceModel, MatchingReceipt
pub mod types;

/// Matching engine: batch and stepwise deferred acceptance
pub mod engine;

/// Simulation configuration
pub mod config;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{MatchError, MatchingReceipt, Participant, PreferenceModel, ProposerId, ReviewerId};
pub use engine::{advance_step, run_to_completion, EngineState, Matching, MatchingEngine, StepSnapshot};
pub use config::{ConfigError, SimulationConfig};
