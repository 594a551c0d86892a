//! Matching engine module.
//!
//! ## Design Principles
//!
//! The engine is designed for:
//!
//! 1. **Determinism**: Same preferences always produce the same event sequence
//! 2. **Resumability**: All run state lives in a caller-owned [`EngineState`]
//! 3. **Synchronous Execution**: Each call is a bounded, single-threaded computation
//! 4. **Proposer Priority**: The lowest-id free proposer always moves next
//!
//! ## Two Ways to Run
//!
//! - [`run_to_completion`]: batch, returns the stable [`Matching`]
//! - [`advance_step`]: stepwise, returns the state and a [`StepSnapshot`]
//!   after a requested number of proposals
//!
//! Both produce identical matchings on identical input.
//!
//! ## Example
//!
//! ```
//! use stable_matching::engine::{run_to_completion, MatchingEngine};
//! use stable_matching::types::{PreferenceModel, ProposerId, ReviewerId};
//!
//! let model = PreferenceModel::from_matrix(&[
//!     vec![2usize, 3],
//!     vec![3, 2],
//!     vec![1, 0],
//!     vec![0, 1],
//! ]).unwrap();
//!
//! let matching = run_to_completion(&model).unwrap();
//! assert_eq!(matching.partner_of_proposer(ProposerId::new(0)), Some(ReviewerId::new(0)));
//! assert_eq!(matching.partner_of_proposer(ProposerId::new(1)), Some(ReviewerId::new(1)));
//! assert!(matching.is_stable(&model).unwrap());
//! ```

pub mod event;
pub mod matcher;
pub mod matching;
pub mod state;
pub mod stepper;

pub use event::{ProposalEvent, RawProposalEvent};
pub use matcher::{run_to_completion, MatchingEngine};
pub use matching::Matching;
pub use state::{EngineState, ProposerStatus};
pub use stepper::{advance_request, advance_step, StepRequest, StepSnapshot};
