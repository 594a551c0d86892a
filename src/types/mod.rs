//! Core data types for the matching kernel
//!
//! ## Types
//!
//! - [`ProposerId`] / [`ReviewerId`]: typed side-local participant ids
//! - [`Participant`]: tagged union over both sides, converts to raw ids
//! - [`PreferenceModel`]: validated preference matrix with rank tables
//! - [`PreferenceSource`]: pluggable producer of raw matrices
//! - [`MatchingReceipt`]: digest summary of a completed run
//! - [`MatchError`]: error taxonomy
//!
//! ## Raw Ids
//!
//! Outside the crate participants are plain integers in `0..2n`; proposers
//! occupy `0..n` and reviewers `n..2n`. Inside the crate the two sides never
//! share a type.

mod error;
mod participant;
mod preference;
mod receipt;
pub mod generator;

// Re-export all types at module level
pub use error::{MatchError, Result};
pub use participant::{Participant, ProposerId, ReviewerId};
pub use preference::PreferenceModel;
pub use receipt::MatchingReceipt;
pub use generator::{FixedPreferences, PreferenceSource, RandomPreferences};
