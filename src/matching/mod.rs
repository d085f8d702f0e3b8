//! Identity matching: normalization, component similarity scorers, LinkedIn
//! canonicalization and confidence aggregation.
//!
//! Everything here is pure and total. Absent or unparseable input degrades to a
//! zero score or an empty canonical form, never to an error.

pub mod confidence;
pub mod linkedin;
pub mod normalize;
pub mod similarity;

pub use confidence::{score_candidate, CandidateProfile, ConfidenceLevel, ConfidenceScore, InputSignals};
