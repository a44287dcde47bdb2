//! Medias Services Layer
//!
//! Business workflows over the repository and blob store traits. Keep orchestration here;
//! keep thin HTTP handling in medias-api.

pub mod deadline;
pub mod media;
pub mod tag;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(test)]
mod workflow_tests;

pub use deadline::with_deadline;
pub use media::{FinalizeOutcome, MediaService};
pub use tag::TagService;
