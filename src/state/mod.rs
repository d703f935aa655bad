//! State module for tracking per-source harvest progress
//!
//! # Components
//!
//! - `SourceStage`: the stages a source passes through while it is harvested
//! - `StageTracker`: follows one source through those stages and traces each transition

mod source_stage;

// Re-export main types
pub use source_stage::{SourceStage, StageTracker};
