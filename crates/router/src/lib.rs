//! The routing decision pipeline.
//!
//! ```text
//! RouteInput ─▶ filter ─▶ prompt ─▶ Provider ─▶ normalize ─▶ RouteResult
//! ```
//!
//! [`Router`] sequences the stages and always produces a [`DecisionTrace`],
//! whether the call succeeded, was skipped, or failed.

pub mod engine;
pub mod filter;
pub mod normalize;
pub mod prompt;

pub use engine::{DecisionTrace, Router};
pub use filter::{CatalogPartition, partition};
pub use normalize::normalize;
pub use prompt::build_prompt;
