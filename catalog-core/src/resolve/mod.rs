//! URL resolution: from an unclassified URL to a loaded catalog member
//!
//! ## Resolution Flow
//!
//! 1. Every rule's predicate is evaluated against the URL, in rule order
//! 2. Matches split into deterministic and speculative tiers
//! 3. A deterministic match gets a single attempt and is final
//! 4. Otherwise speculative candidates are attempted in order until one loads
//! 5. Failures come back with the full ordered attempt history

mod builder;
mod engine;
mod plan;

use uuid::Uuid;

use crate::error::AttemptRecord;
use crate::rules::Tier;

pub use builder::{BuildResult, CatalogMemberBuilder};
pub use engine::ResolutionEngine;
pub use plan::{Candidate, ResolutionPlan};

/// A successfully resolved URL
#[derive(Debug)]
pub struct Resolved<M> {
    /// Correlates the log lines of this resolution
    pub resolution_id: Uuid,
    /// Type that loaded successfully
    pub type_id: String,
    /// Tier the winning rule belongs to
    pub tier: Tier,
    /// The loaded member
    pub member: M,
    /// Speculative candidates that failed before this one
    pub rejected: Vec<AttemptRecord>,
}
