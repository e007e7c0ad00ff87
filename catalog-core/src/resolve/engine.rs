//! Resolution Engine - the try/fallback protocol
//!
//! The engine turns a URL into a [`ResolutionPlan`] and then walks it one
//! candidate at a time, awaiting each `attempt_load` before starting the
//! next:
//!
//! - a deterministic plan gets exactly one attempt, success or not
//! - a speculative plan stops at the first success and records every
//!   failure on the way
//!
//! Cancellation is checked before each candidate and raced against the
//! attempt in flight. A cancelled attempt future is dropped, never polled
//! again.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AttemptRecord, ResolutionFailure, Result};
use crate::rules::{RuleSet, Tier};

use super::plan::ResolutionPlan;
use super::Resolved;

/// Rule-driven resolver over a shared, read-only [`RuleSet`]
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    rules: Arc<RuleSet>,
}

impl ResolutionEngine {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Candidates that `resolve_with` would attempt for `url`, without
    /// attempting any of them
    pub fn plan(&self, url: &str) -> ResolutionPlan {
        ResolutionPlan::build(&self.rules, url)
    }

    /// Resolve `url` by attempting candidates through `attempt_load`
    ///
    /// `attempt_load` receives the candidate type identifier and should
    /// construct the member and confirm it can load the URL.
    pub async fn resolve_with<M, F, Fut>(
        &self,
        url: &str,
        cancel: &CancellationToken,
        attempt_load: F,
    ) -> std::result::Result<Resolved<M>, ResolutionFailure>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<M>>,
    {
        let resolution_id = Uuid::new_v4();
        let span = tracing::info_span!("resolve", %url, %resolution_id);
        self.run(url, resolution_id, cancel, attempt_load)
            .instrument(span)
            .await
    }

    async fn run<M, F, Fut>(
        &self,
        url: &str,
        resolution_id: Uuid,
        cancel: &CancellationToken,
        mut attempt_load: F,
    ) -> std::result::Result<Resolved<M>, ResolutionFailure>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<M>>,
    {
        let plan = self.plan(url);
        let Some(tier) = plan.tier else {
            tracing::debug!("no resolution rule matched");
            return Err(ResolutionFailure::NoRuleMatched {
                url: url.to_string(),
            });
        };

        let mut rejected: Vec<AttemptRecord> = Vec::new();

        for candidate in plan.candidates {
            if cancel.is_cancelled() {
                tracing::debug!(attempted = rejected.len(), "resolution cancelled");
                return Err(ResolutionFailure::Cancelled {
                    url: url.to_string(),
                    attempts: rejected,
                });
            }

            tracing::debug!(
                type_id = %candidate.type_id,
                rule_order = candidate.rule_order,
                %tier,
                "attempting candidate"
            );

            let started_at = Utc::now();
            let clock = Instant::now();

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(
                        type_id = %candidate.type_id,
                        "resolution cancelled during attempt"
                    );
                    return Err(ResolutionFailure::Cancelled {
                        url: url.to_string(),
                        attempts: rejected,
                    });
                }
                outcome = attempt_load(candidate.type_id.clone()) => outcome,
            };

            match outcome {
                Ok(member) => {
                    tracing::info!(
                        type_id = %candidate.type_id,
                        %tier,
                        rejected = rejected.len(),
                        "resolved catalog member type"
                    );
                    return Ok(Resolved {
                        resolution_id,
                        type_id: candidate.type_id,
                        tier,
                        member,
                        rejected,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        type_id = %candidate.type_id,
                        %tier,
                        code = error.error_code(),
                        "candidate rejected: {}",
                        error
                    );
                    rejected.push(AttemptRecord {
                        type_id: candidate.type_id,
                        rule_order: candidate.rule_order,
                        error,
                        started_at,
                        elapsed_ms: clock.elapsed().as_millis() as u64,
                    });
                    if tier == Tier::Deterministic {
                        break;
                    }
                }
            }
        }

        Err(ResolutionFailure::Exhausted {
            url: url.to_string(),
            tier,
            attempts: rejected,
        })
    }
}
