//! URL resolution rules
//!
//! A [`RuleSet`] is an ordered list of `(predicate, type, speculative)`
//! entries populated once at startup. Rules fall into two tiers:
//!
//! - **Deterministic** rules carry a high-confidence syntactic signal such as
//!   a file extension. The first one that matches is authoritative.
//! - **Speculative** rules are guesses (path patterns, catch-alls) that can
//!   only be confirmed by loading data, so a failure hands off to the next one.

mod predicate;
mod rule_set;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use predicate::{match_all, matches_extension, matches_url_pattern, Predicate};
pub use rule_set::{ResolutionRule, RuleSet};

/// Which class of rule produced a set of candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Deterministic,
    Speculative,
}

impl Tier {
    pub fn of(rule: &ResolutionRule) -> Self {
        if rule.speculative {
            Tier::Speculative
        } else {
            Tier::Deterministic
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Deterministic => f.write_str("deterministic"),
            Tier::Speculative => f.write_str("speculative"),
        }
    }
}
