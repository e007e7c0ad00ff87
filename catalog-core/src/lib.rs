//! # Catalog Core - catalog member type resolution
//!
//! Given a URL and no prior knowledge of the data behind it, decide which
//! catalog member type should handle it and construct that member.
//!
//! - **TypeRegistry**: type identifier -> factory
//! - **RuleSet**: ordered URL rules, each deterministic or speculative
//! - **ResolutionEngine**: plans candidates and runs the try/fallback protocol
//! - **CatalogMemberBuilder**: registry + engine, one call from URL to member
//!
//! ## Core Principle
//!
//! > Trust syntax, verify guesses.
//!
//! A file extension is authoritative and gets exactly one attempt. Path
//! patterns and catch-alls are guesses, and each one must prove itself by
//! loading before the next is tried.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use catalog_core::{builtins, ResolutionEngine, Tier};
//!
//! let engine = ResolutionEngine::new(Arc::new(builtins::default_rules().unwrap()));
//!
//! let plan = engine.plan("https://example.com/data/parcels.geojson");
//! assert_eq!(plan.tier, Some(Tier::Deterministic));
//! assert_eq!(plan.type_ids(), vec!["geojson"]);
//!
//! let plan = engine.plan("https://example.com/geoserver/wms");
//! assert_eq!(plan.tier, Some(Tier::Speculative));
//! assert_eq!(plan.type_ids()[0], "wms-group");
//! ```

pub mod builtins;
pub mod config;
pub mod error;
pub mod registry;
pub mod resolve;
pub mod rules;

// Re-export main types
pub use config::{MatchSpec, ResolverConfig, RuleSpec};
pub use error::{
    AttemptRecord, BoxError, CatalogError, ErrorCategory, ErrorDetail, ErrorResponse,
    ResolutionFailure, Result,
};
pub use registry::{
    CatalogMember, ConstructionContext, Factory, FactoryResult, RegistrationMode, TypeRegistry,
};
pub use resolve::{
    BuildResult, Candidate, CatalogMemberBuilder, ResolutionEngine, ResolutionPlan, Resolved,
};
pub use rules::{
    match_all, matches_extension, matches_url_pattern, Predicate, ResolutionRule, RuleSet, Tier,
};
pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Member whose probe succeeds only for the types listed in `accepts`
    #[derive(Debug)]
    struct ProbeMember {
        type_id: String,
        id: String,
        accepts: &'static [&'static str],
    }

    #[async_trait]
    impl CatalogMember for ProbeMember {
        fn type_id(&self) -> &str {
            &self.type_id
        }

        fn id(&self) -> &str {
            &self.id
        }

        async fn load(&self) -> std::result::Result<(), BoxError> {
            if self.accepts.contains(&self.type_id.as_str()) {
                Ok(())
            } else {
                Err(format!("{} is not a {} endpoint", self.id, self.type_id).into())
            }
        }
    }

    fn builder(accepts: &'static [&'static str]) -> CatalogMemberBuilder {
        let mut registry = TypeRegistry::new();
        for type_id in builtins::rule_types() {
            let factory = move |ctx: &ConstructionContext| -> FactoryResult {
                Ok(Box::new(ProbeMember {
                    type_id: ctx.type_id.clone(),
                    id: ctx.id.clone(),
                    accepts,
                }))
            };
            registry.register(type_id, factory).unwrap();
        }
        CatalogMemberBuilder::with_default_rules(Arc::new(registry)).unwrap()
    }

    #[tokio::test]
    async fn test_full_workflow() {
        let builder = builder(&["esri-group"]);

        let resolved = builder
            .resolve("https://example.com/arcgis/rest/services/Foo/MapServer")
            .await
            .unwrap();

        assert_eq!(resolved.type_id, "esri-group");
        assert_eq!(resolved.tier, Tier::Speculative);
        assert_eq!(resolved.member.type_id(), "esri-group");
        assert_eq!(
            resolved.member.id(),
            "https://example.com/arcgis/rest/services/Foo/MapServer"
        );
        let rejected: Vec<&str> = resolved.rejected.iter().map(|a| a.type_id.as_str()).collect();
        assert_eq!(rejected, vec!["esri-mapServer-group"]);
    }

    #[tokio::test]
    async fn test_extension_failure_is_final() {
        // Every type but geojson would load; the .geojson URL must not fall back
        let builder = builder(&["wms-group", "esri-group", "csv"]);

        let failure = builder
            .resolve("https://example.com/data.geojson")
            .await
            .unwrap_err();

        assert_eq!(failure.attempted_type_ids(), vec!["geojson"]);
        assert_eq!(failure.error_code(), "RESOLUTION_EXHAUSTED");
        assert!(failure.to_string().contains("geojson"));
    }
}
