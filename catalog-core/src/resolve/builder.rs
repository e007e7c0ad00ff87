//! Catalog member builder - registry plus resolution engine

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::builtins;
use crate::config::ResolverConfig;
use crate::error::{CatalogError, ResolutionFailure, Result};
use crate::registry::{CatalogMember, ConstructionContext, TypeRegistry};
use crate::rules::RuleSet;

use super::{ResolutionEngine, ResolutionPlan, Resolved};

/// Result of resolving a URL into a loaded member
pub type BuildResult = std::result::Result<Resolved<Box<dyn CatalogMember>>, ResolutionFailure>;

/// Builds catalog members from URLs
///
/// Each attempt constructs the candidate through the [`TypeRegistry`] and
/// then runs the member's own `load` probe. Both the registry and the rule
/// set are shared read-only, so one builder can serve any number of
/// concurrent resolutions.
#[derive(Debug, Clone)]
pub struct CatalogMemberBuilder {
    registry: Arc<TypeRegistry>,
    engine: ResolutionEngine,
}

impl CatalogMemberBuilder {
    pub fn new(registry: Arc<TypeRegistry>, rules: Arc<RuleSet>) -> Self {
        Self {
            registry,
            engine: ResolutionEngine::new(rules),
        }
    }

    /// Build a registry and rule set from configuration
    ///
    /// `register` populates the registry with the application's factories.
    /// Rules that target a type with no factory are logged, or rejected
    /// under strict registration.
    pub fn from_config<F>(config: &ResolverConfig, register: F) -> Result<Self>
    where
        F: FnOnce(&mut TypeRegistry) -> Result<()>,
    {
        let mut registry = TypeRegistry::with_mode(config.registration_mode());
        register(&mut registry)?;

        let rules = config.build_rule_set()?;
        let missing = rules.unregistered_types(&registry);
        if !missing.is_empty() {
            if config.strict_registration {
                return Err(CatalogError::InvalidRule {
                    reason: format!("rules target unregistered types: {}", missing.join(", ")),
                });
            }
            for type_id in &missing {
                tracing::warn!(type_id = %type_id, "resolution rule targets an unregistered type");
            }
        }

        tracing::info!(
            types = registry.len(),
            rules = rules.len(),
            defaults = config.include_default_rules,
            "catalog member builder ready"
        );

        Ok(Self::new(Arc::new(registry), Arc::new(rules)))
    }

    /// Registry with the builtin rule table and no factories yet
    pub fn with_default_rules(registry: Arc<TypeRegistry>) -> Result<Self> {
        Ok(Self::new(registry, Arc::new(builtins::default_rules()?)))
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    /// Candidates that would be attempted for `url`
    pub fn plan(&self, url: &str) -> ResolutionPlan {
        self.engine.plan(url)
    }

    /// Construct a member of a known type, skipping resolution
    pub fn create(
        &self,
        type_id: &str,
        ctx: &ConstructionContext,
    ) -> Result<Box<dyn CatalogMember>> {
        self.registry.create(type_id, ctx)
    }

    /// Resolve `url` to a loaded member
    pub async fn resolve(&self, url: &str) -> BuildResult {
        self.resolve_cancellable(url, &CancellationToken::new()).await
    }

    /// Resolve `url`, giving up as soon as `cancel` fires
    pub async fn resolve_cancellable(&self, url: &str, cancel: &CancellationToken) -> BuildResult {
        self.resolve_in(url, ConstructionContext::for_url(url), cancel).await
    }

    /// Resolve `url` with a caller-supplied construction context
    pub async fn resolve_in(
        &self,
        url: &str,
        mut ctx: ConstructionContext,
        cancel: &CancellationToken,
    ) -> BuildResult {
        if ctx.url.is_none() {
            ctx.url = Some(url.to_string());
        }

        self.engine
            .resolve_with(url, cancel, |type_id| {
                let registry = Arc::clone(&self.registry);
                let ctx = ctx.clone();
                async move {
                    let member = registry.create(&type_id, &ctx)?;
                    member.load().await.map_err(|cause| CatalogError::Load {
                        type_id,
                        reason: cause.to_string(),
                    })?;
                    Ok(member)
                }
            })
            .await
    }
}
