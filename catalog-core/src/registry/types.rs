//! Type registry implementation

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{BoxError, CatalogError, Result};

use super::member::{CatalogMember, ConstructionContext};

/// Factory that builds a member from a construction context
pub type Factory = Arc<dyn Fn(&ConstructionContext) -> FactoryResult + Send + Sync>;

/// What a factory returns
pub type FactoryResult = std::result::Result<Box<dyn CatalogMember>, BoxError>;

/// What happens when a type identifier is registered twice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationMode {
    /// The last registration wins
    #[default]
    Replace,
    /// A second registration fails with `DuplicateType`
    Strict,
}

/// Table from type identifier to factory
///
/// Built once by the application's composition root, then shared read-only
/// (usually behind an `Arc`). Holds factories only, never instances.
#[derive(Default)]
pub struct TypeRegistry {
    /// Factories by type identifier
    factories: HashMap<String, Factory>,

    /// Type identifiers in first-registration order
    order: Vec<String>,

    mode: RegistrationMode,
}

impl TypeRegistry {
    /// Create a registry where re-registration replaces the old factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that rejects duplicate registrations
    pub fn strict() -> Self {
        Self::with_mode(RegistrationMode::Strict)
    }

    pub fn with_mode(mode: RegistrationMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> RegistrationMode {
        self.mode
    }

    /// Register a factory under `type_id`
    pub fn register<F>(&mut self, type_id: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn(&ConstructionContext) -> FactoryResult + Send + Sync + 'static,
    {
        self.register_factory(type_id, Arc::new(factory))
    }

    /// Register an already-shared factory under `type_id`
    pub fn register_factory(&mut self, type_id: impl Into<String>, factory: Factory) -> Result<()> {
        let type_id = type_id.into();

        if self.factories.contains_key(&type_id) {
            match self.mode {
                RegistrationMode::Strict => {
                    return Err(CatalogError::DuplicateType { type_id });
                }
                RegistrationMode::Replace => {
                    tracing::debug!(type_id = %type_id, "replacing registered factory");
                }
            }
        } else {
            self.order.push(type_id.clone());
        }

        self.factories.insert(type_id, factory);
        Ok(())
    }

    /// Construct a member of `type_id`
    ///
    /// The factory always sees `type_id` in its context, whatever the
    /// caller left in `ctx.type_id`.
    pub fn create(
        &self,
        type_id: &str,
        ctx: &ConstructionContext,
    ) -> Result<Box<dyn CatalogMember>> {
        let factory = self
            .factories
            .get(type_id)
            .ok_or_else(|| CatalogError::UnknownType {
                type_id: type_id.to_string(),
            })?;

        factory(&ctx.for_type(type_id)).map_err(|cause| CatalogError::Construction {
            type_id: type_id.to_string(),
            reason: cause.to_string(),
        })
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.factories.contains_key(type_id)
    }

    /// Registered type identifiers, in first-registration order
    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.order)
            .field("mode", &self.mode)
            .finish()
    }
}
