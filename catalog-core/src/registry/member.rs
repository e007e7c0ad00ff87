//! Catalog member collaborator contract

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BoxError;

/// A loadable catalog entity produced by a registered factory
///
/// The resolver only needs two things from a member: its type identifier
/// and a probe that confirms the member can actually interpret the data
/// at its URL. Everything else about a member is up to its type.
#[async_trait]
pub trait CatalogMember: Send + Sync + fmt::Debug {
    /// Registry key of the type that built this member
    fn type_id(&self) -> &str;

    /// Member id within its catalog
    fn id(&self) -> &str;

    /// Fetch enough metadata to confirm the data matches this type
    async fn load(&self) -> Result<(), BoxError>;
}

/// Data handed to a factory when a member is constructed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstructionContext {
    /// Id for the new member
    pub id: String,

    /// Source URL, when the member is built from one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Id of the owning catalog group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Raw configuration for the member
    #[serde(default)]
    pub properties: Value,

    /// Type currently being constructed. Set by the builder for each attempt.
    #[serde(default)]
    pub type_id: String,
}

impl ConstructionContext {
    /// Create a context with only an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Context for a member resolved from a URL; the URL doubles as its id
    pub fn for_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: url.clone(),
            url: Some(url),
            ..Default::default()
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }

    pub(crate) fn for_type(&self, type_id: &str) -> Self {
        let mut ctx = self.clone();
        ctx.type_id = type_id.to_string();
        ctx
    }
}
