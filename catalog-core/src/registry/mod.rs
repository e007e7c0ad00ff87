//! Type Registry - maps catalog member types to their factories
//!
//! ```text
//!  register("csv", factory)          create("csv", ctx)
//!           │                               │
//!           ▼                               ▼
//!    ┌──────────────────────────────────────────────┐
//!    │                TypeRegistry                  │
//!    │                                              │
//!    │  "csv"       -> Fn(&ctx) -> Box<dyn Member>  │
//!    │  "wms-group" -> Fn(&ctx) -> Box<dyn Member>  │
//!    │  ...                                         │
//!    └──────────────────────────────────────────────┘
//!                           │
//!                           ▼
//!              Box<dyn CatalogMember> / CatalogError
//! ```
//!
//! Duplicate registration is governed by [`RegistrationMode`]: `Replace`
//! (last one wins) or `Strict` (rejected with `DuplicateType`).

mod member;
mod types;

pub use member::{CatalogMember, ConstructionContext};
pub use types::{Factory, FactoryResult, RegistrationMode, TypeRegistry};
