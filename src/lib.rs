//! # contentfold
//!
//! Core of a plugin-driven headless CMS.
//!
//! * [`plugins`] holds the field type registry and the storage transform
//!   registry.
//! * [`graphql`] projects content models into GraphQL SDL, builds per-field
//!   resolvers and serves the locale API.
//! * [`db_operations`] persists files and locales in an embedded store.
//! * [`schema`] defines content models and their editing and validation.
//! * [`i18n`] manages the locales of a tenant.
//!
//! Registries are built once, wrapped in `Arc` and handed to the projector,
//! the resolver factory and each request's [`CmsContext`].

pub mod config;
pub mod context;
pub mod db_operations;
pub mod error;
pub mod graphql;
pub mod i18n;
pub mod logging;
pub mod permissions;
pub mod plugins;
pub mod schema;

pub use config::{load_cms_config, CmsConfig, ConfigError};
pub use context::CmsContext;
pub use db_operations::{DbOperations, File, FilesStorageOperations, StorageError};
pub use error::{CmsError, CmsResult};
pub use graphql::{ResolverFactory, SchemaProjector};
pub use i18n::I18nService;
pub use permissions::{Identity, Permission, SecurityContext};
pub use plugins::{Endpoint, FieldTypePlugin, FieldTypeRegistry, StorageTransformRegistry};
pub use schema::{ContentEntry, ContentModel, ContentModelValidator, FieldDefinition};
