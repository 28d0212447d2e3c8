//! Request-scoped context handed to every resolver.

use crate::permissions::SecurityContext;
use crate::plugins::StorageTransformRegistry;
use std::sync::Arc;

/// Tenant, locale and caller of one request, plus the shared storage
/// transforms. The registry is built at start-up and only read afterwards.
#[derive(Clone)]
pub struct CmsContext {
    pub tenant: String,
    pub locale: String,
    pub security: SecurityContext,
    transforms: Arc<StorageTransformRegistry>,
}

impl CmsContext {
    pub fn new(
        tenant: impl Into<String>,
        locale: impl Into<String>,
        transforms: Arc<StorageTransformRegistry>,
    ) -> Self {
        let tenant = tenant.into();
        Self {
            security: SecurityContext::new(tenant.clone()),
            tenant,
            locale: locale.into(),
            transforms,
        }
    }

    /// Context with the built-in storage transforms.
    pub fn with_builtins(tenant: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::new(
            tenant,
            locale,
            Arc::new(StorageTransformRegistry::with_builtin_transforms()),
        )
    }

    pub fn with_security(mut self, security: SecurityContext) -> Self {
        self.security = security;
        self
    }

    pub fn transforms(&self) -> &Arc<StorageTransformRegistry> {
        &self.transforms
    }
}
