use raidsim_core::{CachedResolver, IconRegistry, IdentityResolver, SimResult, ViewerConfig, ViewerConfigExt};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// Holds all shared state for the CLI.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<ViewerConfig>>,
    resolver: Arc<CachedResolver<IconRegistry>>,
    /// The loaded result. None until `load` succeeds.
    result: Arc<RwLock<Option<Arc<SimResult>>>>,
}

impl CliContext {
    pub fn new() -> Self {
        let config = ViewerConfig::load();
        let registry = config.icon_registry().unwrap_or_else(|err| {
            warn!(error = %err, "Icon database unavailable, naming actions by id");
            IconRegistry::new().with_icon_base_url(config.icon_base_url.clone())
        });
        Self {
            config: Arc::new(RwLock::new(config)),
            resolver: Arc::new(CachedResolver::new(registry)),
            result: Arc::new(RwLock::new(None)),
        }
    }

    pub fn resolver(&self) -> &dyn IdentityResolver {
        self.resolver.as_ref()
    }

    /// Replaces the loaded result.
    pub async fn set_result(&self, result: SimResult) {
        *self.result.write().await = Some(Arc::new(result));
    }

    pub async fn result(&self) -> Result<Arc<SimResult>, String> {
        self.result
            .read()
            .await
            .clone()
            .ok_or_else(|| "No result loaded. Use `load --path <file>` first.".to_string())
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
