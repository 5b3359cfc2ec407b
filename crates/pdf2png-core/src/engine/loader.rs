//! Lazily loaded, shared engine handle.

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::{EngineProvider, Result};
use crate::models::config::{DEFAULT_FALLBACK_WORKER_SRC, EngineConfig};

/// Loads an engine on first use and hands out the same handle afterwards.
///
/// Concurrent callers that arrive while the first load is in flight wait for
/// it instead of starting their own. A failed load leaves the loader empty,
/// so the next caller tries again.
pub struct EngineLoader<P: EngineProvider> {
    provider: P,
    worker_src: Option<String>,
    fallback_worker_src: String,
    engine: OnceCell<P::Engine>,
}

impl<P: EngineProvider> EngineLoader<P> {
    /// Create a loader using the provider's own worker resolution.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            worker_src: None,
            fallback_worker_src: DEFAULT_FALLBACK_WORKER_SRC.to_string(),
            engine: OnceCell::new(),
        }
    }

    /// Create a loader honoring an explicit worker location and fallback.
    pub fn with_config(provider: P, config: &EngineConfig) -> Self {
        Self {
            provider,
            worker_src: config.worker_src.clone(),
            fallback_worker_src: config.fallback_worker_src.clone(),
            engine: OnceCell::new(),
        }
    }

    /// The provider this loader loads from.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Whether the engine has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.engine.initialized()
    }

    /// Worker location the engine is configured with.
    ///
    /// Never fails: a resolution error falls back to the static location.
    pub fn worker_src(&self) -> String {
        if let Some(src) = &self.worker_src {
            return src.clone();
        }
        match self.provider.resolve_worker_src() {
            Ok(src) => src,
            Err(e) => {
                debug!(
                    "Worker location unresolved ({}), using {}",
                    e, self.fallback_worker_src
                );
                self.fallback_worker_src.clone()
            }
        }
    }

    /// Get the engine, loading it if needed.
    pub async fn get(&self) -> Result<&P::Engine> {
        self.engine
            .get_or_try_init(|| async {
                let worker_src = self.worker_src();
                info!("Loading PDF engine (worker: {})", worker_src);
                self.provider.load(&worker_src).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::testing::MockProvider;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_loads_once() {
        let loader = EngineLoader::new(MockProvider::new());
        assert!(!loader.is_loaded());

        let first = loader.get().await.unwrap() as *const _;
        let second = loader.get().await.unwrap() as *const _;

        assert_eq!(first, second);
        assert_eq!(loader.provider().load_count(), 1);
        assert!(loader.is_loaded());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_load() {
        let loader = EngineLoader::new(MockProvider::new());

        let (a, b, c) = tokio::join!(loader.get(), loader.get(), loader.get());

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(loader.provider().load_count(), 1);
    }

    #[tokio::test]
    async fn test_worker_falls_back_when_unresolved() {
        let provider = MockProvider::new().with_unresolvable_worker();
        let loader = EngineLoader::new(provider);

        assert_eq!(loader.worker_src(), "/pdf.worker.min.mjs");

        let engine = loader.get().await.unwrap();
        assert_eq!(engine.worker_src, "/pdf.worker.min.mjs");
    }

    #[tokio::test]
    async fn test_explicit_worker_wins() {
        let config = EngineConfig {
            worker_src: Some("/static/worker.js".to_string()),
            ..EngineConfig::default()
        };
        let loader = EngineLoader::with_config(MockProvider::new(), &config);

        assert_eq!(loader.get().await.unwrap().worker_src, "/static/worker.js");
    }

    #[tokio::test]
    async fn test_resolved_worker_used() {
        let loader = EngineLoader::new(MockProvider::new());
        assert_eq!(loader.worker_src(), MockProvider::WORKER_SRC);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let provider = MockProvider::new().failing_loads(1);
        let loader = EngineLoader::new(provider);

        let err = loader.get().await.unwrap_err();
        assert_eq!(err, PdfError::EngineLoad("import failed".to_string()));
        assert!(!loader.is_loaded());

        assert!(loader.get().await.is_ok());
        assert_eq!(loader.provider().load_count(), 2);
    }
}
