use std::sync::Arc;

use crate::config::Config;
use crate::generation::pipeline::GenerationPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The generation pipeline owns the provider, cache, dispatch queue, and
    /// history. Shared rather than per-request so cancellation and cache
    /// state span requests.
    pub pipeline: Arc<GenerationPipeline>,
    pub config: Config,
}
