//! Generation pipeline: validation, caching, bounded fan-out, scoring, and
//! history.
//!
//! All mutable state lives inside [`GenerationPipeline`], which is shared as
//! an `Arc` through application state. Cancellation is cooperative: every run
//! takes a ticket from a monotonically increasing sequence, and cancelling
//! raises a watermark that invalidates all tickets issued so far. In-flight
//! provider calls finish but their results are discarded and never cached.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::generation::cache::{self, CacheStats, ResultCache};
use crate::generation::prompts::{build_platform_prompt, GENERATION_SYSTEM};
use crate::generation::queue::DispatchQueue;
use crate::generation::retry::{with_retry, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};
use crate::llm_client::{ContentProvider, MODEL};
use crate::models::brand::{validate_minimal, validate_strict, BrandProfile, ContentBrief, MissingFieldError};
use crate::models::platform::Platform;
use crate::models::result::{GenerationResult, PlatformResults};
use crate::scoring;

const HISTORY_CAP: usize = 50;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] MissingFieldError),

    #[error("content generation cancelled")]
    Cancelled,
}

/// Options for a fan-out run. Defaults score every success and record the
/// run in history.
#[derive(Clone)]
pub struct GenerateOptions {
    pub include_scoring: bool,
    pub save_to_history: bool,
    /// When set, receives one event per settled platform. Send failures are
    /// ignored; a dropped receiver never stalls generation.
    pub progress: Option<UnboundedSender<ProgressEvent>>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            include_scoring: true,
            save_to_history: true,
            progress: None,
        }
    }
}

/// Emitted after each platform settles, success or failure.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub platform: Platform,
    /// Percentage of platforms settled so far.
    pub progress: u8,
    pub completed: usize,
    pub total: usize,
}

/// One completed fan-out run, newest first in the history buffer.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub brand_profile: BrandProfile,
    pub content_brief: ContentBrief,
    pub results: PlatformResults,
}

pub struct GenerationPipeline {
    provider: Arc<dyn ContentProvider>,
    cache: ResultCache,
    queue: DispatchQueue,
    generation_seq: AtomicU64,
    cancelled_through: AtomicU64,
    history: Mutex<VecDeque<HistoryEntry>>,
    next_history_id: AtomicU64,
}

impl GenerationPipeline {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self::with_settings(provider, ResultCache::default(), DispatchQueue::default())
    }

    /// Construction seam for tests that need a small cache or queue.
    pub fn with_settings(
        provider: Arc<dyn ContentProvider>,
        cache: ResultCache,
        queue: DispatchQueue,
    ) -> Self {
        Self {
            provider,
            cache,
            queue,
            generation_seq: AtomicU64::new(0),
            cancelled_through: AtomicU64::new(0),
            history: Mutex::new(VecDeque::new()),
            next_history_id: AtomicU64::new(1),
        }
    }

    fn begin_generation(&self) -> u64 {
        self.generation_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// A ticket stays valid while it is the newest one and the cancel
    /// watermark has not passed it.
    fn is_current(&self, ticket: u64) -> bool {
        ticket == self.generation_seq.load(Ordering::SeqCst)
            && ticket > self.cancelled_through.load(Ordering::SeqCst)
    }

    /// Invalidates every ticket issued so far. In-flight work completes but
    /// its results are discarded.
    pub fn cancel_generation(&self) {
        let current = self.generation_seq.load(Ordering::SeqCst);
        self.cancelled_through.store(current, Ordering::SeqCst);
        info!(through = current, "generation cancelled");
    }

    /// Generates content for every platform concurrently. Per-platform
    /// provider failures become failure entries in the result map; only
    /// invalid input or cancellation fails the run as a whole.
    pub async fn generate_all(
        &self,
        profile: &BrandProfile,
        brief: &ContentBrief,
        options: &GenerateOptions,
    ) -> Result<PlatformResults, PipelineError> {
        validate_strict(profile, brief)?;

        let ticket = self.begin_generation();
        let total = Platform::ALL.len();
        let completed = AtomicUsize::new(0);
        info!(company = %profile.company_name, topic = %brief.topic, "starting fan-out generation");

        let futures = Platform::ALL.map(|platform| {
            let completed = &completed;
            let progress = options.progress.as_ref();
            async move {
                let result = self
                    .run_platform(profile, brief, platform, ticket, options.include_scoring)
                    .await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(tx) = progress {
                    let _ = tx.send(ProgressEvent {
                        platform,
                        progress: (done * 100 / total) as u8,
                        completed: done,
                        total,
                    });
                }
                (platform, result)
            }
        });

        let settled = join_all(futures).await;

        if !self.is_current(ticket) {
            return Err(PipelineError::Cancelled);
        }

        let results: PlatformResults = settled.into_iter().collect();
        let failures = results.values().filter(|r| !r.is_success()).count();
        info!(platforms = total, failures, "fan-out generation complete");

        if options.save_to_history {
            self.push_history(profile.clone(), brief.clone(), results.clone());
        }
        Ok(results)
    }

    /// Generates for one platform. Accepts a profile without example posts.
    pub async fn generate_for_platform(
        &self,
        profile: &BrandProfile,
        brief: &ContentBrief,
        platform: Platform,
        include_scoring: bool,
    ) -> Result<GenerationResult, PipelineError> {
        validate_minimal(profile, brief)?;
        let ticket = self.begin_generation();
        let result = self
            .run_platform(profile, brief, platform, ticket, include_scoring)
            .await;
        if !self.is_current(ticket) {
            return Err(PipelineError::Cancelled);
        }
        Ok(result)
    }

    /// Drops any cached result for the platform and generates fresh content.
    pub async fn regenerate_platform(
        &self,
        profile: &BrandProfile,
        brief: &ContentBrief,
        platform: Platform,
        include_scoring: bool,
    ) -> Result<GenerationResult, PipelineError> {
        self.cache.remove(&cache::generate_key(profile, brief, platform));
        self.generate_for_platform(profile, brief, platform, include_scoring)
            .await
    }

    async fn run_platform(
        &self,
        profile: &BrandProfile,
        brief: &ContentBrief,
        platform: Platform,
        ticket: u64,
        include_scoring: bool,
    ) -> GenerationResult {
        let key = cache::generate_key(profile, brief, platform);
        if let Some(hit) = self.cache.get(&key) {
            debug!(platform = %platform, "cache hit");
            return hit;
        }

        let prompt = build_platform_prompt(profile, brief, platform);
        let provider = &self.provider;
        let generated = self
            .queue
            .enqueue(|| async {
                with_retry(
                    || provider.generate(GENERATION_SYSTEM, &prompt),
                    DEFAULT_MAX_RETRIES,
                    DEFAULT_BASE_DELAY,
                )
                .await
            })
            .await;

        let result = match generated {
            Ok(text) => {
                let mut result = GenerationResult::success(platform, text.content);
                result.model = Some(MODEL.to_string());
                if include_scoring {
                    self.attach_scoring(&mut result, profile, brief, platform);
                }
                result
            }
            Err(err) => {
                warn!(platform = %platform, error = %err, "platform generation failed");
                GenerationResult::failure(platform, err.to_string())
            }
        };

        // Never cache results from a superseded or cancelled run, and never
        // cache failures.
        if result.is_success() && self.is_current(ticket) {
            self.cache.set(key, result.clone());
        }
        result
    }

    fn attach_scoring(
        &self,
        result: &mut GenerationResult,
        profile: &BrandProfile,
        brief: &ContentBrief,
        platform: Platform,
    ) {
        let content = match result.content.as_deref() {
            Some(content) => content,
            None => return,
        };
        let analysis = scoring::analyze(content, profile, brief, Some(platform.as_str()));
        match analysis.score.validate() {
            Ok(()) => {
                result.brand_voice_score = Some(analysis.score.overall_score);
                result.brand_voice_analysis = Some(analysis);
            }
            Err(err) => {
                warn!(platform = %platform, error = %err, "scoring failed");
                result.scoring_error = Some(err.to_string());
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Cache and history surface
    // ────────────────────────────────────────────────────────────────────────

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn push_history(
        &self,
        brand_profile: BrandProfile,
        content_brief: ContentBrief,
        results: PlatformResults,
    ) {
        let entry = HistoryEntry {
            id: self.next_history_id.fetch_add(1, Ordering::SeqCst),
            timestamp: Utc::now(),
            brand_profile,
            content_brief,
            results,
        };
        let mut history = self.history.lock().expect("history lock poisoned");
        history.push_front(entry);
        history.truncate(HISTORY_CAP);
    }

    /// Recorded runs, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history
            .lock()
            .expect("history lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    pub fn latest_history(&self) -> Option<HistoryEntry> {
        self.history
            .lock()
            .expect("history lock poisoned")
            .front()
            .cloned()
    }

    pub fn clear_history(&self) {
        self.history.lock().expect("history lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{GeneratedText, ProviderError};
    use async_trait::async_trait;

    fn profile() -> BrandProfile {
        BrandProfile {
            company_name: "EcoThreads".to_string(),
            industry: "Fashion".to_string(),
            tone: "Inspiring".to_string(),
            target_audience: "Eco-conscious millennials".to_string(),
            example_post_1: "Every thread tells a story of our journey.".to_string(),
            example_post_2: "Together we transform fashion for good.".to_string(),
            keywords: None,
        }
    }

    fn brief() -> ContentBrief {
        ContentBrief {
            topic: "New organic cotton collection launch".to_string(),
            cta: Some("Shop the collection now".to_string()),
            keywords: Some("sustainable, organic, eco-friendly, fashion".to_string()),
        }
    }

    fn post_text() -> String {
        "EcoThreads' journey: transform, empower, achieve growth. \
         Our sustainable organic eco-friendly fashion vision. \
         Check out now! #sustainable #organic #fashion"
            .to_string()
    }

    struct StaticProvider {
        calls: AtomicUsize,
    }

    impl StaticProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentProvider for StaticProvider {
        async fn generate(&self, _: &str, _: &str) -> Result<GeneratedText, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GeneratedText {
                content: post_text(),
                total_tokens: Some(140),
            })
        }
    }

    /// Fails Twitter prompts with a non-retryable error, succeeds elsewhere.
    struct FailingProvider;

    #[async_trait]
    impl ContentProvider for FailingProvider {
        async fn generate(&self, _: &str, prompt: &str) -> Result<GeneratedText, ProviderError> {
            if prompt.contains("TWITTER") {
                Err(ProviderError::Api {
                    status: 401,
                    message: "invalid key".to_string(),
                })
            } else {
                Ok(GeneratedText {
                    content: post_text(),
                    total_tokens: None,
                })
            }
        }
    }

    /// Blocks every call on a gate the test opens explicitly.
    struct GateProvider {
        gate: tokio::sync::Semaphore,
        calls: AtomicUsize,
    }

    impl GateProvider {
        fn new() -> Self {
            Self {
                gate: tokio::sync::Semaphore::new(0),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentProvider for GateProvider {
        async fn generate(&self, _: &str, _: &str) -> Result<GeneratedText, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _permit = self.gate.acquire().await.unwrap();
            Ok(GeneratedText {
                content: post_text(),
                total_tokens: None,
            })
        }
    }

    #[tokio::test]
    async fn test_generate_all_produces_scored_results() {
        let provider = Arc::new(StaticProvider::new());
        let pipeline = GenerationPipeline::new(provider.clone());

        let results = pipeline
            .generate_all(&profile(), &brief(), &GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        for platform in Platform::ALL {
            let result = &results[&platform];
            assert!(result.is_success());
            assert_eq!(result.model.as_deref(), Some("gpt-3.5-turbo"));
            let score = result.brand_voice_score.unwrap();
            assert!(score > 0 && score <= 100);
            assert!(result.brand_voice_analysis.is_some());
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(pipeline.cache_stats().size, 3);
        assert_eq!(pipeline.history().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_all_rejects_incomplete_profile_before_dispatch() {
        let provider = Arc::new(StaticProvider::new());
        let pipeline = GenerationPipeline::new(provider.clone());

        let mut bad = profile();
        bad.company_name = String::new();
        let err = pipeline
            .generate_all(&bad, &brief(), &GenerateOptions::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("company_name"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_platforms() {
        let pipeline = GenerationPipeline::new(Arc::new(FailingProvider));

        let results = pipeline
            .generate_all(&profile(), &brief(), &GenerateOptions::default())
            .await
            .unwrap();

        assert!(results[&Platform::Linkedin].is_success());
        assert!(results[&Platform::Instagram].is_success());
        let twitter = &results[&Platform::Twitter];
        assert!(!twitter.is_success());
        assert!(twitter.error.as_deref().unwrap().contains("invalid key"));
        // Failures are never cached.
        assert_eq!(pipeline.cache_stats().size, 2);
    }

    #[tokio::test]
    async fn test_repeat_run_is_served_from_cache() {
        let provider = Arc::new(StaticProvider::new());
        let pipeline = GenerationPipeline::new(provider.clone());

        let options = GenerateOptions::default();
        let first = pipeline
            .generate_all(&profile(), &brief(), &options)
            .await
            .unwrap();
        let second = pipeline
            .generate_all(&profile(), &brief(), &options)
            .await
            .unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            first[&Platform::Linkedin].content,
            second[&Platform::Linkedin].content
        );
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_run() {
        let provider = Arc::new(GateProvider::new());
        let pipeline = Arc::new(GenerationPipeline::new(provider.clone()));

        let task = {
            let pipeline = pipeline.clone();
            tokio::spawn(async move {
                pipeline
                    .generate_all(&profile(), &brief(), &GenerateOptions::default())
                    .await
            })
        };

        // Wait until at least one provider call is blocked on the gate.
        while provider.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        pipeline.cancel_generation();
        provider.gate.add_permits(10);

        let outcome = task.await.unwrap();
        assert!(matches!(outcome, Err(PipelineError::Cancelled)));
        assert_eq!(pipeline.cache_stats().size, 0);
        assert!(pipeline.history().is_empty());
    }

    #[tokio::test]
    async fn test_progress_events_cover_every_platform() {
        let pipeline = GenerationPipeline::new(Arc::new(StaticProvider::new()));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let options = GenerateOptions {
            progress: Some(tx),
            ..Default::default()
        };
        pipeline
            .generate_all(&profile(), &brief(), &options)
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 3);
        let last = events.last().unwrap();
        assert_eq!(last.completed, 3);
        assert_eq!(last.total, 3);
        assert_eq!(last.progress, 100);
    }

    #[tokio::test]
    async fn test_regenerate_bypasses_cache() {
        let provider = Arc::new(StaticProvider::new());
        let pipeline = GenerationPipeline::new(provider.clone());

        pipeline
            .generate_for_platform(&profile(), &brief(), Platform::Linkedin, true)
            .await
            .unwrap();
        pipeline
            .generate_for_platform(&profile(), &brief(), Platform::Linkedin, true)
            .await
            .unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        pipeline
            .regenerate_platform(&profile(), &brief(), Platform::Linkedin, true)
            .await
            .unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_platform_accepts_minimal_profile() {
        let pipeline = GenerationPipeline::new(Arc::new(StaticProvider::new()));

        let minimal = BrandProfile {
            company_name: "EcoThreads".to_string(),
            industry: "Fashion".to_string(),
            tone: "Inspiring".to_string(),
            ..Default::default()
        };
        let result = pipeline
            .generate_for_platform(&minimal, &brief(), Platform::Twitter, false)
            .await
            .unwrap();
        assert!(result.is_success());
        assert!(result.brand_voice_score.is_none());
    }

    #[tokio::test]
    async fn test_history_is_capped_and_newest_first() {
        let pipeline = GenerationPipeline::new(Arc::new(StaticProvider::new()));

        for i in 0..(HISTORY_CAP + 5) {
            let mut brief = brief();
            brief.topic = format!("topic {i}");
            pipeline
                .generate_all(&profile(), &brief, &GenerateOptions::default())
                .await
                .unwrap();
        }

        let history = pipeline.history();
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].content_brief.topic, "topic 54");
        assert!(history[0].id > history[1].id);
        assert_eq!(
            pipeline.latest_history().unwrap().content_brief.topic,
            "topic 54"
        );

        pipeline.clear_history();
        assert!(pipeline.history().is_empty());
    }
}
