//! Per-platform generation results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::platform::Platform;
use crate::scoring::BrandVoiceAnalysis;

/// The outcome of one (profile, brief, platform) generation. Immutable after
/// creation — regeneration replaces the whole value, never mutates it.
///
/// A failed platform carries `error` with `content: None`; a scored success
/// carries `brand_voice_score` and `brand_voice_analysis`; a success whose
/// scoring failed keeps its content and records `scoring_error` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub platform: Platform,
    pub content: Option<String>,
    pub char_count: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_voice_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_voice_analysis: Option<BrandVoiceAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn success(platform: Platform, content: String) -> Self {
        Self {
            platform,
            char_count: content.chars().count(),
            content: Some(content),
            timestamp: Utc::now(),
            model: None,
            brand_voice_score: None,
            brand_voice_analysis: None,
            scoring_error: None,
            error: None,
        }
    }

    pub fn failure(platform: Platform, message: String) -> Self {
        Self {
            platform,
            content: None,
            char_count: 0,
            timestamp: Utc::now(),
            model: None,
            brand_voice_score: None,
            brand_voice_analysis: None,
            scoring_error: None,
            error: Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result map keyed by platform. `BTreeMap` keeps serialization order stable.
pub type PlatformResults = BTreeMap<Platform, GenerationResult>;
