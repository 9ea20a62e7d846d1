//! Export of generation results with summary statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::platform::Platform;
use crate::models::result::PlatformResults;

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// A result set with its derived summary, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSnapshot {
    pub timestamp: DateTime<Utc>,
    pub results: PlatformResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_platform: Option<Platform>,
    pub total_platforms: usize,
}

/// Mean rounded brand-voice score over the scored successes, if any.
pub fn average_score(results: &PlatformResults) -> Option<u8> {
    let scores: Vec<u32> = results
        .values()
        .filter_map(|r| r.brand_voice_score.map(u32::from))
        .collect();
    if scores.is_empty() {
        return None;
    }
    let total: u32 = scores.iter().sum();
    Some((total as f64 / scores.len() as f64).round() as u8)
}

/// The platform whose result carries the highest brand-voice score.
pub fn best_platform(results: &PlatformResults) -> Option<Platform> {
    results
        .values()
        .filter_map(|r| r.brand_voice_score.map(|s| (s, r.platform)))
        .max_by_key(|&(score, _)| score)
        .map(|(_, platform)| platform)
}

pub fn snapshot(results: PlatformResults) -> ExportSnapshot {
    ExportSnapshot {
        timestamp: Utc::now(),
        average_score: average_score(&results),
        best_platform: best_platform(&results),
        total_platforms: results.len(),
        results,
    }
}

/// Serializes a snapshot in the requested format.
pub fn export_results(
    results: PlatformResults,
    format: ExportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(&snapshot(results)),
    }
}
