//! Brand profile and content brief inputs, plus their validators.
//!
//! Two validators exist on purpose: the full pipeline requires the complete
//! profile (example posts included, since they anchor the prompt), while the
//! single-platform path accepts the minimal fields the scorer actually needs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared brand identity. Owned by the caller, passed by reference into the
/// core. All fields default to empty so sparse payloads deserialize; the
/// validators decide what is actually required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandProfile {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub example_post_1: String,
    #[serde(default)]
    pub example_post_2: String,
    /// Optional comma-separated brand keywords, merged with the brief's
    /// keywords during scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// What to write about. `topic` is required; `cta` and `keywords` are
/// optional but scored when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentBrief {
    #[serde(default)]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// A required input field was missing or blank. Raised synchronously before
/// any dispatch; never retried.
#[derive(Debug, Clone, Error)]
#[error("Missing required {section} field: {field}")]
pub struct MissingFieldError {
    pub section: &'static str,
    pub field: &'static str,
}

fn require(
    section: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), MissingFieldError> {
    if value.trim().is_empty() {
        Err(MissingFieldError { section, field })
    } else {
        Ok(())
    }
}

/// Full validation used by the fan-out pipeline. Every profile field must be
/// present and non-blank, plus the brief's topic.
pub fn validate_strict(
    profile: &BrandProfile,
    brief: &ContentBrief,
) -> Result<(), MissingFieldError> {
    require("brand profile", "company_name", &profile.company_name)?;
    require("brand profile", "industry", &profile.industry)?;
    require("brand profile", "tone", &profile.tone)?;
    require("brand profile", "target_audience", &profile.target_audience)?;
    require("brand profile", "example_post_1", &profile.example_post_1)?;
    require("brand profile", "example_post_2", &profile.example_post_2)?;
    require("content brief", "topic", &brief.topic)?;
    Ok(())
}

/// Looser validation for the single-platform path: company name, tone,
/// industry, and topic only.
pub fn validate_minimal(
    profile: &BrandProfile,
    brief: &ContentBrief,
) -> Result<(), MissingFieldError> {
    require("brand profile", "company_name", &profile.company_name)?;
    require("brand profile", "tone", &profile.tone)?;
    require("brand profile", "industry", &profile.industry)?;
    require("content brief", "topic", &brief.topic)?;
    Ok(())
}
