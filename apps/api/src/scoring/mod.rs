//! Brand-voice scoring engine.
//!
//! Pure, deterministic heuristics — no I/O, no LLM. Six independent
//! sub-scores are computed against a lowercased copy of the content and
//! summed into a 0–100 overall score, with human-readable suggestions for
//! every sub-score that falls below its threshold.

pub mod tables;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::brand::{BrandProfile, ContentBrief};

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("hashtag pattern is valid"));

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Six sub-scores, each bounded by its declared band. The overall score is
/// `min(sum, 100)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 0–30
    pub tone_alignment: u8,
    /// 0–25
    pub keyword_inclusion: u8,
    /// 0–15
    pub length_appropriateness: u8,
    /// 0–10
    pub hashtag_presence: u8,
    /// 0–15
    pub brand_consistency: u8,
    /// 0–5
    pub call_to_action: u8,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> u32 {
        u32::from(self.tone_alignment)
            + u32::from(self.keyword_inclusion)
            + u32::from(self.length_appropriateness)
            + u32::from(self.hashtag_presence)
            + u32::from(self.brand_consistency)
            + u32::from(self.call_to_action)
    }
}

/// Full scoring result for a single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandVoiceScore {
    pub overall_score: u8,
    pub breakdown: ScoreBreakdown,
    pub suggestions: Vec<String>,
}

/// A sub-score escaped its declared band. Callers demote this to a
/// per-platform `scoring_error` — it never aborts generation.
#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    #[error("sub-score {name} out of band: {value} (max {max})")]
    OutOfBand {
        name: &'static str,
        value: u8,
        max: u8,
    },
    #[error("overall score {overall} does not equal capped breakdown sum {expected}")]
    SumMismatch { overall: u8, expected: u8 },
}

impl BrandVoiceScore {
    /// Checks the band invariants: each sub-score within its range and the
    /// overall score equal to `min(sum, 100)`.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let bands: [(&'static str, u8, u8); 6] = [
            ("tone_alignment", self.breakdown.tone_alignment, 30),
            ("keyword_inclusion", self.breakdown.keyword_inclusion, 25),
            (
                "length_appropriateness",
                self.breakdown.length_appropriateness,
                15,
            ),
            ("hashtag_presence", self.breakdown.hashtag_presence, 10),
            ("brand_consistency", self.breakdown.brand_consistency, 15),
            ("call_to_action", self.breakdown.call_to_action, 5),
        ];
        for (name, value, max) in bands {
            if value > max {
                return Err(ScoringError::OutOfBand { name, value, max });
            }
        }
        let expected = self.breakdown.sum().min(100) as u8;
        if self.overall_score != expected {
            return Err(ScoringError::SumMismatch {
                overall: self.overall_score,
                expected,
            });
        }
        Ok(())
    }
}

/// [`BrandVoiceScore`] plus derived strengths and weaknesses. The strength
/// and weakness bars are independent of the suggestion thresholds, leaving a
/// neutral band in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandVoiceAnalysis {
    #[serde(flatten)]
    pub score: BrandVoiceScore,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// One entry of a [`batch_score`] run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPost {
    pub index: usize,
    pub post: String,
    pub score: BrandVoiceScore,
}

/// Aggregate of [`average_score`] over a set of posts.
#[derive(Debug, Clone, Serialize)]
pub struct AverageScoreReport {
    pub average_score: u8,
    pub individual_scores: Vec<u8>,
    pub total_posts: usize,
    /// Posts scoring 80 or above.
    pub high_performing: usize,
    /// Posts scoring below 60.
    pub needs_improvement: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring entry points
// ────────────────────────────────────────────────────────────────────────────

/// Scores one generated post against the declared brand voice.
///
/// `platform` selects the length and hashtag bands; unrecognized or absent
/// platforms use the LinkedIn bands. Empty content yields an all-zero result
/// with a single suggestion — this function never fails.
pub fn score(
    content: &str,
    profile: &BrandProfile,
    brief: &ContentBrief,
    platform: Option<&str>,
) -> BrandVoiceScore {
    if content.trim().is_empty() {
        return BrandVoiceScore {
            overall_score: 0,
            breakdown: ScoreBreakdown::default(),
            suggestions: vec!["Missing required parameters for scoring".to_string()],
        };
    }

    let post = content.to_lowercase();

    let breakdown = ScoreBreakdown {
        tone_alignment: tone_alignment_score(&post, &profile.tone),
        keyword_inclusion: keyword_inclusion_score(&post, profile, brief),
        length_appropriateness: length_score(content, platform),
        hashtag_presence: hashtag_score(content, platform),
        brand_consistency: brand_consistency_score(&post, profile),
        call_to_action: cta_score(&post, brief.cta.as_deref()),
    };

    let overall_score = breakdown.sum().min(100) as u8;
    let suggestions = build_suggestions(&breakdown, profile, brief, platform);

    BrandVoiceScore {
        overall_score,
        breakdown,
        suggestions,
    }
}

/// Wraps [`score`] and derives strengths and weaknesses per sub-score.
pub fn analyze(
    content: &str,
    profile: &BrandProfile,
    brief: &ContentBrief,
    platform: Option<&str>,
) -> BrandVoiceAnalysis {
    let score = score(content, profile, brief, platform);
    let strengths = collect_strengths(&score.breakdown);
    let weaknesses = collect_weaknesses(&score.breakdown);
    BrandVoiceAnalysis {
        score,
        strengths,
        weaknesses,
    }
}

/// Scores a sequence of posts independently.
pub fn batch_score(
    posts: &[String],
    profile: &BrandProfile,
    brief: &ContentBrief,
    platform: Option<&str>,
) -> Vec<ScoredPost> {
    posts
        .iter()
        .enumerate()
        .map(|(index, post)| ScoredPost {
            index,
            post: post.clone(),
            score: score(post, profile, brief, platform),
        })
        .collect()
}

/// Mean rounded score over a set of posts plus high/low performer counts.
/// An empty input yields a zeroed report.
pub fn average_score(
    posts: &[String],
    profile: &BrandProfile,
    brief: &ContentBrief,
    platform: Option<&str>,
) -> AverageScoreReport {
    let individual_scores: Vec<u8> = posts
        .iter()
        .map(|post| score(post, profile, brief, platform).overall_score)
        .collect();

    let average = if individual_scores.is_empty() {
        0
    } else {
        let total: u32 = individual_scores.iter().map(|&s| u32::from(s)).sum();
        ((total as f64 / individual_scores.len() as f64).round()) as u8
    };

    AverageScoreReport {
        average_score: average,
        high_performing: individual_scores.iter().filter(|&&s| s >= 80).count(),
        needs_improvement: individual_scores.iter().filter(|&&s| s < 60).count(),
        total_posts: posts.len(),
        individual_scores,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-scores
// ────────────────────────────────────────────────────────────────────────────

/// 0–30. `min(matches * 2, 20)` plus a 10-point bonus when matches exceed
/// 10% of the tone's keyword list. Unrecognized tones score a flat 15.
fn tone_alignment_score(post: &str, tone: &str) -> u8 {
    if tone.trim().is_empty() {
        return 0;
    }
    let Some(keywords) = tables::tone_keywords(tone) else {
        return 15;
    };

    let match_count = keywords.iter().filter(|k| post.contains(**k)).count();
    let base = (match_count * 2).min(20) as u32;
    let density = match_count as f64 / keywords.len() as f64;
    let bonus = if density > 0.1 { 10 } else { 0 };

    (base + bonus).min(30) as u8
}

/// 0–25. Inclusion rate of the deduplicated union of brand and brief
/// keywords, mapped through fixed thresholds. No keywords declared → 15.
fn keyword_inclusion_score(post: &str, profile: &BrandProfile, brief: &ContentBrief) -> u8 {
    let keywords = keyword_union(profile, brief);
    if keywords.is_empty() {
        return 15;
    }

    let matched = keywords.iter().filter(|k| post.contains(k.as_str())).count();
    let rate = matched as f64 / keywords.len() as f64;

    if rate >= 0.8 {
        25
    } else if rate >= 0.6 {
        20
    } else if rate >= 0.4 {
        15
    } else if rate >= 0.2 {
        10
    } else {
        5
    }
}

fn keyword_union(profile: &BrandProfile, brief: &ContentBrief) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for source in [profile.keywords.as_deref(), brief.keywords.as_deref()] {
        let Some(raw) = source else { continue };
        for token in raw.split(',') {
            let token = token.trim().to_lowercase();
            if !token.is_empty() && !keywords.contains(&token) {
                keywords.push(token);
            }
        }
    }
    keywords
}

/// 0–15. Outside the platform band → 5; inside the ideal band → 15;
/// otherwise a partial score shrinking with distance from the ideal band.
fn length_score(content: &str, platform: Option<&str>) -> u8 {
    let length = content.chars().count() as u32;
    let band = tables::length_band(platform);

    if length < band.min || length > band.max {
        return 5;
    }
    if length >= band.ideal_min && length <= band.ideal_max {
        return 15;
    }

    let distance = length
        .abs_diff(band.ideal_min)
        .min(length.abs_diff(band.ideal_max));
    10u32.saturating_sub(distance / 10).max(8) as u8
}

/// 0–10. Counts `#word` occurrences against the platform's expected band.
fn hashtag_score(content: &str, platform: Option<&str>) -> u8 {
    let count = HASHTAG_RE.find_iter(content).count() as u32;
    let band = tables::hashtag_band(platform);

    if count == 0 {
        return if band.min == 0 { 5 } else { 0 };
    }
    if (count >= band.min && count <= band.max) || count == band.ideal {
        return 10;
    }

    5u32.saturating_sub(count.abs_diff(band.ideal)) as u8
}

/// 0–15. Company-name mention (+5), consistent first- or second-person
/// perspective (+5, mixed +3), and industry-appropriate language (+5).
fn brand_consistency_score(post: &str, profile: &BrandProfile) -> u8 {
    let mut score: u8 = 0;

    if !profile.company_name.trim().is_empty()
        && post.contains(&profile.company_name.to_lowercase())
    {
        score += 5;
    }

    let first = tables::FIRST_PERSON
        .iter()
        .filter(|w| post.contains(**w))
        .count();
    let second = tables::SECOND_PERSON
        .iter()
        .filter(|w| post.contains(**w))
        .count();

    if first > 0 && second == 0 {
        score += 5;
    } else if second > 0 && first == 0 {
        score += 5;
    } else if first > 0 || second > 0 {
        score += 3;
    }

    if let Some(words) = tables::industry_language(&profile.industry) {
        if words.iter().any(|w| post.contains(*w)) {
            score += 5;
        }
    }

    score.min(15)
}

/// 0–5. Explicit CTA phrase → 5; a question mark or urgency word → 3;
/// otherwise 1. No CTA requested in the brief → default 5.
fn cta_score(post: &str, cta: Option<&str>) -> u8 {
    if cta.map_or(true, |c| c.trim().is_empty()) {
        return 5;
    }

    if tables::EXPLICIT_CTA_PHRASES.iter().any(|p| post.contains(*p)) {
        return 5;
    }
    if post.contains('?') || tables::ACTION_WORDS.iter().any(|w| post.contains(*w)) {
        return 3;
    }
    1
}

// ────────────────────────────────────────────────────────────────────────────
// Suggestions and analysis
// ────────────────────────────────────────────────────────────────────────────

/// Check order is fixed: tone, keywords, length, hashtags, brand
/// consistency, CTA. No triggered check → a single positive affirmation.
fn build_suggestions(
    breakdown: &ScoreBreakdown,
    profile: &BrandProfile,
    brief: &ContentBrief,
    platform: Option<&str>,
) -> Vec<String> {
    let mut suggestions = Vec::new();
    let platform_label = platform.unwrap_or("LinkedIn");

    if breakdown.tone_alignment < 20 {
        let tone = profile.tone.trim().to_lowercase();
        match tables::tone_keywords(&profile.tone) {
            Some(keywords) => suggestions.push(format!(
                "Improve tone alignment by including more {tone} language. \
                 Consider using words like: {}",
                keywords[..5.min(keywords.len())].join(", ")
            )),
            None => suggestions.push(format!(
                "Improve tone alignment by using language that matches the '{tone}' tone \
                 more closely."
            )),
        }
    }

    if breakdown.keyword_inclusion < 15 {
        let keywords = keyword_union(profile, brief);
        if !keywords.is_empty() {
            suggestions.push(format!(
                "Include more relevant keywords: {}",
                keywords[..3.min(keywords.len())].join(", ")
            ));
        }
    }

    if breakdown.length_appropriateness < 10 {
        suggestions.push(format!(
            "Adjust post length for {platform_label}. Consider making it shorter or longer \
             based on platform best practices."
        ));
    }

    if breakdown.hashtag_presence < 5 {
        let recommended = match platform.map(str::to_lowercase).as_deref() {
            Some("instagram") => "5-15",
            Some("twitter") => "1-3",
            _ => "2-5",
        };
        suggestions.push(format!(
            "Add more hashtags for {platform_label} (recommended: {recommended} hashtags)"
        ));
    }

    if breakdown.brand_consistency < 10 {
        suggestions.push(
            "Strengthen brand consistency by mentioning your company name and maintaining \
             a consistent voice throughout."
                .to_string(),
        );
    }

    if breakdown.call_to_action < 3 {
        suggestions.push(
            "Add a clear call-to-action to encourage engagement \
             (e.g., \"Learn more\", \"Try now\", \"Discover how\")"
                .to_string(),
        );
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Great job! Your content aligns well with the brand voice. \
             Keep up the excellent work!"
                .to_string(),
        );
    }

    suggestions
}

fn collect_strengths(breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut strengths = Vec::new();
    if breakdown.tone_alignment >= 25 {
        strengths.push("Excellent tone alignment".to_string());
    }
    if breakdown.keyword_inclusion >= 20 {
        strengths.push("Great keyword integration".to_string());
    }
    if breakdown.length_appropriateness >= 12 {
        strengths.push("Perfect length for platform".to_string());
    }
    if breakdown.hashtag_presence >= 8 {
        strengths.push("Good hashtag usage".to_string());
    }
    if breakdown.brand_consistency >= 12 {
        strengths.push("Strong brand consistency".to_string());
    }
    if breakdown.call_to_action >= 4 {
        strengths.push("Clear call-to-action".to_string());
    }
    strengths
}

fn collect_weaknesses(breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut weaknesses = Vec::new();
    if breakdown.tone_alignment < 15 {
        weaknesses.push("Tone alignment needs improvement".to_string());
    }
    if breakdown.keyword_inclusion < 10 {
        weaknesses.push("Missing key keywords".to_string());
    }
    if breakdown.length_appropriateness < 8 {
        weaknesses.push("Length not optimal for platform".to_string());
    }
    if breakdown.hashtag_presence < 5 {
        weaknesses.push("Insufficient hashtag usage".to_string());
    }
    if breakdown.brand_consistency < 8 {
        weaknesses.push("Brand consistency could be stronger".to_string());
    }
    if breakdown.call_to_action < 2 {
        weaknesses.push("Call-to-action is weak or missing".to_string());
    }
    weaknesses
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
