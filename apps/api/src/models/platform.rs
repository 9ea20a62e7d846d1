//! Target platforms and their static generation configuration.
//!
//! The per-platform table is a fixed constant — not user-editable at runtime.
//! Prompt building and brand-voice scoring both read from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A social platform the pipeline generates copy for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Twitter,
    Instagram,
}

/// Whether a platform's length limit counts characters or words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Chars,
    Words,
}

impl LengthUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Chars => "characters",
            LengthUnit::Words => "words",
        }
    }
}

/// Static generation configuration for one platform.
#[derive(Debug, Clone, Copy)]
pub struct PlatformConfig {
    pub max_length: u32,
    pub length_unit: LengthUnit,
    pub format: &'static str,
    pub tone_modifier: &'static str,
    pub hashtag_count: u8,
    pub emoji_level: &'static str,
}

const LINKEDIN_CONFIG: PlatformConfig = PlatformConfig {
    max_length: 200,
    length_unit: LengthUnit::Words,
    format: "Professional post with paragraph breaks",
    tone_modifier: "thought-leadership and informative",
    hashtag_count: 3,
    emoji_level: "minimal or none",
};

const TWITTER_CONFIG: PlatformConfig = PlatformConfig {
    max_length: 280,
    length_unit: LengthUnit::Chars,
    format: "Single concise message",
    tone_modifier: "punchy and impactful",
    hashtag_count: 2,
    emoji_level: "strategic use",
};

const INSTAGRAM_CONFIG: PlatformConfig = PlatformConfig {
    max_length: 150,
    length_unit: LengthUnit::Words,
    format: "Engaging caption with line breaks",
    tone_modifier: "visual-first and engaging",
    hashtag_count: 7,
    emoji_level: "generous use",
};

impl Platform {
    /// All platforms the full pipeline fans out to, in fixed order.
    pub const ALL: [Platform; 3] = [Platform::Linkedin, Platform::Twitter, Platform::Instagram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
        }
    }

    pub fn config(&self) -> &'static PlatformConfig {
        match self {
            Platform::Linkedin => &LINKEDIN_CONFIG,
            Platform::Twitter => &TWITTER_CONFIG,
            Platform::Instagram => &INSTAGRAM_CONFIG,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
