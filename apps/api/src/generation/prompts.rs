//! Prompt assembly for platform-specific generation.

use crate::models::brand::{BrandProfile, ContentBrief};
use crate::models::platform::Platform;

/// System prompt shared by every generation call.
pub const GENERATION_SYSTEM: &str = "You are an expert social media content creator who maintains consistent brand voice across platforms.";

const PLATFORM_PROMPT_TEMPLATE: &str = r#"You are creating a {PLATFORM_UPPER} post for {COMPANY_NAME}.

BRAND PROFILE:
- Industry: {INDUSTRY}
- Brand Tone: {TONE}
- Target Audience: {TARGET_AUDIENCE}

BRAND VOICE EXAMPLES (match this style):
"{EXAMPLE_POST_1}"
"{EXAMPLE_POST_2}"

CONTENT BRIEF:
- Topic/Message: {TOPIC}
- Call-to-Action: {CTA}
- Keywords to include: {KEYWORDS}

{PLATFORM_UPPER} REQUIREMENTS:
- Maximum length: {MAX_LENGTH} {LENGTH_UNIT}
- Format: {FORMAT}
- Tone adaptation: {TONE_MODIFIER} while maintaining brand voice
- Include {HASHTAG_COUNT} relevant hashtags
- Emoji usage: {EMOJI_LEVEL}

CRITICAL: The post must sound like it's from {COMPANY_NAME} and match the brand voice shown in the examples, while following {PLATFORM} best practices.

Generate the post now:"#;

/// Builds the user prompt for one platform by filling the template with the
/// brand profile, the brief, and the platform's formatting rules.
pub fn build_platform_prompt(
    profile: &BrandProfile,
    brief: &ContentBrief,
    platform: Platform,
) -> String {
    let config = platform.config();
    PLATFORM_PROMPT_TEMPLATE
        .replace("{PLATFORM_UPPER}", &platform.as_str().to_uppercase())
        .replace("{PLATFORM}", platform.as_str())
        .replace("{COMPANY_NAME}", &profile.company_name)
        .replace("{INDUSTRY}", &profile.industry)
        .replace("{TONE_MODIFIER}", config.tone_modifier)
        .replace("{TONE}", &profile.tone)
        .replace("{TARGET_AUDIENCE}", &profile.target_audience)
        .replace("{EXAMPLE_POST_1}", &profile.example_post_1)
        .replace("{EXAMPLE_POST_2}", &profile.example_post_2)
        .replace("{TOPIC}", &brief.topic)
        .replace("{CTA}", brief.cta.as_deref().unwrap_or("None"))
        .replace("{KEYWORDS}", brief.keywords.as_deref().unwrap_or("None"))
        .replace("{MAX_LENGTH}", &config.max_length.to_string())
        .replace("{LENGTH_UNIT}", config.length_unit.as_str())
        .replace("{FORMAT}", config.format)
        .replace("{HASHTAG_COUNT}", &config.hashtag_count.to_string())
        .replace("{EMOJI_LEVEL}", config.emoji_level)
}
