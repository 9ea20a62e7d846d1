//! Static lookup tables for the brand-voice scorer.
//!
//! All tables are immutable `&'static` slices keyed by case-insensitive
//! lookup functions. Every entry is lowercase; callers match against a
//! lowercased copy of the content.

/// Keywords signalling a "professional" tone.
pub const PROFESSIONAL: &[&str] = &[
    "insights",
    "strategies",
    "expertise",
    "solutions",
    "industry",
    "analysis",
    "implementation",
    "methodology",
    "framework",
    "optimization",
    "efficiency",
    "performance",
    "metrics",
    "data-driven",
    "best practices",
    "leverage",
    "stakeholders",
    "initiatives",
    "deliverables",
    "benchmark",
];

pub const CASUAL: &[&str] = &[
    "hey",
    "awesome",
    "cool",
    "love",
    "check out",
    "amazing",
    "incredible",
    "fantastic",
    "brilliant",
    "super",
    "totally",
    "definitely",
    "absolutely",
    "rock",
    "crush",
    "nailed",
    "killed",
    "slayed",
    "fire",
    "lit",
];

pub const INSPIRING: &[&str] = &[
    "journey",
    "transform",
    "empower",
    "achieve",
    "believe",
    "dream",
    "vision",
    "breakthrough",
    "revolutionary",
    "unleash",
    "potential",
    "possibilities",
    "opportunity",
    "growth",
    "success",
    "triumph",
    "victory",
    "overcome",
    "challenge",
    "adversity",
    "resilience",
    "determination",
];

pub const HUMOROUS: &[&str] = &[
    "😂",
    "lol",
    "haha",
    "funny",
    "joke",
    "hilarious",
    "comedy",
    "laugh",
    "chuckle",
    "giggle",
    "rofl",
    "lmao",
    "puns",
    "wit",
    "sarcasm",
    "irony",
    "satire",
    "meme",
    "viral",
    "trending",
    "epic",
    "legendary",
];

pub const EDUCATIONAL: &[&str] = &[
    "learn",
    "discover",
    "understand",
    "tips",
    "guide",
    "tutorial",
    "how-to",
    "explanation",
    "breakdown",
    "insights",
    "knowledge",
    "wisdom",
    "teach",
    "explore",
    "investigate",
    "research",
    "study",
    "analysis",
    "step-by-step",
    "walkthrough",
    "demonstration",
];

pub const CONVERSATIONAL: &[&str] = &[
    "you",
    "your",
    "we",
    "us",
    "our",
    "let's",
    "together",
    "share",
    "discuss",
    "talk",
    "chat",
    "connect",
    "engage",
    "interact",
    "collaborate",
    "join",
    "participate",
    "involve",
    "include",
    "community",
    "team",
    "group",
];

pub const AUTHORITATIVE: &[&str] = &[
    "proven",
    "established",
    "leading",
    "premier",
    "expert",
    "specialist",
    "master",
    "guru",
    "pioneer",
    "innovator",
    "trailblazer",
    "groundbreaking",
    "cutting-edge",
    "state-of-the-art",
    "advanced",
    "sophisticated",
    "elite",
    "premium",
    "flagship",
    "signature",
];

/// Resolves a declared brand tone to its keyword list. `None` means the tone
/// is unrecognized and the scorer falls back to its flat default.
pub fn tone_keywords(tone: &str) -> Option<&'static [&'static str]> {
    match tone.trim().to_lowercase().as_str() {
        "professional" => Some(PROFESSIONAL),
        "casual" => Some(CASUAL),
        "inspiring" => Some(INSPIRING),
        "humorous" => Some(HUMOROUS),
        "educational" => Some(EDUCATIONAL),
        "conversational" => Some(CONVERSATIONAL),
        "authoritative" => Some(AUTHORITATIVE),
        _ => None,
    }
}

/// First-person brand voice markers.
pub const FIRST_PERSON: &[&str] = &["we", "our", "us", "our team", "our company"];

/// Second-person brand voice markers.
pub const SECOND_PERSON: &[&str] = &["you", "your", "your business", "your team"];

/// Industry-specific language families. Industries outside these three score
/// no industry-language bonus.
pub fn industry_language(industry: &str) -> Option<&'static [&'static str]> {
    match industry.trim().to_lowercase().as_str() {
        "technical" => Some(&[
            "api",
            "integration",
            "platform",
            "system",
            "architecture",
            "infrastructure",
        ]),
        "creative" => Some(&[
            "design",
            "visual",
            "aesthetic",
            "artistic",
            "creative",
            "innovative",
        ]),
        "business" => Some(&[
            "revenue",
            "roi",
            "profit",
            "growth",
            "scalability",
            "efficiency",
        ]),
        _ => None,
    }
}

/// Phrases that count as an explicit call-to-action.
pub const EXPLICIT_CTA_PHRASES: &[&str] = &[
    "learn more",
    "discover",
    "explore",
    "get started",
    "try",
    "sign up",
    "download",
    "visit",
    "click",
    "check out",
];

/// Urgency words that count as a weak call-to-action.
pub const ACTION_WORDS: &[&str] = &["now", "today", "immediately", "start", "begin"];

/// Character-length band for one platform.
#[derive(Debug, Clone, Copy)]
pub struct LengthBand {
    pub min: u32,
    pub max: u32,
    pub ideal_min: u32,
    pub ideal_max: u32,
}

const LINKEDIN_LENGTH: LengthBand = LengthBand {
    min: 50,
    max: 200,
    ideal_min: 100,
    ideal_max: 150,
};
const TWITTER_LENGTH: LengthBand = LengthBand {
    min: 20,
    max: 280,
    ideal_min: 100,
    ideal_max: 200,
};
const INSTAGRAM_LENGTH: LengthBand = LengthBand {
    min: 30,
    max: 150,
    ideal_min: 80,
    ideal_max: 120,
};
const FACEBOOK_LENGTH: LengthBand = LengthBand {
    min: 40,
    max: 250,
    ideal_min: 100,
    ideal_max: 180,
};

/// Length band lookup. Unrecognized or absent platforms fall back to the
/// LinkedIn band.
pub fn length_band(platform: Option<&str>) -> &'static LengthBand {
    match platform.map(str::to_lowercase).as_deref() {
        Some("twitter") => &TWITTER_LENGTH,
        Some("instagram") => &INSTAGRAM_LENGTH,
        Some("facebook") => &FACEBOOK_LENGTH,
        _ => &LINKEDIN_LENGTH,
    }
}

/// Expected hashtag counts for one platform.
#[derive(Debug, Clone, Copy)]
pub struct HashtagBand {
    pub min: u32,
    pub max: u32,
    pub ideal: u32,
}

const LINKEDIN_HASHTAGS: HashtagBand = HashtagBand {
    min: 1,
    max: 5,
    ideal: 3,
};
const TWITTER_HASHTAGS: HashtagBand = HashtagBand {
    min: 1,
    max: 3,
    ideal: 2,
};
const INSTAGRAM_HASHTAGS: HashtagBand = HashtagBand {
    min: 5,
    max: 15,
    ideal: 8,
};
const FACEBOOK_HASHTAGS: HashtagBand = HashtagBand {
    min: 0,
    max: 3,
    ideal: 1,
};

/// Hashtag band lookup with the same LinkedIn fallback as [`length_band`].
pub fn hashtag_band(platform: Option<&str>) -> &'static HashtagBand {
    match platform.map(str::to_lowercase).as_deref() {
        Some("twitter") => &TWITTER_HASHTAGS,
        Some("instagram") => &INSTAGRAM_HASHTAGS,
        Some("facebook") => &FACEBOOK_HASHTAGS,
        _ => &LINKEDIN_HASHTAGS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_lookup_is_case_insensitive() {
        assert!(tone_keywords("Inspiring").is_some());
        assert!(tone_keywords("PROFESSIONAL").is_some());
        assert!(tone_keywords("sarcastic").is_none());
    }

    #[test]
    fn test_inspiring_list_size_drives_density_threshold() {
        // Three matches against this list must clear the 10% density bar.
        let len = INSPIRING.len();
        assert_eq!(len, 22);
        assert!(3.0 / len as f64 > 0.1);
        assert!(2.0 / len as f64 <= 0.1);
    }

    #[test]
    fn test_unknown_platform_falls_back_to_linkedin() {
        assert_eq!(length_band(Some("mastodon")).min, 50);
        assert_eq!(length_band(None).max, 200);
        assert_eq!(hashtag_band(Some("mastodon")).ideal, 3);
    }

    #[test]
    fn test_facebook_allows_zero_hashtags() {
        assert_eq!(hashtag_band(Some("facebook")).min, 0);
    }

    #[test]
    fn test_industry_language_families() {
        assert!(industry_language("Technical").is_some());
        assert!(industry_language("creative").is_some());
        assert!(industry_language("business").is_some());
        assert!(industry_language("fashion").is_none());
    }
}
