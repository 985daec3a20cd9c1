//! Request model for content generation.
//!
//! Enum fields are closed sets: anything outside them is rejected by serde before
//! a `ContentRequest` exists, so the prompt builder only ever sees valid values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum length of the `keywords` field, in characters.
pub const MIN_KEYWORDS_LEN: usize = 3;

/// Raised when stored text does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} value '{value}'")]
pub struct UnknownEnumValue {
    pub field: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Social,
    Product,
    Email,
    Trading,
    Tiktok,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Blog,
        ContentType::Social,
        ContentType::Product,
        ContentType::Email,
        ContentType::Trading,
        ContentType::Tiktok,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Blog => "blog",
            ContentType::Social => "social",
            ContentType::Product => "product",
            ContentType::Email => "email",
            ContentType::Trading => "trading",
            ContentType::Tiktok => "tiktok",
        }
    }

    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Blog => "Blog Post",
            ContentType::Social => "Social Media Post",
            ContentType::Product => "Product Description",
            ContentType::Email => "Email Template",
            ContentType::Trading => "Trading Post",
            ContentType::Tiktok => "TikTok Video Script",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneStyle {
    Casual,
    Formal,
    Humorous,
    Motivational,
    Technical,
    Viral,
    Trendy,
    Analytical,
    Authoritative,
}

impl ToneStyle {
    pub const ALL: [ToneStyle; 9] = [
        ToneStyle::Casual,
        ToneStyle::Formal,
        ToneStyle::Humorous,
        ToneStyle::Motivational,
        ToneStyle::Technical,
        ToneStyle::Viral,
        ToneStyle::Trendy,
        ToneStyle::Analytical,
        ToneStyle::Authoritative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToneStyle::Casual => "casual",
            ToneStyle::Formal => "formal",
            ToneStyle::Humorous => "humorous",
            ToneStyle::Motivational => "motivational",
            ToneStyle::Technical => "technical",
            ToneStyle::Viral => "viral",
            ToneStyle::Trendy => "trendy",
            ToneStyle::Analytical => "analytical",
            ToneStyle::Authoritative => "authoritative",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToneStyle::Casual => "Casual and Conversational",
            ToneStyle::Formal => "Formal and Professional",
            ToneStyle::Humorous => "Humorous and Friendly",
            ToneStyle::Motivational => "Motivational and Inspiring",
            ToneStyle::Technical => "Technical and Detailed",
            ToneStyle::Viral => "Bold and Shareable",
            ToneStyle::Trendy => "Trendy and Current",
            ToneStyle::Analytical => "Analytical and Data-Driven",
            ToneStyle::Authoritative => "Authoritative and Confident",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordCount {
    Short,
    Medium,
    Long,
}

impl WordCount {
    pub const ALL: [WordCount; 3] = [WordCount::Short, WordCount::Medium, WordCount::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            WordCount::Short => "short",
            WordCount::Medium => "medium",
            WordCount::Long => "long",
        }
    }

    /// Target word range, inclusive. Bounds increase from short to long.
    pub fn range(&self) -> (u32, u32) {
        match self {
            WordCount::Short => (150, 300),
            WordCount::Medium => (300, 700),
            WordCount::Long => (500, 1500),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WordCount::Short => "Short",
            WordCount::Medium => "Medium",
            WordCount::Long => "Long",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Website,
    Instagram,
    Facebook,
    Linkedin,
    Twitter,
    Email,
    Tiktok,
    Trading,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::Website,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Linkedin,
        Platform::Twitter,
        Platform::Email,
        Platform::Tiktok,
        Platform::Trading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Website => "website",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Email => "email",
            Platform::Tiktok => "tiktok",
            Platform::Trading => "trading",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Website => "Website",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Linkedin => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::Email => "Email",
            Platform::Tiktok => "TikTok",
            Platform::Trading => "Trading Community",
        }
    }
}

macro_rules! impl_enum_text {
    ($ty:ty, $field:literal) => {
        impl FromStr for $ty {
            type Err = UnknownEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownEnumValue {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_enum_text!(ContentType, "contentType");
impl_enum_text!(ToneStyle, "toneStyle");
impl_enum_text!(WordCount, "wordCount");
impl_enum_text!(Platform, "platform");

/// Optional artifacts and analyses the caller can ask for. All default to off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    pub generate_hashtags: bool,
    pub include_meta_description: bool,
    pub include_meta_keywords: bool,
    pub include_seo_title: bool,
    pub generate_trending_tags: bool,
    pub check_plagiarism: bool,
    pub include_trading_insights: bool,
    pub include_viral_analysis: bool,
    pub seo_optimization: bool,
    pub trending_analysis: bool,
    pub market_trends: bool,
    pub risk_analysis: bool,
    pub timeframe_recommendation: bool,
    pub viral_potential: bool,
    pub demographic_analysis: bool,
    pub trending_tags: bool,
}

/// A single content generation request, as received from the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub content_type: ContentType,
    pub tone_style: ToneStyle,
    pub word_count: WordCount,
    pub platform: Platform,
    pub keywords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(flatten)]
    pub flags: FeatureFlags,
}

/// One failed constraint on a request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl ContentRequest {
    /// Checks constraints serde cannot express. Returns every violation found.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.keywords.trim().chars().count() < MIN_KEYWORDS_LEN {
            errors.push(FieldError {
                path: "keywords".to_string(),
                message: format!(
                    "Please enter at least {MIN_KEYWORDS_LEN} characters for keywords"
                ),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Trading insights are only solicited for trading posts.
    pub fn solicits_trading_insights(&self) -> bool {
        self.content_type == ContentType::Trading && self.flags.include_trading_insights
    }

    /// Viral analysis is only solicited for short-form social content.
    pub fn solicits_viral_analysis(&self) -> bool {
        matches!(self.content_type, ContentType::Social | ContentType::Tiktok)
            && (self.flags.include_viral_analysis || self.flags.viral_potential)
    }

    pub fn solicits_trending_tags(&self) -> bool {
        self.flags.generate_trending_tags || self.flags.trending_tags
    }

    /// Non-empty call to action, if any.
    pub fn call_to_action(&self) -> Option<&str> {
        non_blank(self.call_to_action.as_deref())
    }

    pub fn target_audience(&self) -> Option<&str> {
        non_blank(self.target_audience.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) fn sample_request() -> ContentRequest {
    ContentRequest {
        content_type: ContentType::Blog,
        tone_style: ToneStyle::Casual,
        word_count: WordCount::Short,
        platform: Platform::Website,
        keywords: "tea, health".to_string(),
        call_to_action: None,
        target_audience: None,
        flags: FeatureFlags::default(),
    }
}
