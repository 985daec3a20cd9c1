//! Response parsing: recovers a `ContentResult` from raw model output.
//!
//! Two paths, first success wins:
//! 1. Structured: the outermost `{...}` span parses as a JSON object.
//! 2. Fallback: first non-empty line is the title, the rest is the body, and each
//!    solicited optional field is scraped from a labelled line ("Hashtags: ...").
//!
//! `parse_response` is total. When neither path can produce a title (empty or
//! whitespace-only output) it returns the minimal result with the raw text as body;
//! only the request-driven plagiarism placeholder is still attached.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::generation::request::ContentRequest;

pub const DEFAULT_TITLE: &str = "Generated Content";

const MIN_VIRAL_POTENTIAL: u64 = 1;
const MAX_VIRAL_POTENTIAL: u64 = 10;

/// Trading-specific analysis attached to trading posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradingInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_trend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_return: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

impl TradingInsights {
    fn is_empty(&self) -> bool {
        self.market_trend.is_none()
            && self.risk_level.is_none()
            && self.potential_return.is_none()
            && self.timeframe.is_none()
    }
}

/// Structured content produced from one generation.
///
/// `plagiarism_score` is a placeholder: it is `Some(0.0)` whenever the request asked
/// for a plagiarism check and no check is actually performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResult {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarism_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_insights: Option<TradingInsights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viral_potential: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_demographic: Option<String>,
}

impl ContentResult {
    /// Title and body only; every optional field absent.
    pub fn minimal(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            meta_description: None,
            meta_keywords: None,
            seo_title: None,
            hashtags: None,
            trending_tags: None,
            plagiarism_score: None,
            trading_insights: None,
            viral_potential: None,
            target_demographic: None,
        }
    }
}

/// Parses raw model output into a `ContentResult`. Never fails.
pub fn parse_response(raw: &str, request: &ContentRequest) -> ContentResult {
    if let Some(object) = extract_json_object(raw) {
        return from_json_object(&object, raw, request);
    }

    debug!("No JSON object in model output, scraping text");
    scrape_text(raw, request).unwrap_or_else(|| ContentResult {
        plagiarism_score: plagiarism_stub(request),
        ..ContentResult::minimal(DEFAULT_TITLE, raw)
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Structured path
// ────────────────────────────────────────────────────────────────────────────

/// Greedy span from the first `{` to the last `}`, if it parses as a JSON object.
fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }

    match serde_json::from_str::<Value>(&raw[start..=end]) {
        Ok(Value::Object(object)) => Some(object),
        Ok(_) => None,
        Err(e) => {
            debug!("Embedded JSON did not parse ({e}), scraping text instead");
            None
        }
    }
}

fn from_json_object(
    object: &Map<String, Value>,
    raw: &str,
    request: &ContentRequest,
) -> ContentResult {
    ContentResult {
        title: object
            .get("title")
            .and_then(truthy_text)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        body: object
            .get("body")
            .and_then(truthy_text)
            .unwrap_or_else(|| raw.to_string()),
        meta_description: object.get("metaDescription").and_then(string_value),
        meta_keywords: object.get("metaKeywords").and_then(keywords_value),
        seo_title: object.get("seoTitle").and_then(string_value),
        hashtags: object.get("hashtags").and_then(string_list),
        trending_tags: object.get("trendingTags").and_then(string_list),
        plagiarism_score: plagiarism_stub(request),
        trading_insights: object
            .get("tradingInsights")
            .and_then(|v| serde_json::from_value::<TradingInsights>(v.clone()).ok()),
        viral_potential: object.get("viralPotential").and_then(viral_score_value),
        target_demographic: object.get("targetDemographic").and_then(string_value),
    }
}

/// JavaScript-style truthiness, rendered as text. Empty strings, zero, false and
/// null count as absent.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        other => Some(other.to_string()),
    }
}

fn string_value(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Meta keywords come back either as one string or as a list.
fn keywords_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(_) => string_list(value).map(|items| items.join(", ")),
        _ => None,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()
    })
}

fn viral_score_value(value: &Value) -> Option<u8> {
    let score = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    Some(clamp_viral(score))
}

fn clamp_viral(score: u64) -> u8 {
    score.clamp(MIN_VIRAL_POTENTIAL, MAX_VIRAL_POTENTIAL) as u8
}

/// No plagiarism check is performed; a requested check always reports 0.
fn plagiarism_stub(request: &ContentRequest) -> Option<f64> {
    request.flags.check_plagiarism.then_some(0.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback path
// ────────────────────────────────────────────────────────────────────────────

type LabelRegex = LazyLock<Result<Regex, regex::Error>>;

// Labels start a line and may be wrapped in markdown bold ("**Hashtags:**").
// Values may start on the next line.
static META_DESCRIPTION_RE: LabelRegex = LazyLock::new(|| {
    Regex::new(r"(?ims)^[ \t]*\**meta description:\**\s*(.*?)(?:\n[ \t]*\n|\z)")
});
static META_KEYWORDS_RE: LabelRegex =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*\**meta keywords:\**\s*([^\n]+)"));
static SEO_TITLE_RE: LabelRegex =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*\**seo title:\**\s*([^\n]+)"));
// The run must open with a `#word` token; bare words after it are normalized.
static HASHTAGS_RE: LabelRegex = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*\**hashtags:\**\s*(#\w+(?:[ \t,]+#?\w+)*)")
});
static TRENDING_TAGS_RE: LabelRegex =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*\**trending tags:\**\s*([^\n]+)"));
static MARKET_TREND_RE: LabelRegex =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*\**market trends?:\**\s*([^\n]+)"));
static RISK_LEVEL_RE: LabelRegex =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*\**risk level:\**\s*([^\n]+)"));
static POTENTIAL_RETURN_RE: LabelRegex =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*\**potential return:\**\s*([^\n]+)"));
static TIMEFRAME_RE: LabelRegex =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*\**timeframe:\**\s*([^\n]+)"));
static VIRAL_POTENTIAL_RE: LabelRegex =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*\**viral potential:\**\s*(\d+)"));
static TARGET_DEMOGRAPHIC_RE: LabelRegex =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*\**target demographic:\**\s*([^\n]+)"));

/// Heuristic line/label scraping. `None` when the text has no non-empty line.
fn scrape_text(raw: &str, request: &ContentRequest) -> Option<ContentResult> {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());

    let first = lines.next()?;
    let title = first.trim().trim_start_matches('#').trim();
    let title = if title.is_empty() { DEFAULT_TITLE } else { title };
    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    let flags = &request.flags;
    let mut result = ContentResult::minimal(title, body);

    if flags.include_meta_description {
        result.meta_description = capture(&META_DESCRIPTION_RE, raw);
    }
    if flags.include_meta_keywords {
        result.meta_keywords = capture(&META_KEYWORDS_RE, raw);
    }
    if flags.include_seo_title {
        result.seo_title = capture(&SEO_TITLE_RE, raw);
    }
    if flags.generate_hashtags {
        result.hashtags = capture(&HASHTAGS_RE, raw)
            .map(|line| split_hashtags(&line))
            .filter(|tags| !tags.is_empty());
    }
    if request.solicits_trending_tags() {
        result.trending_tags = capture(&TRENDING_TAGS_RE, raw)
            .map(|line| split_list(&line))
            .filter(|tags| !tags.is_empty());
    }
    result.plagiarism_score = plagiarism_stub(request);
    if request.solicits_trading_insights() {
        let insights = TradingInsights {
            market_trend: capture(&MARKET_TREND_RE, raw),
            risk_level: capture(&RISK_LEVEL_RE, raw),
            potential_return: capture(&POTENTIAL_RETURN_RE, raw),
            timeframe: capture(&TIMEFRAME_RE, raw),
        };
        result.trading_insights = (!insights.is_empty()).then_some(insights);
    }
    if request.solicits_viral_analysis() {
        result.viral_potential = capture(&VIRAL_POTENTIAL_RE, raw)
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(clamp_viral);
    }
    if flags.demographic_analysis {
        result.target_demographic = capture(&TARGET_DEMOGRAPHIC_RE, raw);
    }

    Some(result)
}

/// First capture group of `re` in `text`, cleaned of whitespace and bold markers.
/// A pattern that failed to compile simply finds nothing.
fn capture(re: &LabelRegex, text: &str) -> Option<String> {
    let re = re.as_ref().ok()?;
    let value = re.captures(text)?.get(1)?.as_str();
    let value = value.trim_matches(|c: char| c.is_whitespace() || c == '*');
    (!value.is_empty()).then(|| value.to_string())
}

/// Splits a hashtag line into `#word` tokens, adding the `#` where it is missing.
fn split_hashtags(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| token.trim_start_matches('#'))
        .filter(|word| !word.is_empty() && word.chars().all(|c| c.is_alphanumeric() || c == '_'))
        .map(normalize_hashtag)
        .collect()
}

pub fn normalize_hashtag(tag: &str) -> String {
    if tag.starts_with('#') {
        tag.to_string()
    } else {
        format!("#{tag}")
    }
}

fn split_list(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
