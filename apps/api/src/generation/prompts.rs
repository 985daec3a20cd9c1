//! Prompt construction for content generation.
//!
//! `build_prompt` is pure: the same request always yields the same prompt. The JSON
//! template block lists exactly the keys the request solicits, which is the shape
//! `parser::parse_response` expects back.

use crate::generation::request::{ContentRequest, ContentType};

/// Opening line of the JSON template block. Tests locate the template by it.
pub const TEMPLATE_HEADER: &str = "Please format your response in the following JSON structure:";

const BLOG_CHECKLIST: &str = "The blog post should include:
- An engaging introduction
- Well-structured sections with subheadings
- Bullet points or numbered lists where appropriate
- Strategic placement of keywords
- A compelling conclusion
- Use markdown formatting for emphasis: **bold** for important points and *italic* for emphasis";

const SOCIAL_CHECKLIST: &str = "The social media post should:
- Be concise and engaging
- Use an authentic voice
- Include relevant emojis where appropriate
- End with a clear call to action
- Format hashtags with # symbol";

const PRODUCT_CHECKLIST: &str = "The product description should:
- Highlight key features and benefits
- Address potential customer pain points
- Use persuasive language
- Include technical specifications where relevant
- End with a compelling reason to buy";

const EMAIL_CHECKLIST: &str = "The email template should include:
- An attention-grabbing subject line (include as part of the title)
- Personalized greeting
- Clear and concise message
- Strong call-to-action
- Professional sign-off";

const TRADING_CHECKLIST: &str = "The trading post should:
- Open with the key market observation in one sentence
- Back every claim with a concrete data point or chart reference
- Separate analysis from opinion clearly
- State risks plainly and avoid guaranteed-return language
- Close with a reminder that this is not financial advice";

const TIKTOK_CHECKLIST: &str = "The TikTok video script should:
- Hook the viewer within the first 3 seconds
- Be written as short spoken lines with on-screen text cues in [brackets]
- Keep a fast pace with a clear beat or transition every few seconds
- Reference a trend, sound or format where it fits naturally
- End with a loop-friendly line or a direct prompt to comment, like or follow";

/// Stylistic closing block for each content type.
pub fn closing_checklist(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Blog => BLOG_CHECKLIST,
        ContentType::Social => SOCIAL_CHECKLIST,
        ContentType::Product => PRODUCT_CHECKLIST,
        ContentType::Email => EMAIL_CHECKLIST,
        ContentType::Trading => TRADING_CHECKLIST,
        ContentType::Tiktok => TIKTOK_CHECKLIST,
    }
}

/// Keys of the JSON template, in order, paired with their example values (raw JSON).
pub fn template_entries(request: &ContentRequest) -> Vec<(&'static str, &'static str)> {
    let flags = &request.flags;
    let mut entries = vec![
        ("title", r#""An attention-grabbing title""#),
        ("body", r#""The main content with proper formatting...""#),
    ];

    if flags.include_meta_description {
        entries.push((
            "metaDescription",
            r#""A compelling meta description for SEO""#,
        ));
    }
    if flags.include_meta_keywords {
        entries.push(("metaKeywords", r#""keyword one, keyword two, keyword three""#));
    }
    if flags.include_seo_title {
        entries.push(("seoTitle", r#""A search-optimized title under 60 characters""#));
    }
    if flags.generate_hashtags {
        entries.push(("hashtags", r#"["tag1", "tag2", "tag3", "tag4", "tag5"]"#));
    }
    if request.solicits_trending_tags() {
        entries.push(("trendingTags", r#"["trend1", "trend2", "trend3"]"#));
    }
    if flags.check_plagiarism {
        entries.push(("plagiarismScore", "0"));
    }
    if request.solicits_trading_insights() {
        entries.push((
            "tradingInsights",
            r#"{
    "marketTrend": "Short description of the current trend",
    "riskLevel": "Low, Medium or High",
    "potentialReturn": "Expected return range",
    "timeframe": "Recommended holding period"
  }"#,
        ));
    }
    if request.solicits_viral_analysis() {
        entries.push(("viralPotential", "7"));
    }
    if flags.demographic_analysis {
        entries.push((
            "targetDemographic",
            r#""The audience segment most likely to engage""#,
        ));
    }

    entries
}

/// Builds the full model prompt for a request.
pub fn build_prompt(request: &ContentRequest) -> String {
    let flags = &request.flags;
    let (low, high) = request.word_count.range();

    let mut prompt = format!(
        "Generate {} content with a {} tone.",
        request.content_type.label(),
        request.tone_style.label()
    );
    prompt.push_str(&format!(
        "\nLength: {} ({low}-{high} words)",
        request.word_count.label()
    ));
    prompt.push_str(&format!("\nPlatform: {}", request.platform.label()));
    prompt.push_str(&format!("\nTarget SEO Keywords: {}", request.keywords.trim()));

    if let Some(audience) = request.target_audience() {
        prompt.push_str(&format!("\nTarget Audience: {audience}"));
    }
    if let Some(cta) = request.call_to_action() {
        prompt.push_str(&format!("\nInclude this call to action: \"{cta}\""));
    }

    if flags.generate_hashtags {
        prompt.push_str("\nGenerate 5-7 relevant hashtags for social sharing.");
    }
    if flags.include_meta_description {
        prompt.push_str("\nCreate a compelling meta description for SEO (150-160 characters).");
    }
    if flags.include_meta_keywords {
        prompt.push_str("\nProvide a comma-separated list of 5-10 meta keywords.");
    }
    if flags.include_seo_title {
        prompt.push_str("\nWrite a separate SEO title of at most 60 characters.");
    }
    if flags.seo_optimization {
        prompt.push_str(
            "\nOptimize headings and keyword density for search without keyword stuffing.",
        );
    }
    if flags.generate_trending_tags {
        prompt.push_str("\nSuggest 3-5 currently trending tags related to the keywords.");
    }
    if flags.trending_tags {
        prompt.push_str(&format!(
            "\nPrefer tags that are trending right now on {}.",
            request.platform.label()
        ));
    }
    if flags.trending_analysis {
        prompt.push_str("\nTie the content to current trends around the keywords.");
    }
    if flags.check_plagiarism {
        prompt.push_str("\nWrite fully original content; do not reuse existing text.");
    }
    if request.solicits_trading_insights() {
        prompt.push_str("\nInclude trading insights: market trend, risk level, potential return and timeframe.");
        if flags.market_trends {
            prompt.push_str("\nDescribe the prevailing market trend in detail.");
        }
        if flags.risk_analysis {
            prompt.push_str("\nAssess the risk level and name the main risk factors.");
        }
        if flags.timeframe_recommendation {
            prompt.push_str("\nRecommend a timeframe for the position.");
        }
    }
    if request.solicits_viral_analysis() {
        prompt.push_str("\nRate the viral potential of the content on a scale of 1-10.");
    }
    if flags.demographic_analysis {
        prompt.push_str("\nIdentify the target demographic most likely to engage.");
    }

    prompt.push_str("\n\n");
    prompt.push_str(TEMPLATE_HEADER);
    prompt.push_str("\n{\n");
    let fields = template_entries(request)
        .into_iter()
        .map(|(key, value)| format!("  \"{key}\": {value}"))
        .collect::<Vec<_>>()
        .join(",\n");
    prompt.push_str(&fields);
    prompt.push_str("\n}");

    prompt.push_str("\n\n");
    prompt.push_str(closing_checklist(request.content_type));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::request::{sample_request, FeatureFlags, ToneStyle, WordCount};

    /// Returns just the JSON template section of a prompt.
    fn template_section(prompt: &str) -> &str {
        let start = prompt.find(TEMPLATE_HEADER).expect("template header present");
        let rest = &prompt[start..];
        let end = rest.find("\n}").expect("template closes") + 2;
        &rest[..end]
    }

    fn all_flags() -> FeatureFlags {
        FeatureFlags {
            generate_hashtags: true,
            include_meta_description: true,
            include_meta_keywords: true,
            include_seo_title: true,
            generate_trending_tags: true,
            check_plagiarism: true,
            include_trading_insights: true,
            include_viral_analysis: true,
            seo_optimization: true,
            trending_analysis: true,
            market_trends: true,
            risk_analysis: true,
            timeframe_recommendation: true,
            viral_potential: true,
            demographic_analysis: true,
            trending_tags: true,
        }
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let mut request = sample_request();
        request.flags = all_flags();
        request.call_to_action = Some("Shop now".to_string());
        assert_eq!(build_prompt(&request), build_prompt(&request.clone()));
    }

    #[test]
    fn test_opening_lines_in_fixed_order() {
        let mut request = sample_request();
        request.target_audience = Some("busy parents".to_string());
        request.call_to_action = Some("Subscribe".to_string());
        let prompt = build_prompt(&request);

        let positions: Vec<usize> = [
            "Generate Blog Post content with a Casual and Conversational tone.",
            "Length: Short (150-300 words)",
            "Platform: Website",
            "Target SEO Keywords: tea, health",
            "Target Audience: busy parents",
            "Include this call to action: \"Subscribe\"",
            TEMPLATE_HEADER,
            "The blog post should include:",
        ]
        .iter()
        .map(|needle| prompt.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_minimal_template_has_only_title_and_body() {
        let prompt = build_prompt(&sample_request());
        let template = template_section(&prompt);
        assert!(template.contains("\"title\""));
        assert!(template.contains("\"body\""));
        for key in [
            "\"metaDescription\"",
            "\"metaKeywords\"",
            "\"seoTitle\"",
            "\"hashtags\"",
            "\"trendingTags\"",
            "\"plagiarismScore\"",
            "\"tradingInsights\"",
            "\"viralPotential\"",
            "\"targetDemographic\"",
        ] {
            assert!(!template.contains(key), "unexpected {key} in template");
        }
    }

    #[test]
    fn test_hashtags_key_follows_flag() {
        let mut request = sample_request();
        assert!(!template_section(&build_prompt(&request)).contains("\"hashtags\""));
        request.flags.generate_hashtags = true;
        let prompt = build_prompt(&request);
        assert!(template_section(&prompt).contains("\"hashtags\""));
        assert!(prompt.contains("Generate 5-7 relevant hashtags"));
    }

    #[test]
    fn test_each_flag_toggles_exactly_its_key() {
        let cases: [(fn(&mut FeatureFlags), &str); 6] = [
            (|f| f.include_meta_description = true, "metaDescription"),
            (|f| f.include_meta_keywords = true, "metaKeywords"),
            (|f| f.include_seo_title = true, "seoTitle"),
            (|f| f.generate_trending_tags = true, "trendingTags"),
            (|f| f.check_plagiarism = true, "plagiarismScore"),
            (|f| f.demographic_analysis = true, "targetDemographic"),
        ];
        for (enable, key) in cases {
            let mut request = sample_request();
            enable(&mut request.flags);
            let keys: Vec<_> = template_entries(&request).into_iter().map(|(k, _)| k).collect();
            assert_eq!(keys, vec!["title", "body", key]);
        }
    }

    #[test]
    fn test_trading_insights_gated_on_trading_content() {
        let mut request = sample_request();
        request.flags.include_trading_insights = true;
        request.flags.risk_analysis = true;
        let prompt = build_prompt(&request);
        assert!(!prompt.contains("\"tradingInsights\""));
        assert!(!prompt.contains("risk level"));

        request.content_type = ContentType::Trading;
        let prompt = build_prompt(&request);
        assert!(template_section(&prompt).contains("\"tradingInsights\""));
        assert!(template_section(&prompt).contains("\"riskLevel\""));
        assert!(prompt.contains("Assess the risk level"));
        assert!(prompt.contains("The trading post should:"));
    }

    #[test]
    fn test_viral_analysis_gated_on_social_content() {
        let mut request = sample_request();
        request.flags.include_viral_analysis = true;
        assert!(!build_prompt(&request).contains("\"viralPotential\""));

        request.content_type = ContentType::Tiktok;
        let prompt = build_prompt(&request);
        assert!(template_section(&prompt).contains("\"viralPotential\""));
        assert!(prompt.contains("The TikTok video script should:"));
    }

    #[test]
    fn test_template_with_all_flags_is_valid_json() {
        let mut request = sample_request();
        request.content_type = ContentType::Trading;
        request.flags = all_flags();
        let prompt = build_prompt(&request);
        let template = template_section(&prompt);
        let json = &template[TEMPLATE_HEADER.len()..];
        let value: serde_json::Value = serde_json::from_str(json.trim()).unwrap();
        assert!(value.get("tradingInsights").is_some());
        assert!(value.get("viralPotential").is_none());
    }

    #[test]
    fn test_each_content_type_has_distinct_closing_block() {
        let mut seen = std::collections::HashSet::new();
        for ct in ContentType::ALL {
            let mut request = sample_request();
            request.content_type = ct;
            let prompt = build_prompt(&request);
            let checklist = closing_checklist(ct);
            assert!(prompt.ends_with(checklist));
            assert!(seen.insert(checklist));
        }
    }

    #[test]
    fn test_labels_and_lengths_reflect_request() {
        let mut request = sample_request();
        request.tone_style = ToneStyle::Authoritative;
        request.word_count = WordCount::Long;
        let prompt = build_prompt(&request);
        assert!(prompt.contains("Authoritative and Confident tone"));
        assert!(prompt.contains("Length: Long (500-1500 words)"));
    }
}
