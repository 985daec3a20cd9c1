// Cross-provider prompt fragments. The content prompt itself is built in
// `generation::prompts`; this holds what adapters wrap around it.

/// System message for chat-style providers.
pub const CONTENT_SYSTEM: &str = "You are an expert content creator and SEO specialist. \
    Create high-quality, engaging, and SEO-optimized marketing content. \
    Ensure the content is original and incorporates the keywords naturally. \
    Respond with a single JSON object matching the structure requested by the user.";
