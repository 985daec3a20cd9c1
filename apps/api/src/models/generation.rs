use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::generation::parser::ContentResult;
use crate::generation::request::{ContentRequest, FeatureFlags, UnknownEnumValue};

/// A request together with the content generated for it, before it is stored.
#[derive(Debug, Clone)]
pub struct NewGeneration {
    pub request: ContentRequest,
    pub generated_content: ContentResult,
}

/// A stored generation. Immutable once the store has assigned `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub id: i64,
    #[serde(flatten)]
    pub request: ContentRequest,
    pub generated_content: ContentResult,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct GenerationRow {
    pub id: i64,
    pub content_type: String,
    pub tone_style: String,
    pub word_count: String,
    pub platform: String,
    pub keywords: String,
    pub call_to_action: Option<String>,
    pub target_audience: Option<String>,
    pub feature_flags: Json<FeatureFlags>,
    pub generated_content: Json<ContentResult>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GenerationRow> for GenerationRecord {
    type Error = UnknownEnumValue;

    fn try_from(row: GenerationRow) -> Result<Self, Self::Error> {
        Ok(GenerationRecord {
            id: row.id,
            request: ContentRequest {
                content_type: row.content_type.parse()?,
                tone_style: row.tone_style.parse()?,
                word_count: row.word_count.parse()?,
                platform: row.platform.parse()?,
                keywords: row.keywords,
                call_to_action: row.call_to_action,
                target_audience: row.target_audience,
                flags: row.feature_flags.0,
            },
            generated_content: row.generated_content.0,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::request::{sample_request, ContentType};

    fn row(content_type: &str) -> GenerationRow {
        GenerationRow {
            id: 7,
            content_type: content_type.to_string(),
            tone_style: "casual".to_string(),
            word_count: "short".to_string(),
            platform: "website".to_string(),
            keywords: "tea, health".to_string(),
            call_to_action: None,
            target_audience: None,
            feature_flags: Json(FeatureFlags::default()),
            generated_content: Json(ContentResult::minimal("T", "B")),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_record() {
        let record = GenerationRecord::try_from(row("blog")).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.request, sample_request());
        assert_eq!(record.request.content_type, ContentType::Blog);
    }

    #[test]
    fn test_row_with_unknown_enum_text_is_rejected() {
        let err = GenerationRecord::try_from(row("newsletter")).unwrap_err();
        assert_eq!(err.field, "contentType");
        assert_eq!(err.value, "newsletter");
    }

    #[test]
    fn test_record_serializes_flat_camel_case() {
        let mut request = sample_request();
        request.flags.generate_hashtags = true;
        let record = GenerationRecord {
            id: 1,
            request,
            generated_content: ContentResult::minimal("T", "B"),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["contentType"], "blog");
        assert_eq!(json["generateHashtags"], true);
        assert_eq!(json["checkPlagiarism"], false);
        assert_eq!(json["generatedContent"]["title"], "T");
        assert!(json.get("createdAt").is_some());
    }
}
