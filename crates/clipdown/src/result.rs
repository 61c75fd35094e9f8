//! Conversion output record.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Size and timing facts about one conversion. Lengths count chars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetadata {
    converted_at: DateTime<Utc>,
    original_length: usize,
    original_bytes: usize,
    markdown_length: usize,
    compression_ratio: f64,
}

impl ConversionMetadata {
    pub fn converted_at(&self) -> DateTime<Utc> {
        self.converted_at
    }

    /// Length of the input HTML
    pub fn original_length(&self) -> usize {
        self.original_length
    }

    /// Size of the input HTML in UTF-8 bytes
    pub fn original_bytes(&self) -> usize {
        self.original_bytes
    }

    /// Length of the produced Markdown
    pub fn markdown_length(&self) -> usize {
        self.markdown_length
    }

    /// `markdown_length / original_length`; reported, never enforced
    pub fn compression_ratio(&self) -> f64 {
        self.compression_ratio
    }
}

/// The Markdown produced from one HTML fragment, with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    markdown: String,
    metadata: ConversionMetadata,
}

impl ConversionResult {
    pub(crate) fn new(markdown: String, original: &str, converted_at: DateTime<Utc>) -> Self {
        let original_length = original.chars().count();
        let markdown_length = markdown.chars().count();
        let compression_ratio = if original_length == 0 {
            0.0
        } else {
            markdown_length as f64 / original_length as f64
        };

        Self {
            markdown,
            metadata: ConversionMetadata {
                converted_at,
                original_length,
                original_bytes: original.len(),
                markdown_length,
                compression_ratio,
            },
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn metadata(&self) -> &ConversionMetadata {
        &self.metadata
    }

    pub fn into_markdown(self) -> String {
        self.markdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_metadata_counts_chars() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let result = ConversionResult::new("héllo".to_string(), "<p>héllo</p>", at);

        let metadata = result.metadata();
        assert_eq!(metadata.original_length(), 12);
        assert_eq!(metadata.original_bytes(), 13);
        assert_eq!(metadata.markdown_length(), 5);
        assert!((metadata.compression_ratio() - 5.0 / 12.0).abs() < f64::EPSILON);
        assert_eq!(metadata.converted_at(), at);
    }

    #[test]
    fn test_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let result = ConversionResult::new("ab".to_string(), "abcd", at);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["markdown"], "ab");
        assert_eq!(json["metadata"]["originalLength"], 4);
        assert_eq!(json["metadata"]["markdownLength"], 2);
        assert_eq!(json["metadata"]["compressionRatio"], 0.5);
        assert_eq!(json["metadata"]["convertedAt"], "2024-05-01T12:00:00Z");
    }
}
