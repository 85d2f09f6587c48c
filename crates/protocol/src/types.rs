use serde::{Deserialize, Serialize};

/// Coarse classification of an uploaded file, sent as the multipart
/// `content_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentCategory {
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "document")]
    Document,
    #[serde(rename = "presentation")]
    Presentation,
}

impl ContentCategory {
    /// Classifies a filename by its extension (case-insensitive).
    ///
    /// Unrecognized or missing extensions fall back to [`Document`](Self::Document)
    /// so the request field is never absent.
    pub fn from_filename(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" | "avi" | "mov" | "wmv" | "flv" | "webm" | "mkv" => Self::Video,
            "ppt" | "pptx" => Self::Presentation,
            _ => Self::Document,
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Document => "document",
            Self::Presentation => "presentation",
        }
    }
}

/// Acknowledgment returned by the upload endpoint.
///
/// Only `success` is guaranteed. `error` carries a human-readable reason
/// on failure; the remaining fields describe the stored artifact and
/// depend on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_video_extensions() {
        assert_eq!(ContentCategory::from_filename("lecture.mp4"), ContentCategory::Video);
        assert_eq!(ContentCategory::from_filename("demo.webm"), ContentCategory::Video);
        assert_eq!(ContentCategory::from_filename("capture.mkv"), ContentCategory::Video);
    }

    #[test]
    fn classifies_presentation_extensions() {
        assert_eq!(ContentCategory::from_filename("week1.ppt"), ContentCategory::Presentation);
        assert_eq!(ContentCategory::from_filename("week2.pptx"), ContentCategory::Presentation);
    }

    #[test]
    fn classifies_document_extensions() {
        assert_eq!(ContentCategory::from_filename("syllabus.pdf"), ContentCategory::Document);
        assert_eq!(ContentCategory::from_filename("notes.txt"), ContentCategory::Document);
        assert_eq!(ContentCategory::from_filename("essay.docx"), ContentCategory::Document);
    }

    #[test]
    fn unknown_extension_falls_back_to_document() {
        assert_eq!(
            ContentCategory::from_filename("notes.unknownext"),
            ContentCategory::Document
        );
    }

    #[test]
    fn missing_extension_falls_back_to_document() {
        assert_eq!(ContentCategory::from_filename("README"), ContentCategory::Document);
        assert_eq!(ContentCategory::from_filename(""), ContentCategory::Document);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(ContentCategory::from_filename("FINAL.MP4"), ContentCategory::Video);
        assert_eq!(ContentCategory::from_filename("Deck.PpTx"), ContentCategory::Presentation);
    }

    #[test]
    fn only_last_extension_counts() {
        assert_eq!(ContentCategory::from_filename("bundle.tar.mp4"), ContentCategory::Video);
        assert_eq!(ContentCategory::from_filename("movie.mp4.txt"), ContentCategory::Document);
    }

    #[test]
    fn as_str_matches_serde_rename() {
        for cat in [
            ContentCategory::Video,
            ContentCategory::Document,
            ContentCategory::Presentation,
        ] {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.as_str()));
        }
    }

    #[test]
    fn ack_parses_minimal_body() {
        let ack: UploadAck = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(ack.success);
        assert!(ack.error.is_none());
        assert!(ack.content_id.is_none());
    }

    #[test]
    fn ack_parses_failure_with_error() {
        let ack: UploadAck =
            serde_json::from_str(r#"{"success":false,"error":"quota exceeded"}"#).unwrap();
        assert!(!ack.success);
        assert_eq!(ack.error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn ack_ignores_unknown_fields() {
        let ack: UploadAck = serde_json::from_str(
            r#"{"success":true,"content_id":17,"url":"/content/17","message":"stored"}"#,
        )
        .unwrap();
        assert!(ack.success);
        assert_eq!(ack.content_id, Some(17));
        assert_eq!(ack.url.as_deref(), Some("/content/17"));
    }
}
