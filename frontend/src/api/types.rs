use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::filters::{SCORE_CEIL, SCORE_FLOOR};

/// Most sessions a single bulk feedback request may target.
pub const BULK_FEEDBACK_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    pub clarity: f64,
    pub confidence: f64,
    pub engagement: f64,
}

/// A recorded sales-practice session. Immutable once fetched except for
/// `feedback`, which bulk updates may overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub score: f64,
    pub metrics: SessionMetrics,
    pub created_at: DateTime<Utc>,
    pub duration_seconds: i64,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPage {
    pub sessions: Vec<Session>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

impl SessionPage {
    /// Strict post-decode validation. A page failing this check is treated
    /// as a fetch failure and takes the retry path.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.sessions.len() > self.page_size as usize {
            return Err(ApiError::request_failed(format!(
                "page carries {} sessions but pageSize is {}",
                self.sessions.len(),
                self.page_size
            )));
        }
        for session in &self.sessions {
            if !(SCORE_FLOOR..=SCORE_CEIL).contains(&session.score) {
                return Err(ApiError::request_failed(format!(
                    "session {} score {} out of bounds",
                    session.id, session.score
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFeedbackRequest {
    pub session_ids: Vec<String>,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.error
    }
}

impl leptos::IntoView for ApiError {
    fn into_view(self) -> leptos::View {
        self.error.into_view()
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "VALIDATION_ERROR".to_string(),
            details: None,
        }
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "UNKNOWN".to_string(),
            details: None,
        }
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "REQUEST_FAILED".to_string(),
            details: None,
        }
    }

    /// Transient transport/server failures are worth retrying; everything
    /// else (validation, 4xx payload errors) is not.
    pub fn is_transient(&self) -> bool {
        self.code == "REQUEST_FAILED" || self.code == "SERVER_ERROR"
    }

    pub fn server(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "SERVER_ERROR".to_string(),
            details: None,
        }
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::test_support::fixtures::session;

    #[test]
    fn api_error_helpers_set_expected_codes() {
        assert_eq!(ApiError::validation("bad input").code, "VALIDATION_ERROR");
        assert_eq!(ApiError::unknown("boom").code, "UNKNOWN");
        assert_eq!(ApiError::request_failed("offline").code, "REQUEST_FAILED");
        assert_eq!(ApiError::server("500").code, "SERVER_ERROR");
    }

    #[test]
    fn transient_classification_drives_retry_path() {
        assert!(ApiError::request_failed("offline").is_transient());
        assert!(ApiError::server("500").is_transient());
        assert!(!ApiError::validation("bad input").is_transient());
        assert!(!ApiError::unknown("boom").is_transient());
    }

    #[test]
    fn api_error_display_matches_error_text() {
        assert_eq!(format!("{}", ApiError::unknown("boom")), "boom");
        let raw: String = ApiError::validation("bad input").into();
        assert_eq!(raw, "bad input");
    }

    #[test]
    fn page_validation_rejects_overfull_pages() {
        let page = SessionPage {
            sessions: vec![session("a", 5.0), session("b", 6.0), session("c", 7.0)],
            total: 3,
            page: 1,
            page_size: 2,
        };
        assert!(page.validate().is_err());
    }

    #[test]
    fn page_validation_rejects_out_of_bounds_scores() {
        let page = SessionPage {
            sessions: vec![session("a", 11.0)],
            total: 1,
            page: 1,
            page_size: 25,
        };
        assert!(page.validate().is_err());
    }

    #[test]
    fn page_validation_accepts_well_formed_pages() {
        let page = SessionPage {
            sessions: vec![session("a", 0.0), session("b", 10.0)],
            total: 7,
            page: 1,
            page_size: 25,
        };
        assert!(page.validate().is_ok());
    }
}
