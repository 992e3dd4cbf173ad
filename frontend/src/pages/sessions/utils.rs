use leptos::*;

use crate::api::{ApiError, BulkFeedbackRequest, BULK_FEEDBACK_MAX};

/// Fixed row height the windowed list is laid out with.
pub const ROW_HEIGHT_PX: f64 = 56.0;

#[derive(Clone, Default)]
pub struct MessageState {
    pub success: Option<String>,
    pub error: Option<ApiError>,
}

impl MessageState {
    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.success = Some(msg.into());
        self.error = None;
    }

    pub fn set_error(&mut self, msg: ApiError) {
        self.error = Some(msg);
        self.success = None;
    }

    pub fn clear(&mut self) {
        self.success = None;
        self.error = None;
    }
}

#[derive(Clone, Copy)]
pub struct BulkFormState {
    feedback: RwSignal<String>,
}

impl Default for BulkFormState {
    fn default() -> Self {
        Self {
            feedback: create_rw_signal(String::new()),
        }
    }
}

impl BulkFormState {
    pub fn feedback_signal(&self) -> RwSignal<String> {
        self.feedback
    }

    pub fn reset(&self) {
        self.feedback.set(String::new());
    }

    pub fn to_payload(&self, session_ids: Vec<String>) -> Result<BulkFeedbackRequest, ApiError> {
        let feedback = self.feedback.get().trim().to_string();
        if feedback.is_empty() {
            return Err(ApiError::validation("Enter feedback before applying."));
        }
        if session_ids.is_empty() {
            return Err(ApiError::validation("Select at least one session."));
        }
        if session_ids.len() > BULK_FEEDBACK_MAX {
            return Err(ApiError::validation(format!(
                "At most {} sessions can be updated at once.",
                BULK_FEEDBACK_MAX
            )));
        }
        Ok(BulkFeedbackRequest {
            session_ids,
            feedback,
        })
    }
}

pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let minutes = seconds / 60;
    let rest = seconds % 60;
    if minutes >= 60 {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m {:02}s", minutes, rest)
    }
}
