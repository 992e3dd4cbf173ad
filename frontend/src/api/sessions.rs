use super::client::{decode, ApiClient};
use super::types::{ApiError, BulkFeedbackRequest, SessionPage, BULK_FEEDBACK_MAX};
use crate::utils::backoff::{delay_for_attempt, sleep_ms, MAX_ATTEMPTS};

impl ApiClient {
    /// Fetches one page of sessions for the given server query parameters.
    ///
    /// A response that decodes but fails schema validation counts as a fetch
    /// failure and is retried the same way a transport error is.
    pub async fn list_sessions(
        &self,
        query: &[(&'static str, String)],
    ) -> Result<SessionPage, ApiError> {
        let base_url = self.resolved_base_url().await;
        let url = format!("{}/sessions", base_url);

        let mut attempt = 0;
        loop {
            let result = self
                .dispatch(self.http_client().get(&url).query(query))
                .await
                .and_then(decode::<SessionPage>)
                .and_then(|page| {
                    page.validate()?;
                    Ok(page)
                });
            match result {
                Ok(page) => return Ok(page),
                Err(err) if err.is_transient() && attempt + 1 < MAX_ATTEMPTS => {
                    log::warn!(
                        "session page fetch attempt {} failed ({}), retrying",
                        attempt + 1,
                        err
                    );
                    sleep_ms(delay_for_attempt(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Overwrites feedback on a bounded set of sessions. Mutations are not
    /// retried; the caller keeps its selection on failure so the user can
    /// try again.
    pub async fn bulk_update_feedback(
        &self,
        request: &BulkFeedbackRequest,
    ) -> Result<(), ApiError> {
        if request.session_ids.is_empty() {
            return Err(ApiError::validation("No sessions selected."));
        }
        if request.session_ids.len() > BULK_FEEDBACK_MAX {
            return Err(ApiError::validation(format!(
                "At most {} sessions can be updated at once.",
                BULK_FEEDBACK_MAX
            )));
        }

        let base_url = self.resolved_base_url().await;
        let payload = self
            .dispatch(
                self.http_client()
                    .put(format!("{}/sessions/feedback", base_url))
                    .json(request),
            )
            .await?;
        if (200..300).contains(&payload.status) {
            Ok(())
        } else {
            Err(decode::<serde_json::Value>(payload)
                .err()
                .unwrap_or_else(|| ApiError::unknown("bulk update failed")))
        }
    }
}
