use crate::api::{ApiClient, ApiError, BulkFeedbackRequest, SessionPage};

pub async fn fetch_session_page(
    api: &ApiClient,
    query: &[(&'static str, String)],
) -> Result<SessionPage, ApiError> {
    api.list_sessions(query).await
}

pub async fn submit_bulk_feedback(
    api: &ApiClient,
    request: &BulkFeedbackRequest,
) -> Result<(), ApiError> {
    api.bulk_update_feedback(request).await
}
