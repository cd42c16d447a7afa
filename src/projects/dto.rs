use serde::{Deserialize, Serialize};

use crate::projects::repo::ReviewStatus;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
}

/// Request body for the admin status update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub project_id: i64,
    pub status: ReviewStatus,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub success: bool,
}
