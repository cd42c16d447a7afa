use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::jwt::{AdminUser, AuthUser},
    auth::repo::Role,
    error::ApiError,
    projects::dto::{StatusUpdated, SubmitResponse, UpdateStatusRequest},
    projects::repo::{Project, SubmissionWithStudent},
    state::AppState,
};

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/submit",
            post(submit).layer(DefaultBodyLimit::max(20 * 1024 * 1024)), // 20MB
        )
        .route("/submissions/:user_id", get(list_user_submissions))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/submissions", get(list_all_submissions))
        .route("/admin/update-status", post(update_status))
}

/// POST /submit (multipart)
/// Text fields: title, course, description. File field: projectFile.
/// The owner is the token subject; any client-supplied user id is ignored.
#[instrument(skip(state, claims, multipart), fields(user_id = %claims.sub))]
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<SubmitResponse>, ApiError> {
    let mut title = String::new();
    let mut course = String::new();
    let mut description = String::new();
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("title") => {
                title = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            }
            Some("course") => {
                course = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            }
            Some("description") => {
                description = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            }
            Some("projectFile") => {
                let name = field
                    .file_name()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "upload".into());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                file = Some((name, data));
            }
            _ => {} // legacy clients may still send userId; the token wins
        }
    }

    // Reject before any file or database write happens.
    let (file_name, data) = file.ok_or(ApiError::MissingFile)?;

    let file_path = state.files.store(&file_name, data).await?;
    let date = OffsetDateTime::now_utc().date();

    match Project::create(
        &state.db,
        claims.sub,
        &title,
        &course,
        &description,
        &file_path,
        date,
    )
    .await
    {
        Ok(project) => {
            info!(project_id = %project.id, file_path = %file_path, "project submitted");
            Ok(Json(SubmitResponse {
                message: "Success".into(),
            }))
        }
        Err(e) => {
            // The file landed but the row didn't; clean up the orphan.
            if let Err(cleanup) = state.files.remove(&file_path).await {
                warn!(error = %cleanup, file_path = %file_path, "orphaned upload not removed");
            }
            error!(error = %e, "insert project failed");
            Err(e.into())
        }
    }
}

/// GET /submissions/:user_id — a student sees their own, an admin anyone's.
#[instrument(skip(state, claims))]
pub async fn list_user_submissions(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Project>>, ApiError> {
    if claims.sub != user_id && claims.role != Role::Admin {
        warn!(caller = %claims.sub, requested = %user_id, "cross-user listing denied");
        return Err(ApiError::Forbidden);
    }
    let projects = Project::list_for_user(&state.db, user_id).await?;
    Ok(Json(projects))
}

#[instrument(skip(state, _admin))]
pub async fn list_all_submissions(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<SubmissionWithStudent>>, ApiError> {
    let rows = Project::list_all_with_students(&state.db).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, admin))]
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<StatusUpdated>, ApiError> {
    let updated = Project::update_status(&state.db, payload.project_id, payload.status).await?;
    if !updated {
        warn!(project_id = %payload.project_id, "status update for unknown project");
        return Err(ApiError::NotFound("Project"));
    }
    info!(
        project_id = %payload.project_id,
        status = ?payload.status,
        admin_id = %admin.sub,
        "status updated"
    );
    Ok(Json(StatusUpdated { success: true }))
}
