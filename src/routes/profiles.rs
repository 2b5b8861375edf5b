use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::profile_dto::{
        CreateProfilePayload, ProfileResponse, PublicProfileResponse, UpdateProfilePayload,
    },
    error::Result,
    middleware::auth::AuthUser,
    utils::validation::validate,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/profile",
    tag = "profiles",
    request_body = CreateProfilePayload,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 409, description = "Profile already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateProfilePayload>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let profile = state
        .profile_service
        .create(user.user_id, payload.role, payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "profiles",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 404, description = "No profile yet")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service.get(user.user_id).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    patch,
    path = "/api/profile",
    tag = "profiles",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "No profile yet")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let profile = state
        .profile_service
        .update(user.user_id, payload.into())
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/api/public/profiles/{id}",
    tag = "profiles",
    params(
        ("id" = Uuid, Path, description = "Profile (user) ID")
    ),
    responses(
        (status = 200, description = "Profile with its public documents", body = PublicProfileResponse),
        (status = 404, description = "Profile not found")
    )
)]
#[axum::debug_handler]
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service.get(id).await?;
    let documents = state.document_service.public_documents(id).await?;
    Ok(Json(PublicProfileResponse {
        profile: profile.into(),
        documents,
    }))
}
