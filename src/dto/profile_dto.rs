use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::document_dto::DocumentResponse;
use crate::models::profile::{ProfilePatch, UserProfile, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProfilePayload {
    pub role: UserRole,
    #[validate(length(max = 200))]
    pub name: Option<String>,
}

/// Onboarding autosave body. Every field is optional; `id` and `role` are
/// not accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateProfilePayload {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 200))]
    pub industry: Option<String>,
    #[validate(length(max = 200))]
    pub experience: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(length(max = 50))]
    pub skills: Option<Vec<String>>,
    #[validate(length(max = 50))]
    pub certifications: Option<Vec<String>>,
    #[validate(length(max = 50))]
    pub roles: Option<Vec<String>>,
    #[validate(length(max = 2048))]
    pub photo_url: Option<String>,
    #[validate(length(max = 2048))]
    pub portfolio_url: Option<String>,
}

impl From<UpdateProfilePayload> for ProfilePatch {
    fn from(p: UpdateProfilePayload) -> Self {
        ProfilePatch {
            name: p.name,
            title: p.title,
            industry: p.industry,
            experience: p.experience,
            location: p.location,
            bio: p.bio,
            skills: p.skills,
            certifications: p.certifications,
            roles: p.roles,
            photo_url: p.photo_url,
            portfolio_url: p.portfolio_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub role: UserRole,
    pub name: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub experience: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub roles: Vec<String>,
    pub photo_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cleared URL is stored as an empty string and rendered as `null`.
impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            role: p.role,
            name: p.name,
            title: p.title,
            industry: p.industry,
            experience: p.experience,
            location: p.location,
            bio: p.bio,
            skills: p.skills,
            certifications: p.certifications,
            roles: p.roles,
            photo_url: p.photo_url.filter(|u| !u.is_empty()),
            portfolio_url: p.portfolio_url.filter(|u| !u.is_empty()),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicProfileResponse {
    pub profile: ProfileResponse,
    pub documents: Vec<DocumentResponse>,
}
