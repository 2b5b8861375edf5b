use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Candidate,
    Recruiter,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
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

impl UserProfile {
    pub fn new(id: Uuid, role: UserRole, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            role,
            name,
            title: None,
            industry: None,
            experience: None,
            location: None,
            bio: None,
            skills: Vec::new(),
            certifications: Vec::new(),
            roles: Vec::new(),
            photo_url: None,
            portfolio_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: ProfilePatch) {
        let ProfilePatch {
            name,
            title,
            industry,
            experience,
            location,
            bio,
            skills,
            certifications,
            roles,
            photo_url,
            portfolio_url,
        } = patch;

        if name.is_some() {
            self.name = name;
        }
        if title.is_some() {
            self.title = title;
        }
        if industry.is_some() {
            self.industry = industry;
        }
        if experience.is_some() {
            self.experience = experience;
        }
        if location.is_some() {
            self.location = location;
        }
        if bio.is_some() {
            self.bio = bio;
        }
        if let Some(skills) = skills {
            self.skills = skills;
        }
        if let Some(certifications) = certifications {
            self.certifications = certifications;
        }
        if let Some(roles) = roles {
            self.roles = roles;
        }
        if photo_url.is_some() {
            self.photo_url = photo_url;
        }
        if portfolio_url.is_some() {
            self.portfolio_url = portfolio_url;
        }
        self.updated_at = Utc::now();
    }
}

/// Onboarding fields a user may change on their own profile. `id` and
/// `role` are intentionally absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub experience: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
    pub roles: Option<Vec<String>>,
    pub photo_url: Option<String>,
    pub portfolio_url: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }
}
