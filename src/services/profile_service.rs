use std::sync::Arc;

use uuid::Uuid;

use crate::database::profiles::ProfileRepository;
use crate::error::{Error, Result};
use crate::models::profile::{ProfilePatch, UserProfile, UserRole};
use crate::utils::validation::{normalize_http_url, normalize_list, normalize_text};

#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn ProfileRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, caller: Uuid, role: UserRole, name: Option<String>) -> Result<UserProfile> {
        let name = normalize_text(name).filter(|n| !n.is_empty());
        let profile = self
            .repo
            .create(caller, role, name)
            .await?
            .ok_or_else(|| Error::Conflict("Profile already exists".into()))?;
        tracing::info!(user_id = %caller, role = ?role, "profile created");
        Ok(profile)
    }

    pub async fn get(&self, id: Uuid) -> Result<UserProfile> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Profile not found".into()))
    }

    /// Applies an onboarding autosave. An empty patch returns the stored
    /// profile unchanged.
    pub async fn update(&self, caller: Uuid, patch: ProfilePatch) -> Result<UserProfile> {
        let patch = normalize_patch(patch)?;
        if patch.is_empty() {
            return self.get(caller).await;
        }
        let profile = self
            .repo
            .update(caller, patch)
            .await?
            .ok_or_else(|| Error::NotFound("Profile not found".into()))?;
        tracing::debug!(user_id = %caller, "profile updated");
        Ok(profile)
    }
}

fn normalize_patch(patch: ProfilePatch) -> Result<ProfilePatch> {
    Ok(ProfilePatch {
        name: normalize_text(patch.name),
        title: normalize_text(patch.title),
        industry: normalize_text(patch.industry),
        experience: normalize_text(patch.experience),
        location: normalize_text(patch.location),
        bio: normalize_text(patch.bio),
        skills: normalize_list(patch.skills),
        certifications: normalize_list(patch.certifications),
        roles: normalize_list(patch.roles),
        photo_url: normalize_http_url("photo_url", patch.photo_url)?,
        portfolio_url: normalize_http_url("portfolio_url", patch.portfolio_url)?,
    })
}
