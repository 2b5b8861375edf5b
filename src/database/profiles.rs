use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::profile::{ProfilePatch, UserProfile, UserRole};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<UserProfile>>;

    /// `None` when a profile with this id already exists.
    async fn create(
        &self,
        id: Uuid,
        role: UserRole,
        name: Option<String>,
    ) -> Result<Option<UserProfile>>;

    /// `None` when there is no profile to update.
    async fn update(&self, id: Uuid, patch: ProfilePatch) -> Result<Option<UserProfile>>;
}

const PROFILE_COLUMNS: &str = "id, role, name, title, industry, experience, location, bio, \
     skills, certifications, roles, photo_url, portfolio_url, created_at, updated_at";

#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn create(
        &self,
        id: Uuid,
        role: UserRole,
        name: Option<String>,
    ) -> Result<Option<UserProfile>> {
        let query = format!(
            "INSERT INTO profiles (id, role, name)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO NOTHING
             RETURNING {}",
            PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .bind(role)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn update(&self, id: Uuid, patch: ProfilePatch) -> Result<Option<UserProfile>> {
        let query = format!(
            "UPDATE profiles
             SET name = COALESCE($2, name),
                 title = COALESCE($3, title),
                 industry = COALESCE($4, industry),
                 experience = COALESCE($5, experience),
                 location = COALESCE($6, location),
                 bio = COALESCE($7, bio),
                 skills = COALESCE($8, skills),
                 certifications = COALESCE($9, certifications),
                 roles = COALESCE($10, roles),
                 photo_url = COALESCE($11, photo_url),
                 portfolio_url = COALESCE($12, portfolio_url),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .bind(patch.name)
            .bind(patch.title)
            .bind(patch.industry)
            .bind(patch.experience)
            .bind(patch.location)
            .bind(patch.bio)
            .bind(patch.skills)
            .bind(patch.certifications)
            .bind(patch.roles)
            .bind(patch.photo_url)
            .bind(patch.portfolio_url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }
}
