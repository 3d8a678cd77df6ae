use async_trait::async_trait;
use uuid::Uuid;
use sqlx::{self, PgPool};

use crate::{
    entities::project::{Project, ProjectInsert, UpdateProjectRequest},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn update_project(&self, id: &Uuid, patch: &UpdateProjectRequest) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn not_found(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::RowNotFound => AppError::NotFound("Project not found".into()),
        e => AppError::from(e),
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, image_url, demo_url, repo_url,
                   category, tags, featured, created_at, updated_at
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, image_url, demo_url, repo_url,
                   category, tags, featured, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found)?;

        Ok(project)
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let created = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                title, description, image_url, demo_url, repo_url,
                category, tags, featured, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, title, description, image_url, demo_url, repo_url,
                      category, tags, featured, created_at, updated_at
            "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image_url)
        .bind(&project.demo_url)
        .bind(&project.repo_url)
        .bind(project.category)
        .bind(&project.tags)
        .bind(project.featured)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_project(&self, id: &Uuid, patch: &UpdateProjectRequest) -> Result<Project, AppError> {
        // COALESCE preserves fields the patch left out; the nullable URL
        // columns need the extra touched-flag bind so an explicit null can
        // clear them.
        let updated = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                image_url = COALESCE($3, image_url),
                demo_url = CASE WHEN $4 THEN $5 ELSE demo_url END,
                repo_url = CASE WHEN $6 THEN $7 ELSE repo_url END,
                category = COALESCE($8, category),
                tags = COALESCE($9, tags),
                featured = COALESCE($10, featured),
                updated_at = NOW()
            WHERE id = $11
            RETURNING id, title, description, image_url, demo_url, repo_url,
                      category, tags, featured, created_at, updated_at
            "#,
        )
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.image_url)
        .bind(!patch.demo_url.is_unchanged())
        .bind(patch.demo_url.flatten_str())
        .bind(!patch.repo_url.is_unchanged())
        .bind(patch.repo_url.flatten_str())
        .bind(patch.category)
        .bind(&patch.tags)
        .bind(patch.featured)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found)?;

        Ok(updated)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }

        Ok(())
    }
}
