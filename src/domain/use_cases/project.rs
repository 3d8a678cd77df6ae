use validator::Validate;

use crate::{
    entities::project::{NewProjectRequest, Project, ProjectInsert, UpdateProjectRequest},
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ProjectHandler { project_repo }
    }

    /// Retrieves all projects, most recently created first
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects().await
    }

    /// Retrieves a project by its ID
    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        self.project_repo.get_project_by_id(&valid_id).await
    }

    /// Creates a new project with the provided data
    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        let insert = ProjectInsert::try_from(request)?;
        self.project_repo.create_project(&insert).await
    }

    /// Applies a partial update to an existing project
    pub async fn update_project(
        &self,
        id: &str,
        request: UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        request.validate()?;

        let valid_id = valid_uuid(id)?;
        let patch = request.normalized();

        self.project_repo.update_project(&valid_id, &patch).await
    }

    /// Deletes a project by its ID
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.project_repo.delete_project(&valid_id).await
    }
}
