use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::entities::option_fields::OptionField;

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 2;
const MIN_DESCRIPTION_LENGTH: u64 = 10;

/// Recognized project categories. The column is a postgres enum, so an
/// unrecognized value never reaches the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "project_category", rename_all = "lowercase")]
pub enum ProjectCategory {
    Web,
    Mobile,
    Design,
}

// ───── Database Model ────────────────────────────────────────────────

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub category: ProjectCategory,
    /// Comma-separated; consumers split at read time.
    pub tags: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ProjectInsert {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub category: ProjectCategory,
    pub tags: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectRequest {
    #[validate(length(min = MIN_TITLE_LENGTH, message = "Title must be at least 2 characters"))]
    pub title: String,

    #[validate(length(min = MIN_DESCRIPTION_LENGTH, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[validate(custom(function = "validate_url", message = "Please enter a valid image URL"))]
    pub image_url: String,

    #[validate(custom(function = "validate_optional_url", message = "Please enter a valid demo URL"))]
    pub demo_url: Option<String>,

    #[validate(custom(function = "validate_optional_url", message = "Please enter a valid repository URL"))]
    pub repo_url: Option<String>,

    pub category: ProjectCategory,

    #[validate(length(min = 1, message = "Please enter at least one tag"))]
    pub tags: String,

    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(length(min = MIN_TITLE_LENGTH, message = "Title must be at least 2 characters"))]
    pub title: Option<String>,

    #[validate(length(min = MIN_DESCRIPTION_LENGTH, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_url", message = "Please enter a valid image URL"))]
    pub image_url: Option<String>,

    #[validate(custom(function = "validate_optional_url_field", message = "Please enter a valid demo URL"))]
    pub demo_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field", message = "Please enter a valid repository URL"))]
    pub repo_url: OptionField<String>,

    pub category: Option<ProjectCategory>,

    #[validate(length(min = 1, message = "Please enter at least one tag"))]
    pub tags: Option<String>,

    pub featured: Option<bool>,
}

impl UpdateProjectRequest {
    /// Collapse empty-string URLs into an explicit clear. An empty optional
    /// URL means "not provided" at the API boundary.
    pub fn normalized(self) -> Self {
        UpdateProjectRequest {
            demo_url: blank_to_null(self.demo_url),
            repo_url: blank_to_null(self.repo_url),
            ..self
        }
    }
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

/// Optional URLs tolerate the empty string; it is normalized away before
/// anything is written.
pub fn validate_optional_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Ok(());
    }
    validate_url(url)
}

pub fn validate_optional_url_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_optional_url(url)?;
    }
    Ok(())
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn blank_to_null(value: OptionField<String>) -> OptionField<String> {
    match value {
        OptionField::SetToValue(s) if s.trim().is_empty() => OptionField::SetToNull,
        other => other,
    }
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewProjectRequest> for ProjectInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewProjectRequest) -> Result<Self, Self::Error> {
        value.validate()?;

        let now = Utc::now();

        Ok(ProjectInsert {
            title: value.title,
            description: value.description,
            image_url: value.image_url,
            demo_url: none_if_blank(value.demo_url),
            repo_url: none_if_blank(value.repo_url),
            category: value.category,
            tags: value.tags,
            featured: value.featured,
            created_at: now,
            updated_at: now,
        })
    }
}
