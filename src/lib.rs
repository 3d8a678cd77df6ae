mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{auth, db, utils};

use auth::jwt::JwtService;
use repositories::sqlx_repo::{SqlxProjectRepo, SqlxUserRepo};
use use_cases::{auth::AuthHandler, project::ProjectHandler};

pub type AppProjectHandler = ProjectHandler<SqlxProjectRepo>;
pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;

pub struct AppState {
    pub project_handler: AppProjectHandler,
    pub auth_handler: AppAuthHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let jwt_service = JwtService::new(config);
        let project_handler = ProjectHandler::new(SqlxProjectRepo::new(pool.clone()));
        let auth_handler = AuthHandler::new(SqlxUserRepo::new(pool), jwt_service);

        AppState {
            project_handler,
            auth_handler,
        }
    }
}
