use uuid::Uuid;
use validator::Validate;

use crate::entities::token::AuthResponse;
use crate::entities::user::{LoginUser, User};
use crate::errors::AuthError;
use crate::interfaces::repositories::user::UserRepository;
use crate::auth::password::verify_password;
use crate::repositories::token::TokenService;

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenService,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenService,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service
        }
    }

    /// Logs in a user by validating credentials and generating JWTs
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let user = self.user_repo.get_user_by_email(&request.email)
            .await
            .map_err(|_e| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!("User logged in successfully");
        Ok(response)
    }

    /// Create auth response
    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        let refresh_token = self.token_service.create_refresh_jwt(&user.id)
            .map_err(|e| {
                tracing::warn!("Failed to create refresh JWT: {}", e);
                AuthError::TokenCreation
            })?;
        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Refreshes the access token using the refresh token
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let decoded = self.token_service.decode_refresh_jwt(token)?;
        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AuthError::InvalidUserId)?;

        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.create_auth_response(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::UserInsert;
    use crate::errors::AppError;
    use crate::infrastructure::auth::{jwt::JwtService, password::hash_password};
    use crate::settings::{AppConfig, AppEnvironment};
    use chrono::Utc;
    use mockall::{mock, predicate::*};

    mock! {
        pub UserRepo {}

        #[async_trait::async_trait]
        impl UserRepository for UserRepo {
            async fn check_connection(&self) -> Result<(), AppError>;
            async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
            async fn get_user_by_id(&self, id: &uuid::Uuid) -> Result<Option<User>, AppError>;
            async fn create_user(&self, user: &UserInsert) -> Result<uuid::Uuid, AppError>;
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/test".into(),
            cors_allowed_origins: vec!["*".into()],
            jwt_secret: "access_secret_that_is_long_enough_for_hs512_123".into(),
            jwt_expiration_minutes: 15,
            refresh_token_secret: "refresh_secret_that_is_long_enough_for_hs512_1".into(),
            refresh_token_exp_days: 7,
        }
    }

    fn admin_user(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            password_hash: hash_password(password).unwrap(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn login_with_valid_password_returns_tokens() {
        let mut repo = MockUserRepo::new();
        let user = admin_user("Str0ng-pass!");

        repo.expect_get_user_by_email()
            .with(eq("admin@example.com"))
            .returning(move |_| Ok(Some(user.clone())));

        let handler = AuthHandler::new(repo, JwtService::new(&test_config()));
        let tokens = handler
            .login(LoginUser {
                email: "admin@example.com".into(),
                password: "Str0ng-pass!".into(),
            })
            .await
            .unwrap();

        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
        assert_eq!(tokens.token_type, "Bearer");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let mut repo = MockUserRepo::new();
        let user = admin_user("Str0ng-pass!");

        repo.expect_get_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let handler = AuthHandler::new(repo, JwtService::new(&test_config()));
        let result = handler
            .login(LoginUser {
                email: "admin@example.com".into(),
                password: "guess".into(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::WrongCredentials)));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_rejected() {
        let mut repo = MockUserRepo::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));

        let handler = AuthHandler::new(repo, JwtService::new(&test_config()));
        let result = handler
            .login(LoginUser {
                email: "nobody@example.com".into(),
                password: "whatever".into(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::WrongCredentials)));
    }

    #[tokio::test]
    async fn refresh_token_issues_a_fresh_pair() {
        let mut repo = MockUserRepo::new();
        let user = admin_user("Str0ng-pass!");
        let user_id = user.id;

        repo.expect_get_user_by_id()
            .withf(move |id| *id == user_id)
            .returning(move |_| Ok(Some(user.clone())));

        let service = JwtService::new(&test_config());
        let refresh = service.create_refresh_jwt(&user_id).unwrap();

        let handler = AuthHandler::new(repo, service);
        let tokens = handler.refresh_token(&refresh).await.unwrap();
        assert!(!tokens.access_token.is_empty());
    }

    #[tokio::test]
    async fn refresh_rejects_an_access_token() {
        let repo = MockUserRepo::new();
        let service = JwtService::new(&test_config());
        let access = service.create_jwt(&admin_user("Str0ng-pass!")).unwrap();

        let handler = AuthHandler::new(repo, service);
        let result = handler.refresh_token(&access).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
