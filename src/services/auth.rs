//! Authentication service: password check and token issuance

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Check credentials and return a signed token with the user
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(&user, password)? {
            tracing::debug!("Rejected password for user {}", user.username);
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.username);

        Ok((token, user))
    }

    /// Create JWT token for a user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        UserClaims::for_user(user, now, exp)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}

/// Verify user password
fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    use crate::{
        models::user::Permission,
        repository::mock::MockRepository,
    };

    fn librarian() -> User {
        User {
            id: 3,
            username: "librarian".to_string(),
            password: Argon2::default()
                .hash_password(b"s3cret", &SaltString::generate(&mut OsRng))
                .unwrap()
                .to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            is_staff: true,
            is_superuser: false,
            permissions: [Permission::CanMarkReturned].into_iter().collect(),
        }
    }

    fn service(user: Option<User>) -> AuthService {
        let mut mocks = MockRepository::new();
        mocks
            .users
            .expect_get_by_username()
            .returning(move |_| Ok(user.clone()));
        AuthService::new(mocks.build(), AuthConfig::default())
    }

    #[tokio::test]
    async fn valid_credentials_issue_token() {
        let service = service(Some(librarian()));

        let (token, user) = service.authenticate("librarian", "s3cret").await.unwrap();
        assert_eq!(user.id, 3);

        let claims = UserClaims::from_token(&token, &AuthConfig::default().jwt_secret).unwrap();
        assert_eq!(claims.user_id, 3);
        assert!(claims.has_perm(Permission::CanMarkReturned));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let service = service(Some(librarian()));
        let result = service.authenticate("librarian", "nope").await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let service = service(None);
        let result = service.authenticate("ghost", "s3cret").await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }
}
