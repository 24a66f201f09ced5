//! Users, their permissions and the JWT claims derived from them

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Named permission granted to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum Permission {
    /// Mark copies returned and renew their due date
    #[serde(rename = "catalog.can_mark_returned")]
    CanMarkReturned,
}

impl Permission {
    pub fn codename(&self) -> &'static str {
        match self {
            Permission::CanMarkReturned => "catalog.can_mark_returned",
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog.can_mark_returned" => Ok(Permission::CanMarkReturned),
            _ => Err(format!("Unknown permission: {}", s)),
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.codename())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    id: i32,
    username: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    is_staff: bool,
    is_superuser: bool,
    permissions: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let permissions = row
            .permissions
            .iter()
            .filter_map(|codename| match codename.parse() {
                Ok(permission) => Some(permission),
                Err(e) => {
                    tracing::debug!(user_id = row.id, "Ignoring stored permission: {}", e);
                    None
                }
            })
            .collect();

        User {
            id: row.id,
            username: row.username,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            permissions,
        }
    }
}

/// Library account, either a reader or a member of staff
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
    /// Holds every permission implicitly
    pub is_superuser: bool,
    pub permissions: BTreeSet<Permission>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1 to 150 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Bearer token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Username
    pub sub: String,
    pub user_id: i32,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub perms: BTreeSet<Permission>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn for_user(user: &User, iat: i64, exp: i64) -> Self {
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            perms: user.permissions.clone(),
            exp,
            iat,
        }
    }

    /// Sign as an HS256 JWT
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(&Header::default(), self, &EncodingKey::from_secret(secret.as_bytes()))
    }

    /// Verify signature and expiry, then decode
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        decode::<Self>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
            .map(|data| data.claims)
    }

    pub fn has_perm(&self, permission: Permission) -> bool {
        self.is_superuser || self.perms.contains(&permission)
    }

    pub fn require_perm(&self, permission: Permission) -> Result<(), AppError> {
        if self.has_perm(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Permission {} required",
                permission
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(perms: &[Permission], is_superuser: bool) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "jdoe".to_string(),
            user_id: 7,
            is_staff: true,
            is_superuser,
            perms: perms.iter().copied().collect(),
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn token_is_bound_to_secret() {
        let token = claims(&[Permission::CanMarkReturned], false)
            .create_token("secret")
            .unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert!(parsed.has_perm(Permission::CanMarkReturned));

        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut expired = claims(&[], false);
        expired.iat -= 7200;
        expired.exp = expired.iat + 60;
        let token = expired.create_token("secret").unwrap();

        assert!(UserClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn renew_permission_is_checked() {
        assert!(claims(&[Permission::CanMarkReturned], false)
            .require_perm(Permission::CanMarkReturned)
            .is_ok());
        assert!(matches!(
            claims(&[], false).require_perm(Permission::CanMarkReturned),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn superuser_holds_every_permission() {
        assert!(claims(&[], true).has_perm(Permission::CanMarkReturned));
    }

    #[test]
    fn unknown_stored_permissions_are_dropped() {
        let user = User::from(UserRow {
            id: 1,
            username: "clerk".to_string(),
            password: String::new(),
            first_name: None,
            last_name: None,
            is_staff: true,
            is_superuser: false,
            permissions: vec![
                "catalog.can_mark_returned".to_string(),
                "catalog.add_author".to_string(),
            ],
        });

        assert_eq!(user.permissions.len(), 1);
        assert!(user.permissions.contains(&Permission::CanMarkReturned));
    }
}
