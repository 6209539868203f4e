//! Caller identity extractors.
//!
//! Handlers take `AuthUser` or `AdminUser` as an argument instead of
//! reaching into request extensions themselves. The identity is always
//! explicit in the handler signature.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::jwt::JwtClaims;
use crate::errors::AppError;

/// The authenticated caller, extracted from `JwtClaims` placed in request
/// extensions by [`super::jwt_auth_middleware`].
///
/// Rejects with 401 when the middleware has not run or the token was
/// invalid, and with 400 when the subject claim is not a UUID.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == "admin")
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<JwtClaims>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::BadRequest("Invalid user id in token".to_string()))?;

        Ok(Self {
            id,
            email: claims.email.clone(),
            username: claims.username.clone(),
            roles: claims.roles.clone(),
        })
    }
}

/// An authenticated caller that must carry the `admin` role.
///
/// Rejects with 403 for authenticated non-admin callers, 401 when there is
/// no authenticated caller at all.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;
    use axum::http::Request;

    fn claims_with_roles(roles: Vec<String>) -> JwtClaims {
        JwtClaims {
            sub: Uuid::now_v7().to_string(),
            email: "user@example.com".to_string(),
            username: "user".to_string(),
            roles,
            token_type: TokenType::Access,
            exp: chrono::Utc::now().timestamp() + 900,
            iat: chrono::Utc::now().timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[tokio::test]
    async fn test_auth_user_requires_claims() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_auth_user_from_claims() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(claims_with_roles(vec![]));

        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.email, "user@example.com");
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn test_admin_user_rejects_non_admin() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(claims_with_roles(vec![]));

        let result = AdminUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_user_accepts_admin_role() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts
            .extensions
            .insert(claims_with_roles(vec!["admin".to_string()]));

        let admin = AdminUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(admin.0.is_admin());
    }
}
