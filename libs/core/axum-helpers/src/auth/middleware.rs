use super::jwt::{JwtRedisAuth, TokenType};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Extract a bearer token from the Authorization header
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// JWT authentication middleware.
///
/// Validates the bearer token, requires it to be an access token, and
/// inserts the decoded `JwtClaims` into request extensions on success.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::{JwtRedisAuth, jwt_auth_middleware};
///
/// let protected_routes = Router::new()
///     .route("/api/protected", get(protected_handler))
///     .layer(axum::middleware::from_fn_with_state(
///         auth.clone(),
///         jwt_auth_middleware
///     ));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtRedisAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let token = match extract_token_from_request(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No JWT found in Authorization header");
            return Err((StatusCode::UNAUTHORIZED, "No token provided"));
        }
    };

    let claims = match auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return Err((StatusCode::UNAUTHORIZED, "Invalid token"));
        }
    };

    // Refresh tokens are only accepted by the token endpoints themselves
    if claims.token_type != TokenType::Access {
        tracing::debug!("Refresh token used where an access token is required");
        return Err((StatusCode::UNAUTHORIZED, "Invalid token"));
    }

    match auth.is_token_blacklisted(&claims.jti).await {
        Ok(true) => {
            tracing::debug!("Token is blacklisted: {}", claims.jti);
            return Err((StatusCode::UNAUTHORIZED, "Token has been revoked"));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Redis error checking blacklist: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Service temporarily unavailable",
            ));
        }
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
