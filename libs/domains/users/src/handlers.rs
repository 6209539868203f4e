//! HTTP handlers for registration, login, token lifecycle and profiles.
//!
//! Tokens travel in request bodies and the `Authorization` header, never in
//! cookies. Refresh tokens are revocable through the Redis blacklist;
//! access tokens stay stateless and simply expire.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuthUser, JwtRedisAuth, TokenType, ValidatedJson, jwt_auth_middleware,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{
    AccessTokenResponse, ChangePasswordRequest, Gender, LoginRequest, LogoutRequest,
    ProfileResponse, RefreshRequest, RegisterRequest, TokenPairResponse, UpdateProfileRequest,
    User, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(
        register,
        login,
        refresh,
        logout,
        get_profile,
        update_profile,
        change_password,
    ),
    components(
        schemas(
            UserResponse, RegisterRequest, LoginRequest, TokenPairResponse,
            RefreshRequest, AccessTokenResponse, LogoutRequest,
            ChangePasswordRequest, UpdateProfileRequest, ProfileResponse, Gender
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "Registration, authentication and profiles")
    )
)]
pub struct ApiDoc;

/// Shared state for the users router.
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt_auth: JwtRedisAuth,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            jwt_auth: self.jwt_auth.clone(),
        }
    }
}

/// Create the users router.
pub fn router<R: UserRepository + 'static>(
    service: UserService<R>,
    jwt_auth: JwtRedisAuth,
) -> Router {
    let guard = middleware::from_fn_with_state(jwt_auth.clone(), jwt_auth_middleware);
    let state = AuthState { service, jwt_auth };

    Router::new()
        .route("/users/register", post(register::<R>))
        .route("/users/login", post(login::<R>))
        .route("/users/token/refresh", post(refresh::<R>))
        .route("/users/logout", post(logout::<R>).layer(guard.clone()))
        .route(
            "/users/profile",
            get(get_profile::<R>)
                .put(update_profile::<R>)
                .layer(guard.clone()),
        )
        .route(
            "/users/change-password",
            post(change_password::<R>).layer(guard),
        )
        .with_state(state)
}

fn issue_pair(jwt_auth: &JwtRedisAuth, user: &User) -> UserResult<(String, String)> {
    let user_id = user.id.to_string();
    let roles = user.roles();
    let access = jwt_auth
        .create_access_token(&user_id, &user.email, &user.username, &roles)
        .map_err(|e| UserError::Token(e.to_string()))?;
    let refresh = jwt_auth
        .create_refresh_token(&user_id, &user.email, &user.username, &roles)
        .map_err(|e| UserError::Token(e.to_string()))?;
    Ok((access, refresh))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let user = state.service.register(input).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<TokenPairResponse>> {
    let user = state
        .service
        .verify_credentials(&input.email, &input.password)
        .await?;
    let (access, refresh) = issue_pair(&state.jwt_auth, &user)?;
    Ok(Json(TokenPairResponse {
        access,
        refresh,
        user: user.into(),
    }))
}

/// Exchange a refresh token for a new access token
///
/// Access tokens, malformed tokens and revoked tokens are all rejected
/// with 401; only a missing token is a 400.
#[utoipa::path(
    post,
    path = "/users/token/refresh",
    tag = "Users",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn refresh<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Json(input): Json<RefreshRequest>,
) -> UserResult<Json<AccessTokenResponse>> {
    let token = input.refresh.ok_or(UserError::RefreshTokenRequired)?;
    let claims = state
        .jwt_auth
        .verify_token(&token)
        .map_err(|_| UserError::TokenNotValid)?;
    if claims.token_type != TokenType::Refresh {
        return Err(UserError::TokenNotValid);
    }
    if state
        .jwt_auth
        .is_token_blacklisted(&claims.jti)
        .await
        .map_err(|e| UserError::Token(e.to_string()))?
    {
        return Err(UserError::TokenNotValid);
    }

    // Re-read the account so a disabled user cannot keep minting tokens.
    let user_id = claims.sub.parse().map_err(|_| UserError::TokenNotValid)?;
    let user = state.service.get_user(user_id).await?;
    if !user.is_active {
        return Err(UserError::AccountDisabled);
    }

    let access = state
        .jwt_auth
        .create_access_token(&claims.sub, &user.email, &user.username, &user.roles())
        .map_err(|e| UserError::Token(e.to_string()))?;
    Ok(Json(AccessTokenResponse { access }))
}

/// Revoke a refresh token
///
/// The caller authenticates with an access token and surrenders the
/// refresh token in the body. Missing, malformed and already-revoked
/// tokens each get their own 400 message.
#[utoipa::path(
    post,
    path = "/users/logout",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = LogoutRequest,
    responses(
        (status = 204, description = "Refresh token revoked"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn logout<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Json(input): Json<LogoutRequest>,
) -> UserResult<impl IntoResponse> {
    let token = input.refresh.ok_or(UserError::RefreshTokenRequired)?;
    let claims = state
        .jwt_auth
        .verify_token(&token)
        .map_err(|_| UserError::InvalidRefreshToken)?;
    if claims.token_type != TokenType::Refresh {
        return Err(UserError::InvalidRefreshToken);
    }
    if state
        .jwt_auth
        .is_token_blacklisted(&claims.jti)
        .await
        .map_err(|e| UserError::Token(e.to_string()))?
    {
        return Err(UserError::TokenAlreadyRevoked);
    }
    state
        .jwt_auth
        .blacklist_token(&claims.jti, claims.remaining_ttl())
        .await
        .map_err(|e| UserError::Token(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_profile<R: UserRepository>(
    State(state): State<AuthState<R>>,
    user: AuthUser,
) -> UserResult<Json<ProfileResponse>> {
    let profile = state.service.get_profile(user.id).await?;
    Ok(Json(profile))
}

/// Update the authenticated user's profile
#[utoipa::path(
    put,
    path = "/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_profile<R: UserRepository>(
    State(state): State<AuthState<R>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> UserResult<Json<ProfileResponse>> {
    let profile = state.service.update_profile(user.id, input).await?;
    Ok(Json(profile))
}

/// Change the authenticated user's password
#[utoipa::path(
    post,
    path = "/users/change-password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn change_password<R: UserRepository>(
    State(state): State<AuthState<R>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> UserResult<impl IntoResponse> {
    state
        .service
        .change_password(user.id, &input.old_password, &input.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
