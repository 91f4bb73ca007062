//! Authentication handlers - the login provider behind post mutations.

use actix_web::{HttpResponse, web};

use blog_core::domain::User;
use blog_core::ports::{BaseRepository, UserRepository};
use blog_shared::ApiResponse;
use blog_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn token_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// GET /login - where unauthenticated post mutations are redirected.
pub async fn login_form() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::message(
        "Authentication required. POST {\"email\", \"password\"} to /login to obtain a token.",
    ))
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state.users.insert(User::new(req.email, password_hash)).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(token_response(&state, &user)?))
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::warn!(user_id = %user.id, "Rejected login with wrong password");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(token_response(&state, &user)?))
}

/// GET /me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse {
        id: identity.user_id.to_string(),
        email: identity.email,
    }))
}
